use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Font family name to family class (`font-sans`, `font-mono`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontFamilies {
    families: BTreeMap<String, String>,
}

impl FontFamilies {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let families = entries
            .into_iter()
            .map(|(family, token)| (family.to_string(), token.to_string()))
            .collect();
        Self { families }
    }

    /// Family class for a font, or a verbatim `font-['Family_Name']` token
    pub fn token_for(&self, family: &str) -> String {
        match self.families.get(family) {
            Some(token) => token.clone(),
            None => format!("font-['{}']", family.replace(' ', "_")),
        }
    }
}

impl Default for FontFamilies {
    fn default() -> Self {
        FontFamilies::new([
            ("Inter", "font-sans"),
            ("Roboto", "font-sans"),
            ("Helvetica", "font-sans"),
            ("Arial", "font-sans"),
            ("SF Pro Text", "font-sans"),
            ("SF Pro Display", "font-sans"),
            ("Georgia", "font-serif"),
            ("Times New Roman", "font-serif"),
            ("Merriweather", "font-serif"),
            ("Roboto Mono", "font-mono"),
            ("JetBrains Mono", "font-mono"),
            ("Fira Code", "font-mono"),
            ("Menlo", "font-mono"),
        ])
    }
}

/// Font style name to weight class
///
/// Style names are compared case-insensitively with spaces, hyphens and a
/// trailing "Italic" ignored, so "Semi Bold Italic" finds "SemiBold".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontWeights {
    weights: BTreeMap<String, String>,
}

/// Weight class for unknown or missing style names
pub const DEFAULT_WEIGHT_TOKEN: &str = "font-normal";

impl FontWeights {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let weights = entries
            .into_iter()
            .map(|(style, token)| (normalize_style(style), token.to_string()))
            .collect();
        Self { weights }
    }

    pub fn token_for(&self, style_name: Option<&str>) -> String {
        style_name
            .map(normalize_style)
            .and_then(|style| {
                self.weights
                    .iter()
                    .find(|(key, _)| normalize_style(key) == style)
                    .map(|(_, token)| token.clone())
            })
            .unwrap_or_else(|| DEFAULT_WEIGHT_TOKEN.to_string())
    }
}

impl Default for FontWeights {
    fn default() -> Self {
        FontWeights::new([
            ("Thin", "font-thin"),
            ("Hairline", "font-thin"),
            ("ExtraLight", "font-extralight"),
            ("UltraLight", "font-extralight"),
            ("Light", "font-light"),
            ("Regular", "font-normal"),
            ("Normal", "font-normal"),
            ("Book", "font-normal"),
            ("Medium", "font-medium"),
            ("SemiBold", "font-semibold"),
            ("DemiBold", "font-semibold"),
            ("Bold", "font-bold"),
            ("ExtraBold", "font-extrabold"),
            ("UltraBold", "font-extrabold"),
            ("Heavy", "font-extrabold"),
            ("Black", "font-black"),
        ])
    }
}

fn normalize_style(style: &str) -> String {
    let compact: String = style
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect::<String>()
        .to_lowercase();

    match compact.strip_suffix("italic") {
        // Plain "Italic" is the regular weight
        Some("") => "regular".to_string(),
        Some(stripped) => stripped.to_string(),
        None => compact,
    }
}
