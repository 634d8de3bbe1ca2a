use serde::{Deserialize, Serialize};

use super::arbitrary_px;
use crate::types::Padding;

/// Radius value that stands for "fully round"
pub const FULL_RADIUS: f64 = 9999.0;

/// One step of a discrete scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleStep {
    pub value: f64,
    /// Class suffix for this step; empty means the bare prefix (`rounded`)
    pub token: String,
}

/// Discrete measurement scale, matched by exact value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scale {
    steps: Vec<ScaleStep>,
}

impl Scale {
    pub fn new<'a>(steps: impl IntoIterator<Item = (f64, &'a str)>) -> Self {
        let steps = steps
            .into_iter()
            .map(|(value, token)| ScaleStep {
                value,
                token: token.to_string(),
            })
            .collect();
        Self { steps }
    }

    /// Default spacing scale used for padding and gap
    pub fn spacing() -> Self {
        Scale::new([
            (0.0, "0"),
            (1.0, "px"),
            (2.0, "0.5"),
            (4.0, "1"),
            (6.0, "1.5"),
            (8.0, "2"),
            (10.0, "2.5"),
            (12.0, "3"),
            (16.0, "4"),
            (20.0, "5"),
            (24.0, "6"),
            (28.0, "7"),
            (32.0, "8"),
            (36.0, "9"),
            (40.0, "10"),
            (44.0, "11"),
            (48.0, "12"),
            (56.0, "14"),
            (64.0, "16"),
        ])
    }

    /// Default corner radius scale
    pub fn radius() -> Self {
        Scale::new([
            (0.0, "none"),
            (2.0, "sm"),
            (4.0, ""),
            (6.0, "md"),
            (8.0, "lg"),
            (12.0, "xl"),
            (16.0, "2xl"),
            (24.0, "3xl"),
            (FULL_RADIUS, "full"),
        ])
    }

    /// Default border width scale
    pub fn border_width() -> Self {
        Scale::new([(1.0, ""), (2.0, "2"), (4.0, "4"), (8.0, "8")])
    }

    /// Mapped suffix for an exact scale value
    pub fn lookup(&self, value: f64) -> Option<&str> {
        self.steps
            .iter()
            .find(|step| step.value == value)
            .map(|step| step.token.as_str())
    }

    /// Snap a measurement to a class token
    ///
    /// # Arguments
    /// * `prefix` - Class prefix, e.g. `"p"`, `"gap"`, `"rounded"`
    /// * `value` - Raw measurement in pixels
    ///
    /// # Returns
    /// The mapped token when `value` is an exact step, otherwise an
    /// arbitrary-value token carrying the raw value.
    ///
    /// # Examples
    /// ```
    /// use figtail::style::Scale;
    ///
    /// let spacing = Scale::spacing();
    /// assert_eq!(spacing.snap("p", 8.0), "p-2");
    /// assert_eq!(spacing.snap("p", 7.0), "p-[7px]");
    /// assert_eq!(Scale::radius().snap("rounded", 4.0), "rounded");
    /// ```
    pub fn snap(&self, prefix: &str, value: f64) -> String {
        match self.lookup(value) {
            Some("") => prefix.to_string(),
            Some(token) => format!("{}-{}", prefix, token),
            None => arbitrary_px(prefix, value),
        }
    }
}

/// Padding tokens for four sides
///
/// Collapses to a single `p-*` token only when all four sides are exactly
/// equal; otherwise emits `pt-*`, `pr-*`, `pb-*`, `pl-*` snapped one by one.
pub fn padding_tokens(scale: &Scale, padding: &Padding) -> Vec<String> {
    let Padding {
        top,
        right,
        bottom,
        left,
    } = *padding;

    if top == right && right == bottom && bottom == left {
        return vec![scale.snap("p", top)];
    }

    vec![
        scale.snap("pt", top),
        scale.snap("pr", right),
        scale.snap("pb", bottom),
        scale.snap("pl", left),
    ]
}
