use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::format_number;

/// Named color table keyed by `"R G B"` (0-255 channels)
///
/// Matching is by table membership only: a color that is one unit off a
/// named entry is *not* snapped to it, it falls through to an arbitrary
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: BTreeMap<String, String>,
}

impl Palette {
    /// Build a palette from `((r, g, b), name)` entries
    pub fn new<'a>(entries: impl IntoIterator<Item = ((u8, u8, u8), &'a str)>) -> Self {
        let colors = entries
            .into_iter()
            .map(|((r, g, b), name)| (color_key(r, g, b), name.to_string()))
            .collect();
        Self { colors }
    }

    /// Name registered for an exact 0-255 triple
    pub fn name_of(&self, r: u8, g: u8, b: u8) -> Option<&str> {
        self.colors.get(&color_key(r, g, b)).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Snap a 0.0-1.0 RGBA color to a color token
    ///
    /// Channels are converted to bytes with round-half-away-from-zero. An
    /// opaque color present in the table yields its bare name; a translucent
    /// one yields `[rgba(R,G,B,A)]`; an opaque miss yields `[rgb(R,G,B)]`.
    ///
    /// # Arguments
    /// * `r`, `g`, `b` - Color channels in the 0.0-1.0 range
    /// * `alpha` - Effective alpha in the 0.0-1.0 range
    ///
    /// # Examples
    /// ```
    /// use figtail::style::Palette;
    ///
    /// let palette = Palette::default();
    /// assert_eq!(palette.match_color(1.0, 1.0, 1.0, 1.0), "white");
    /// assert_eq!(palette.match_color(0.2, 0.4, 0.6, 1.0), "[rgb(51,102,153)]");
    /// assert_eq!(palette.match_color(0.0, 0.0, 0.0, 0.5), "[rgba(0,0,0,0.5)]");
    /// ```
    pub fn match_color(&self, r: f64, g: f64, b: f64, alpha: f64) -> String {
        let (r, g, b) = (channel_to_byte(r), channel_to_byte(g), channel_to_byte(b));
        let alpha = alpha.clamp(0.0, 1.0);

        if alpha < 1.0 {
            return format!("[{}]", rgba(r, g, b, alpha));
        }

        match self.name_of(r, g, b) {
            Some(name) => name.to_string(),
            None => format!("[rgb({},{},{})]", r, g, b),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::new([
            ((255, 255, 255), "white"),
            ((0, 0, 0), "black"),
            // Grays
            ((249, 250, 251), "gray-50"),
            ((243, 244, 246), "gray-100"),
            ((229, 231, 235), "gray-200"),
            ((209, 213, 219), "gray-300"),
            ((156, 163, 175), "gray-400"),
            ((107, 114, 128), "gray-500"),
            ((75, 85, 99), "gray-600"),
            ((55, 65, 81), "gray-700"),
            ((31, 41, 55), "gray-800"),
            ((17, 24, 39), "gray-900"),
            // Brand
            ((79, 70, 229), "primary"),
            ((67, 56, 202), "primary-dark"),
            ((224, 231, 255), "primary-light"),
            ((236, 72, 153), "accent"),
            // Semantic
            ((34, 197, 94), "success"),
            ((245, 158, 11), "warning"),
            ((239, 68, 68), "danger"),
            ((59, 130, 246), "info"),
        ])
    }
}

/// CSS `rgba()` with alpha rounded to two decimals
pub(crate) fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> String {
    let alpha = (alpha.clamp(0.0, 1.0) * 100.0).round() / 100.0;
    format!("rgba({},{},{},{})", r, g, b, format_number(alpha))
}

/// Convert a float in range 0.0-1.0 to a byte in range 0-255
///
/// Clamps the input to [0.0, 1.0] range and rounds half away from zero.
pub(crate) fn channel_to_byte(value: f64) -> u8 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 255.0).round() as u8
}

fn color_key(r: u8, g: u8, b: u8) -> String {
    format!("{} {} {}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_to_byte() {
        assert_eq!(channel_to_byte(0.0), 0);
        assert_eq!(channel_to_byte(1.0), 255);
        assert_eq!(channel_to_byte(0.5), 128); // 127.5 rounds away from zero
        assert_eq!(channel_to_byte(0.8725961446762085), 223);
        assert_eq!(channel_to_byte(-0.5), 0);
        assert_eq!(channel_to_byte(1.5), 255);
    }

    #[test]
    fn test_every_table_entry_matches_by_name() {
        let palette = Palette::default();
        for (key, name) in &palette.colors {
            let channels: Vec<f64> = key
                .split(' ')
                .map(|c| c.parse::<f64>().unwrap() / 255.0)
                .collect();
            assert_eq!(
                palette.match_color(channels[0], channels[1], channels[2], 1.0),
                *name
            );
        }
    }

    #[test]
    fn test_near_miss_is_not_snapped() {
        let palette = Palette::default();
        // 254,254,254 is one step away from white
        let token = palette.match_color(254.0 / 255.0, 254.0 / 255.0, 254.0 / 255.0, 1.0);
        assert_eq!(token, "[rgb(254,254,254)]");
    }

    #[test]
    fn test_translucent_named_color_is_arbitrary() {
        let palette = Palette::default();
        assert_eq!(palette.match_color(1.0, 1.0, 1.0, 0.8), "[rgba(255,255,255,0.8)]");
        assert_eq!(palette.match_color(0.0, 0.0, 0.0, 0.333), "[rgba(0,0,0,0.33)]");
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let palette = Palette::default();
        let first = palette.match_color(0.123456, 0.654321, 0.5, 0.75);
        for _ in 0..10 {
            assert_eq!(palette.match_color(0.123456, 0.654321, 0.5, 0.75), first);
        }
    }

    #[test]
    fn test_custom_palette() {
        let palette = Palette::new([((18, 52, 86), "brand")]);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.match_color(18.0 / 255.0, 52.0 / 255.0, 86.0 / 255.0, 1.0), "brand");
        assert_eq!(palette.match_color(1.0, 1.0, 1.0, 1.0), "[rgb(255,255,255)]");
    }

    #[test]
    fn test_rgba_formatting() {
        assert_eq!(rgba(0, 0, 0, 0.25), "rgba(0,0,0,0.25)");
        assert_eq!(rgba(10, 20, 30, 1.0), "rgba(10,20,30,1)");
    }
}
