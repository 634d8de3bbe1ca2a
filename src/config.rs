//! Extraction configuration.
//!
//! Every lookup table the style compiler uses lives here as a plain value, so
//! a design system can swap its palette or scales without touching the
//! traversal code. All sections have defaults and can be partially
//! overridden from a JSON file:
//!
//! ```json
//! {
//!   "depth": 4,
//!   "style": { "palette": { "18 52 86": "brand" } },
//!   "images": { "timeoutMs": 5000, "maxAttempts": 3 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ExtractError, Result};
use crate::style::{FontFamilies, FontWeights, Palette, Scale};

/// Lookup tables used by the style extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    pub palette: Palette,
    pub spacing: Scale,
    pub radius: Scale,
    pub border_width: Scale,
    pub font_families: FontFamilies,
    pub font_weights: FontWeights,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            spacing: Scale::spacing(),
            radius: Scale::radius(),
            border_width: Scale::border_width(),
            font_families: FontFamilies::default(),
            font_weights: FontWeights::default(),
        }
    }
}

/// Behaviour of the batched image URL lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageResolverConfig {
    /// Per-attempt timeout
    pub timeout_ms: u64,
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before attempt N+1 is `N * retry_backoff_ms`
    pub retry_backoff_ms: u64,
}

impl ImageResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for ImageResolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_attempts: 1,
            retry_backoff_ms: 500,
        }
    }
}

/// Options for one extraction run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractOptions {
    /// Maximum subtree depth requested from the source (`None` = full tree)
    pub depth: Option<u32>,
    pub style: StyleConfig,
    pub images: ImageResolverConfig,
}

impl ExtractOptions {
    /// Parse options from a JSON string, filling gaps with defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        let options: ExtractOptions = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.images.max_attempts == 0 {
            return Err(ExtractError::Config(
                "images.maxAttempts must be at least 1".to_string(),
            ));
        }
        if self.images.timeout_ms == 0 {
            return Err(ExtractError::Config(
                "images.timeoutMs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.depth, None);
        assert_eq!(options.images.max_attempts, 1);
        assert_eq!(options.images.timeout(), Duration::from_secs(30));
        assert_eq!(options.style.spacing.snap("p", 16.0), "p-4");
    }

    #[test]
    fn test_partial_override() {
        let options = ExtractOptions::from_json_str(
            r#"{
                "depth": 2,
                "style": {"palette": {"18 52 86": "brand"}},
                "images": {"maxAttempts": 3}
            }"#,
        )
        .unwrap();

        assert_eq!(options.depth, Some(2));
        assert_eq!(options.images.max_attempts, 3);
        assert_eq!(options.images.timeout_ms, 30_000);
        assert_eq!(options.style.palette.name_of(18, 52, 86), Some("brand"));
        // Replaced tables do not keep default entries
        assert_eq!(options.style.palette.name_of(255, 255, 255), None);
        // Untouched tables keep their defaults
        assert_eq!(options.style.radius.snap("rounded", 8.0), "rounded-lg");
    }

    #[test]
    fn test_backoff_grows_linearly() {
        let images = ImageResolverConfig {
            retry_backoff_ms: 100,
            ..Default::default()
        };
        assert_eq!(images.backoff(1), Duration::from_millis(100));
        assert_eq!(images.backoff(3), Duration::from_millis(300));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let result = ExtractOptions::from_json_str(r#"{"images": {"maxAttempts": 0}}"#);
        assert!(matches!(result, Err(ExtractError::Config(_))));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let result = ExtractOptions::from_json_str("{not json");
        assert!(matches!(result, Err(ExtractError::Json(_))));
    }
}
