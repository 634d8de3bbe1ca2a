/// Style compilation: from node attributes to utility-class tokens
///
/// - `palette`: Snap RGB(A) colors onto a named color table
/// - `scale`: Snap measurements onto discrete spacing/radius/border scales
/// - `typography`: Font family and font weight tables
/// - `extract`: Produce the ordered token list for one node
pub mod extract;
pub mod palette;
pub mod scale;
pub mod typography;

// Re-export commonly used items
pub use extract::StyleExtractor;
pub use palette::Palette;
pub use scale::{padding_tokens, Scale};
pub use typography::{FontFamilies, FontWeights};

/// Format a measurement without a trailing `.0`
///
/// Whole numbers print as integers (`16`), anything else keeps its decimals
/// (`13.5`).
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Arbitrary-value pixel token, e.g. `w-[320px]`
pub(crate) fn arbitrary_px(prefix: &str, value: f64) -> String {
    format!("{}-[{}px]", prefix, format_number(value))
}
