use crate::config::StyleConfig;
use crate::types::{
    AxisAlign, CornerRadius, Effect, EffectKind, Layout, LayoutMode, Node, NodeKind, NodeType,
    TextAlign, TextPayload,
};

use super::palette::{channel_to_byte, rgba};
use super::{arbitrary_px, format_number, padding_tokens};

/// Turns the style attributes of one node into utility-class tokens
///
/// Tokens come out in a fixed precedence order:
///
/// 1. display / layout mode (`hidden` nodes get no flex or alignment tokens)
/// 2. primary-axis alignment
/// 3. counter-axis alignment
/// 4. item spacing
/// 5. width and height (verbatim, rounded to whole pixels)
/// 6. padding
/// 7. background color (text color on TEXT nodes)
/// 8. border width
/// 9. border color
/// 10. border radius
/// 11. font size, font family, font weight, text alignment
/// 12. line height, letter spacing
/// 13. opacity
/// 14. drop shadow
///
/// A node that matches none of these still gets one fallback token chosen
/// by its type, so the token list is never empty.
#[derive(Debug, Clone, Copy)]
pub struct StyleExtractor<'a> {
    config: &'a StyleConfig,
}

impl<'a> StyleExtractor<'a> {
    pub fn new(config: &'a StyleConfig) -> Self {
        Self { config }
    }

    /// Compute the ordered class tokens of a node
    ///
    /// # Examples
    /// ```
    /// use figtail::config::StyleConfig;
    /// use figtail::style::StyleExtractor;
    /// use figtail::types::Node;
    /// use serde_json::json;
    ///
    /// let config = StyleConfig::default();
    /// let node = Node::from_json(&json!({
    ///     "id": "1:1",
    ///     "type": "FRAME",
    ///     "layoutMode": "HORIZONTAL",
    ///     "itemSpacing": 8,
    ///     "fills": [{"type": "SOLID", "color": {"r": 1, "g": 1, "b": 1, "a": 1}}]
    /// })).unwrap();
    ///
    /// let tokens = StyleExtractor::new(&config).extract(&node);
    /// assert_eq!(tokens, vec!["flex", "flex-row", "justify-start", "items-start", "gap-2", "bg-white"]);
    /// ```
    pub fn extract(&self, node: &Node) -> Vec<String> {
        let mut tokens = Vec::new();
        let layout = active_layout(node);

        // Display
        if !node.visible {
            tokens.push("hidden".to_string());
        } else if let Some(layout) = layout {
            tokens.push("flex".to_string());
            tokens.push(match layout.mode {
                LayoutMode::Vertical => "flex-col".to_string(),
                _ => "flex-row".to_string(),
            });
        }

        // Alignment and gap only apply to a displayed flex container
        if let Some(layout) = layout.filter(|_| node.visible) {
            if let Some(token) = primary_axis_token(layout.mode, layout.primary_align) {
                tokens.push(token.to_string());
            }
            if let Some(token) = counter_axis_token(layout.mode, layout.counter_align) {
                tokens.push(token.to_string());
            }
            if layout.item_spacing != 0.0 {
                tokens.push(self.config.spacing.snap("gap", layout.item_spacing));
            }
        }

        // Dimensions are never snapped
        if let Some(bounds) = node.bounds {
            tokens.push(format!("w-[{}px]", bounds.width.round() as i64));
            tokens.push(format!("h-[{}px]", bounds.height.round() as i64));
        }

        if let Some(layout) = layout {
            if !layout.padding.is_zero() {
                tokens.extend(padding_tokens(&self.config.spacing, &layout.padding));
            }
        }

        // Fill color
        if let Some(fill) = node.solid_fill() {
            let prefix = match node.kind {
                NodeKind::Text(_) => "text",
                _ => "bg",
            };
            if let Some(color) = fill.color {
                let name = self
                    .config
                    .palette
                    .match_color(color.r, color.g, color.b, fill.alpha());
                tokens.push(format!("{}-{}", prefix, name));
            }
        }

        // Border
        if let Some(stroke) = node.solid_stroke() {
            let weight = node.stroke_weight.unwrap_or(1.0);
            if weight > 0.0 {
                tokens.push(self.config.border_width.snap("border", weight));
                if let Some(color) = stroke.color {
                    let name = self
                        .config
                        .palette
                        .match_color(color.r, color.g, color.b, stroke.alpha());
                    tokens.push(format!("border-{}", name));
                }
            }
        }

        tokens.extend(self.radius_tokens(node));

        if let NodeKind::Text(payload) = &node.kind {
            tokens.extend(self.typography_tokens(payload));
        }

        if node.opacity != 1.0 {
            let percent = (node.opacity.clamp(0.0, 1.0) * 100.0).round() as i64;
            tokens.push(format!("opacity-{}", percent));
        }

        if let Some(effect) = first_shadow(&node.effects) {
            tokens.push(shadow_token(effect));
        }

        if tokens.is_empty() {
            tokens.push(fallback_token(node.node_type()).to_string());
        }

        tokens
    }

    fn radius_tokens(&self, node: &Node) -> Vec<String> {
        let radius = &self.config.radius;

        if node.node_type() == NodeType::Ellipse {
            return vec!["rounded-full".to_string()];
        }

        match node.corner_radius {
            Some(CornerRadius::Uniform(value)) if value > 0.0 => {
                vec![radius.snap("rounded", value)]
            }
            Some(CornerRadius::Corners([tl, tr, br, bl])) => vec![
                radius.snap("rounded-tl", tl),
                radius.snap("rounded-tr", tr),
                radius.snap("rounded-br", br),
                radius.snap("rounded-bl", bl),
            ],
            _ => Vec::new(),
        }
    }

    fn typography_tokens(&self, payload: &TextPayload) -> Vec<String> {
        let style = &payload.style;
        let mut tokens = Vec::new();

        if let Some(size) = style.font_size {
            tokens.push(arbitrary_px("text", size));
        }

        if let Some(family) = style.font_family.as_deref() {
            tokens.push(self.config.font_families.token_for(family));
        }

        tokens.push(self.config.font_weights.token_for(style.style_name()));

        if let Some(align) = style.text_align_horizontal {
            tokens.push(
                match align {
                    TextAlign::Left => "text-left",
                    TextAlign::Center => "text-center",
                    TextAlign::Right => "text-right",
                    TextAlign::Justified => "text-justify",
                }
                .to_string(),
            );
        }

        if let Some(line_height) = style.line_height_px.filter(|v| *v > 0.0) {
            tokens.push(arbitrary_px("leading", line_height));
        }

        if let Some(spacing) = style.letter_spacing.filter(|v| *v != 0.0) {
            tokens.push(arbitrary_px("tracking", spacing));
        }

        tokens
    }
}

/// Auto-layout settings, only for nodes that actually use auto layout
fn active_layout(node: &Node) -> Option<Layout> {
    node.layout.filter(|layout| layout.mode != LayoutMode::None)
}

// Horizontal containers justify along the primary axis. Vertical ones use
// the swapped table: primary alignment becomes `items-*`.
fn primary_axis_token(mode: LayoutMode, align: AxisAlign) -> Option<&'static str> {
    let token = match (mode, align) {
        (LayoutMode::None, _) => return None,
        (_, AxisAlign::SpaceBetween) => "justify-between",
        (_, AxisAlign::Baseline) => "items-baseline",
        (LayoutMode::Horizontal, AxisAlign::Min) => "justify-start",
        (LayoutMode::Horizontal, AxisAlign::Center) => "justify-center",
        (LayoutMode::Horizontal, AxisAlign::Max) => "justify-end",
        (LayoutMode::Vertical, AxisAlign::Min) => "items-start",
        (LayoutMode::Vertical, AxisAlign::Center) => "items-center",
        (LayoutMode::Vertical, AxisAlign::Max) => "items-end",
    };
    Some(token)
}

fn counter_axis_token(mode: LayoutMode, align: AxisAlign) -> Option<&'static str> {
    let token = match (mode, align) {
        (LayoutMode::None, _) => return None,
        (_, AxisAlign::SpaceBetween) => "justify-between",
        (_, AxisAlign::Baseline) => "items-baseline",
        (LayoutMode::Horizontal, AxisAlign::Min) => "items-start",
        (LayoutMode::Horizontal, AxisAlign::Center) => "items-center",
        (LayoutMode::Horizontal, AxisAlign::Max) => "items-end",
        (LayoutMode::Vertical, AxisAlign::Min) => "justify-start",
        (LayoutMode::Vertical, AxisAlign::Center) => "justify-center",
        (LayoutMode::Vertical, AxisAlign::Max) => "justify-end",
    };
    Some(token)
}

fn first_shadow(effects: &[Effect]) -> Option<&Effect> {
    effects
        .iter()
        .find(|e| e.visible && e.kind == EffectKind::DropShadow)
}

/// Composite shadow token, e.g. `shadow-[0px_4px_8px_rgba(0,0,0,0.25)]`
fn shadow_token(effect: &Effect) -> String {
    let color = match effect.color {
        Some(c) => rgba(
            channel_to_byte(c.r),
            channel_to_byte(c.g),
            channel_to_byte(c.b),
            c.a,
        ),
        None => rgba(0, 0, 0, 1.0),
    };
    format!(
        "shadow-[{}px_{}px_{}px_{}]",
        format_number(effect.offset.x),
        format_number(effect.offset.y),
        format_number(effect.radius),
        color
    )
}

fn fallback_token(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Text => "inline",
        NodeType::Vector | NodeType::BooleanOperation | NodeType::Ellipse => "inline-block",
        NodeType::Frame
        | NodeType::Group
        | NodeType::Rectangle
        | NodeType::Component
        | NodeType::ComponentSet
        | NodeType::Instance => "block",
    }
}
