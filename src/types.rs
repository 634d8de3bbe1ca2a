//! Typed view of one design-tree node.
//!
//! The design-file API hands out nodes as loosely shaped JSON objects. A
//! [`Node`] is parsed from one such object *without* its children: the tree
//! walker keeps iterating the raw `children` array so that a single malformed
//! child can be skipped without losing its siblings.
//!
//! Only a missing `id` or `type` makes a node malformed. Any other attribute
//! with an unexpected shape is dropped with a warning and the node is kept.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;
use tracing::warn;

/// Closed set of node types the style compiler understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Frame,
    Group,
    Text,
    Rectangle,
    Ellipse,
    Vector,
    BooleanOperation,
    Component,
    ComponentSet,
    Instance,
}

impl NodeType {
    /// Map an API type name onto the closed set
    ///
    /// Vector-like shapes (lines, stars, polygons) fold into `Vector` and every
    /// other unknown type (sections, canvases, documents) is treated as a
    /// container `Frame`.
    pub fn from_api(name: &str) -> Self {
        match name {
            "FRAME" => NodeType::Frame,
            "GROUP" => NodeType::Group,
            "TEXT" => NodeType::Text,
            "RECTANGLE" => NodeType::Rectangle,
            "ELLIPSE" => NodeType::Ellipse,
            "VECTOR" | "LINE" | "STAR" | "REGULAR_POLYGON" => NodeType::Vector,
            "BOOLEAN_OPERATION" => NodeType::BooleanOperation,
            "COMPONENT" => NodeType::Component,
            "COMPONENT_SET" => NodeType::ComponentSet,
            "INSTANCE" => NodeType::Instance,
            _ => NodeType::Frame,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Frame => "FRAME",
            NodeType::Group => "GROUP",
            NodeType::Text => "TEXT",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Ellipse => "ELLIPSE",
            NodeType::Vector => "VECTOR",
            NodeType::BooleanOperation => "BOOLEAN_OPERATION",
            NodeType::Component => "COMPONENT",
            NodeType::ComponentSet => "COMPONENT_SET",
            NodeType::Instance => "INSTANCE",
        }
    }
}

/// Type-specific payload of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Frame,
    Group,
    Text(TextPayload),
    Rectangle,
    Ellipse,
    Vector,
    BooleanOperation,
    Component { component_set_id: Option<String> },
    ComponentSet,
    Instance { component_id: Option<String> },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Frame => NodeType::Frame,
            NodeKind::Group => NodeType::Group,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Rectangle => NodeType::Rectangle,
            NodeKind::Ellipse => NodeType::Ellipse,
            NodeKind::Vector => NodeType::Vector,
            NodeKind::BooleanOperation => NodeType::BooleanOperation,
            NodeKind::Component { .. } => NodeType::Component,
            NodeKind::ComponentSet => NodeType::ComponentSet,
            NodeKind::Instance { .. } => NodeType::Instance,
        }
    }
}

/// Text content and its typography
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPayload {
    pub characters: String,
    pub style: TypeStyle,
}

/// Typography of a TEXT node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeStyle {
    pub font_family: Option<String>,
    /// Style name as shown in the font picker ("Bold", "SemiBold", ...)
    pub font_style: Option<String>,
    pub font_post_script_name: Option<String>,
    pub font_size: Option<f64>,
    pub line_height_px: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub text_align_horizontal: Option<TextAlign>,
}

impl TypeStyle {
    /// Style name of the font, falling back to the PostScript name suffix
    ///
    /// `"Inter-SemiBold"` yields `"SemiBold"`.
    pub fn style_name(&self) -> Option<&str> {
        if let Some(style) = self.font_style.as_deref() {
            return Some(style);
        }
        self.font_post_script_name
            .as_deref()
            .and_then(|name| name.rsplit_once('-'))
            .map(|(_, suffix)| suffix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// RGBA color with channels in the 0.0-1.0 range
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "one")]
    pub a: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintKind {
    Solid,
    Image,
    /// Gradients and any other paint the compiler does not map
    #[serde(other)]
    Other,
}

/// One entry of a `fills` or `strokes` list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub kind: PaintKind,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default = "one")]
    pub opacity: f64,
    pub color: Option<Color>,
    pub image_ref: Option<String>,
}

impl Paint {
    /// Effective alpha of a solid paint: color alpha times paint opacity
    pub fn alpha(&self) -> f64 {
        self.color.map(|c| c.a).unwrap_or(1.0) * self.opacity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    Horizontal,
    Vertical,
    /// Also covers layout modes the compiler does not map (e.g. GRID)
    #[default]
    #[serde(other)]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
    Baseline,
}

/// Four-sided padding, in CSS order
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

/// Auto-layout settings of a container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub mode: LayoutMode,
    pub primary_align: AxisAlign,
    pub counter_align: AxisAlign,
    pub item_spacing: f64,
    pub padding: Padding,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CornerRadius {
    Uniform(f64),
    /// Top-left, top-right, bottom-right, bottom-left
    Corners([f64; 4]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    DropShadow,
    /// Inner shadows, blurs and any other effect
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub offset: Offset,
    pub color: Option<Color>,
}

/// A node of the design tree, minus its children
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub kind: NodeKind,
    pub bounds: Option<BoundingBox>,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: Option<f64>,
    pub layout: Option<Layout>,
    pub corner_radius: Option<CornerRadius>,
    pub effects: Vec<Effect>,
    pub opacity: f64,
}

/// Why a raw node could not be turned into a [`Node`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedNode {
    #[error("node is not a JSON object")]
    NotAnObject,

    #[error("node has no string `id`")]
    MissingId,

    #[error("node {id} has no string `type`")]
    MissingType { id: String },

    #[error("node id {id} appears more than once")]
    DuplicateId { id: String },
}

/// Attribute lookup over one raw object, tolerant of mis-shaped values
struct Attributes<'v> {
    node_id: &'v str,
    obj: &'v JsonMap<String, JsonValue>,
}

impl<'v> Attributes<'v> {
    fn new(node_id: &'v str, obj: &'v JsonMap<String, JsonValue>) -> Self {
        Self { node_id, obj }
    }

    fn raw(&self, key: &str) -> Option<&'v JsonValue> {
        self.obj.get(key).filter(|v| !v.is_null())
    }

    /// Decode one attribute; a value of the wrong shape counts as absent
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.raw(key)?;
        match T::deserialize(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(node = %self.node_id, attribute = key, error = %e, "Ignoring malformed attribute");
                None
            }
        }
    }

    /// Decode a list attribute entry by entry, dropping bad entries
    fn list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.raw(key) else {
            return Vec::new();
        };
        let Some(items) = raw.as_array() else {
            warn!(node = %self.node_id, attribute = key, "Ignoring non-array attribute");
            return Vec::new();
        };
        items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match T::deserialize(item) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(node = %self.node_id, attribute = key, index, error = %e, "Ignoring malformed entry");
                    None
                }
            })
            .collect()
    }

    /// Nested object attribute, e.g. `style`
    fn object(&self, key: &str) -> Option<Attributes<'v>> {
        let raw = self.raw(key)?;
        match raw.as_object() {
            Some(obj) => Some(Attributes::new(self.node_id, obj)),
            None => {
                warn!(node = %self.node_id, attribute = key, "Ignoring non-object attribute");
                None
            }
        }
    }
}

fn type_style(attrs: &Attributes) -> TypeStyle {
    TypeStyle {
        font_family: attrs.get("fontFamily"),
        font_style: attrs.get("fontStyle"),
        font_post_script_name: attrs.get("fontPostScriptName"),
        font_size: attrs.get("fontSize"),
        line_height_px: attrs.get("lineHeightPx"),
        letter_spacing: attrs.get("letterSpacing"),
        text_align_horizontal: attrs.get("textAlignHorizontal"),
    }
}

impl Node {
    /// Parse one raw API node, ignoring its `children`
    ///
    /// # Arguments
    /// * `value` - A node object as returned by the design-file API
    ///
    /// # Returns
    /// * `Ok(Node)` - The typed node
    /// * `Err(MalformedNode)` - If `id` or `type` is missing
    ///
    /// # Examples
    /// ```
    /// use figtail::types::{Node, NodeType};
    /// use serde_json::json;
    ///
    /// let node = Node::from_json(&json!({"id": "1:2", "type": "TEXT", "characters": "Hi"})).unwrap();
    /// assert_eq!(node.node_type(), NodeType::Text);
    /// ```
    pub fn from_json(value: &JsonValue) -> std::result::Result<Node, MalformedNode> {
        let obj = value.as_object().ok_or(MalformedNode::NotAnObject)?;

        let id = obj
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or(MalformedNode::MissingId)?
            .to_string();

        let type_name = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| MalformedNode::MissingType { id: id.clone() })?;

        let attrs = Attributes::new(&id, obj);

        let kind = match NodeType::from_api(type_name) {
            NodeType::Frame => NodeKind::Frame,
            NodeType::Group => NodeKind::Group,
            NodeType::Text => NodeKind::Text(TextPayload {
                characters: attrs.get("characters").unwrap_or_default(),
                style: attrs
                    .object("style")
                    .map(|style| type_style(&style))
                    .unwrap_or_default(),
            }),
            NodeType::Rectangle => NodeKind::Rectangle,
            NodeType::Ellipse => NodeKind::Ellipse,
            NodeType::Vector => NodeKind::Vector,
            NodeType::BooleanOperation => NodeKind::BooleanOperation,
            NodeType::Component => NodeKind::Component {
                component_set_id: attrs.get("componentSetId"),
            },
            NodeType::ComponentSet => NodeKind::ComponentSet,
            NodeType::Instance => NodeKind::Instance {
                component_id: attrs.get("componentId"),
            },
        };

        let layout = attrs.get::<LayoutMode>("layoutMode").map(|mode| Layout {
            mode,
            primary_align: attrs.get("primaryAxisAlignItems").unwrap_or_default(),
            counter_align: attrs.get("counterAxisAlignItems").unwrap_or_default(),
            item_spacing: attrs.get("itemSpacing").unwrap_or(0.0),
            padding: Padding {
                top: attrs.get("paddingTop").unwrap_or(0.0),
                right: attrs.get("paddingRight").unwrap_or(0.0),
                bottom: attrs.get("paddingBottom").unwrap_or(0.0),
                left: attrs.get("paddingLeft").unwrap_or(0.0),
            },
        });

        // Per-corner radii win over the scalar when they actually differ
        let corners: Option<[f64; 4]> = attrs.get("rectangleCornerRadii");
        let corner_radius = match (corners, attrs.get::<f64>("cornerRadius")) {
            (Some(corners), _) if corners.iter().any(|c| *c != corners[0]) => {
                Some(CornerRadius::Corners(corners))
            }
            (Some(corners), None) => Some(CornerRadius::Uniform(corners[0])),
            (_, Some(radius)) => Some(CornerRadius::Uniform(radius)),
            (None, None) => None,
        };

        Ok(Node {
            name: attrs.get("name").unwrap_or_default(),
            visible: attrs.get("visible").unwrap_or(true),
            kind,
            bounds: attrs.get("absoluteBoundingBox"),
            fills: attrs.list("fills"),
            strokes: attrs.list("strokes"),
            stroke_weight: attrs.get("strokeWeight"),
            layout,
            corner_radius,
            effects: attrs.list("effects"),
            opacity: attrs.get("opacity").unwrap_or(1.0),
            id,
        })
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// First visible SOLID fill; later fills are ignored
    pub fn solid_fill(&self) -> Option<&Paint> {
        first_visible_solid(&self.fills)
    }

    /// First visible SOLID stroke
    pub fn solid_stroke(&self) -> Option<&Paint> {
        first_visible_solid(&self.strokes)
    }

    /// Whether the first visible fill is an image
    pub fn has_image_fill(&self) -> bool {
        self.fills
            .iter()
            .find(|p| p.visible)
            .is_some_and(|p| p.kind == PaintKind::Image)
    }
}

fn first_visible_solid(paints: &[Paint]) -> Option<&Paint> {
    paints
        .iter()
        .find(|p| p.visible && p.kind == PaintKind::Solid && p.color.is_some())
}

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}
