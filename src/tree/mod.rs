/// Annotated design tree
///
/// - `walker`: Recursive annotation of a raw node tree
/// - `stats`: Per-subtree statistics merged bottom-up during the walk
pub mod stats;
pub mod walker;

// Re-export commonly used items
pub use stats::{ComponentRef, InstanceRef, SkippedNode, TreeStats};
pub use walker::{TreeWalker, WalkOutput};

use serde::Serialize;

use crate::types::NodeType;

/// A node with its derived class tokens
///
/// Built fresh by the walker; later passes (image URLs) produce new copies
/// instead of mutating this one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub depth: u32,
    pub visible: bool,
    pub class_tokens: Vec<String>,
    /// Tokens joined with single spaces
    pub class_name: String,
    /// Immediate children only
    pub children_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub has_image_fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AnnotatedNode>,
}

impl AnnotatedNode {
    /// Number of nodes below this one, at any depth
    pub fn total_descendants(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.total_descendants())
            .sum()
    }

    /// Find a node of this subtree by id
    pub fn find(&self, id: &str) -> Option<&AnnotatedNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Pre-order iterator over this node and all its descendants
    pub fn iter(&self) -> impl Iterator<Item = &AnnotatedNode> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}
