use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::types::{Node, NodeKind};

/// A COMPONENT seen during the walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_set_id: Option<String>,
}

/// An INSTANCE seen during the walk and the component it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRef {
    pub id: String,
    pub name: String,
    pub component_id: Option<String>,
    /// Whether `component_id` names a component of the walked tree
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
}

/// A raw node left out of the annotated tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedNode {
    pub parent_id: String,
    /// Position in the parent's `children` array
    pub index: usize,
    pub reason: String,
}

/// Statistics of one subtree
///
/// Lists keep pre-order: a node's own entries come before the entries merged
/// in from its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub text_nodes: usize,
    /// VECTOR and BOOLEAN_OPERATION nodes
    pub vector_nodes: usize,
    pub component_nodes: usize,
    pub instance_nodes: usize,
    pub image_nodes: usize,
    pub components: Vec<ComponentRef>,
    pub instances: Vec<InstanceRef>,
    /// Ids of nodes whose first visible fill is an image
    pub image_node_ids: BTreeSet<String>,
    pub skipped: Vec<SkippedNode>,
}

impl TreeStats {
    /// Statistics contributed by a single node
    pub fn for_node(node: &Node) -> Self {
        let mut stats = TreeStats::default();

        match &node.kind {
            NodeKind::Text(_) => stats.text_nodes += 1,
            NodeKind::Vector | NodeKind::BooleanOperation => stats.vector_nodes += 1,
            NodeKind::Component { component_set_id } => {
                stats.component_nodes += 1;
                stats.components.push(ComponentRef {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    component_set_id: component_set_id.clone(),
                });
            }
            NodeKind::Instance { component_id } => {
                stats.instance_nodes += 1;
                stats.instances.push(InstanceRef {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    component_id: component_id.clone(),
                    resolved: false,
                    component_name: None,
                });
            }
            NodeKind::Frame
            | NodeKind::Group
            | NodeKind::Rectangle
            | NodeKind::Ellipse
            | NodeKind::ComponentSet => {}
        }

        if node.has_image_fill() {
            stats.image_nodes += 1;
            stats.image_node_ids.insert(node.id.clone());
        }

        stats
    }

    /// Fold a child's statistics into this one
    pub fn merge(&mut self, other: TreeStats) {
        self.text_nodes += other.text_nodes;
        self.vector_nodes += other.vector_nodes;
        self.component_nodes += other.component_nodes;
        self.instance_nodes += other.instance_nodes;
        self.image_nodes += other.image_nodes;
        self.components.extend(other.components);
        self.instances.extend(other.instances);
        self.image_node_ids.extend(other.image_node_ids);
        self.skipped.extend(other.skipped);
    }

    /// Link every instance to a component of the walked tree
    ///
    /// Instances pointing outside the tree stay unresolved; that is normal
    /// for library components and never an error.
    pub fn resolve_instances(&mut self) {
        let names: HashMap<&str, &str> = self
            .components
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();

        for instance in &mut self.instances {
            let found = instance
                .component_id
                .as_deref()
                .and_then(|id| names.get(id));

            match found {
                Some(name) => {
                    instance.resolved = true;
                    instance.component_name = Some(name.to_string());
                }
                None => {
                    instance.resolved = false;
                    instance.component_name = None;
                    debug!(
                        instance = %instance.id,
                        component = ?instance.component_id,
                        "Instance component not found in walked tree"
                    );
                }
            }
        }
    }

    pub fn unresolved_instances(&self) -> impl Iterator<Item = &InstanceRef> {
        self.instances.iter().filter(|i| !i.resolved)
    }
}
