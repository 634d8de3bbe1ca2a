use serde_json::Value as JsonValue;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::stats::{SkippedNode, TreeStats};
use super::AnnotatedNode;
use crate::config::StyleConfig;
use crate::error::{ExtractError, Result};
use crate::style::StyleExtractor;
use crate::types::{MalformedNode, Node, NodeKind};

/// Result of walking a whole tree
#[derive(Debug, Clone, PartialEq)]
pub struct WalkOutput {
    pub root: AnnotatedNode,
    pub stats: TreeStats,
}

/// Recursive annotator for raw design trees
///
/// The walk is synchronous and pure: it reads the raw JSON and builds a fresh
/// [`AnnotatedNode`] tree. Malformed children are skipped with a warning and
/// recorded in [`TreeStats::skipped`]; their siblings are still walked.
#[derive(Debug, Clone, Copy)]
pub struct TreeWalker<'a> {
    extractor: StyleExtractor<'a>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(config: &'a StyleConfig) -> Self {
        Self {
            extractor: StyleExtractor::new(config),
        }
    }

    /// Walk a whole tree from its root
    ///
    /// Instances are resolved against the components found in the tree once
    /// the walk is complete.
    ///
    /// # Arguments
    /// * `raw_root` - Root node as returned by the design source
    ///
    /// # Returns
    /// * `Ok(WalkOutput)` - Annotated tree and its statistics
    /// * `Err(ExtractError::MalformedRoot)` - If the root itself is malformed
    ///
    /// # Examples
    /// ```
    /// use figtail::config::StyleConfig;
    /// use figtail::tree::TreeWalker;
    /// use serde_json::json;
    ///
    /// let config = StyleConfig::default();
    /// let raw = json!({
    ///     "id": "0:1",
    ///     "type": "FRAME",
    ///     "children": [{"id": "0:2", "type": "TEXT", "characters": "Hi"}]
    /// });
    /// let output = TreeWalker::new(&config).walk_tree(&raw).unwrap();
    /// assert_eq!(output.root.children_count, 1);
    /// assert_eq!(output.stats.text_nodes, 1);
    /// ```
    pub fn walk_tree(&self, raw_root: &JsonValue) -> Result<WalkOutput> {
        let (root, mut stats) = self
            .walk(raw_root, 0)
            .map_err(|e| ExtractError::MalformedRoot(e.to_string()))?;

        stats.resolve_instances();

        debug!(
            root = %root.id,
            descendants = root.total_descendants(),
            skipped = stats.skipped.len(),
            "Tree walk complete"
        );

        Ok(WalkOutput { root, stats })
    }

    /// Annotate one node and its subtree
    ///
    /// # Arguments
    /// * `raw` - Raw node object
    /// * `depth` - Depth of `raw` in the full tree (root is 0)
    ///
    /// # Returns
    /// * `Ok((AnnotatedNode, TreeStats))` - The annotated subtree and its statistics
    /// * `Err(MalformedNode)` - If `raw` itself cannot be parsed
    pub fn walk(
        &self,
        raw: &JsonValue,
        depth: u32,
    ) -> std::result::Result<(AnnotatedNode, TreeStats), MalformedNode> {
        let mut seen = HashSet::new();
        self.walk_node(raw, depth, &mut seen)
    }

    fn walk_node(
        &self,
        raw: &JsonValue,
        depth: u32,
        seen: &mut HashSet<String>,
    ) -> std::result::Result<(AnnotatedNode, TreeStats), MalformedNode> {
        let node = Node::from_json(raw)?;
        if !seen.insert(node.id.clone()) {
            return Err(MalformedNode::DuplicateId { id: node.id });
        }

        // Own attributes first, then children in order
        let class_tokens = self.extractor.extract(&node);
        let mut stats = TreeStats::for_node(&node);
        let mut children = Vec::new();

        for (index, raw_child) in child_values(raw, &node.id).iter().enumerate() {
            match self.walk_node(raw_child, depth + 1, seen) {
                Ok((child, child_stats)) => {
                    stats.merge(child_stats);
                    children.push(child);
                }
                Err(e) => {
                    warn!(parent = %node.id, index, error = %e, "Skipping malformed node");
                    stats.skipped.push(SkippedNode {
                        parent_id: node.id.clone(),
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let annotated = AnnotatedNode {
            characters: match &node.kind {
                NodeKind::Text(payload) => Some(payload.characters.clone()),
                _ => None,
            },
            component_id: match &node.kind {
                NodeKind::Instance { component_id } => component_id.clone(),
                _ => None,
            },
            has_image_fill: node.has_image_fill(),
            id: node.id,
            name: node.name,
            node_type: node.kind.node_type(),
            depth,
            visible: node.visible,
            class_name: class_tokens.join(" "),
            class_tokens,
            children_count: children.len(),
            image_url: None,
            children,
        };

        Ok((annotated, stats))
    }
}

/// Raw `children` array of a node; anything else counts as no children
fn child_values<'v>(raw: &'v JsonValue, id: &str) -> &'v [JsonValue] {
    match raw.get("children") {
        Some(JsonValue::Array(children)) => children,
        Some(JsonValue::Null) | None => &[],
        Some(_) => {
            warn!(node = %id, "Ignoring non-array children field");
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// In-memory log sink for asserting on emitted diagnostics
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn walk_capturing_warnings(raw: JsonValue) -> (WalkOutput, Vec<String>) {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let output = tracing::subscriber::with_default(subscriber, || walk(raw));
        (output, log.lines())
    }

    fn walk(raw: JsonValue) -> WalkOutput {
        let config = StyleConfig::default();
        TreeWalker::new(&config).walk_tree(&raw).unwrap()
    }

    #[test]
    fn test_all_well_formed_nodes_are_kept() {
        let output = walk(json!({
            "id": "0:1",
            "type": "FRAME",
            "children": [
                {"id": "1:1", "type": "FRAME", "children": [
                    {"id": "2:1", "type": "TEXT"},
                    {"id": "2:2", "type": "VECTOR"}
                ]},
                {"id": "1:2", "type": "RECTANGLE"}
            ]
        }));

        assert_eq!(output.root.iter().count(), 5);
        assert_eq!(output.root.children_count, 2);
        assert_eq!(output.root.total_descendants(), 4);
        assert!(output.stats.skipped.is_empty());
    }

    #[test]
    fn test_malformed_child_is_skipped() {
        let output = walk(json!({
            "id": "0:1",
            "type": "FRAME",
            "children": [
                {"id": "1:1", "type": "TEXT"},
                {"type": "RECTANGLE", "name": "no id"},
                {"id": "1:3", "type": "ELLIPSE"}
            ]
        }));

        let ids: Vec<&str> = output.root.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1:1", "1:3"]);
        assert_eq!(output.root.iter().count(), 3);
        assert_eq!(output.stats.skipped.len(), 1);
        assert_eq!(output.stats.skipped[0].parent_id, "0:1");
        assert_eq!(output.stats.skipped[0].index, 1);
    }

    #[test]
    fn test_malformed_child_logs_one_warning() {
        let (output, lines) = walk_capturing_warnings(json!({
            "id": "0:1",
            "type": "FRAME",
            "children": [
                {"id": "1:1", "type": "TEXT"},
                {"type": "RECTANGLE", "name": "no id"},
                {"id": "1:3", "type": "ELLIPSE"}
            ]
        }));

        assert_eq!(output.root.iter().count(), 3);
        let skips: Vec<&String> = lines
            .iter()
            .filter(|line| line.contains("Skipping malformed node"))
            .collect();
        assert_eq!(skips.len(), 1);
        assert!(skips[0].contains("WARN"));
        assert!(skips[0].contains("parent=0:1"));
    }

    #[test]
    fn test_mis_shaped_attributes_keep_the_subtree() {
        let (output, lines) = walk_capturing_warnings(json!({
            "id": "0:1",
            "type": "FRAME",
            "children": [
                {"id": "1:1", "type": "FRAME", "opacity": "0.5", "children": [
                    {"id": "2:1", "type": "TEXT", "characters": "A"},
                    {"id": "2:2", "type": "TEXT", "characters": "B"}
                ]},
                {"id": "1:2", "type": "FRAME", "layoutMode": "HORIZONTAL",
                 "counterAxisAlignItems": "STRETCH"}
            ]
        }));

        assert_eq!(output.root.iter().count(), 5);
        assert!(output.stats.skipped.is_empty());
        assert_eq!(output.stats.text_nodes, 2);
        assert_eq!(output.root.find("1:1").unwrap().children_count, 2);
        assert_eq!(
            output.root.find("1:2").unwrap().class_tokens,
            vec!["flex", "flex-row", "justify-start", "items-start"]
        );
        assert_eq!(
            lines
                .iter()
                .filter(|line| line.contains("Ignoring malformed attribute"))
                .count(),
            2
        );
    }

    #[test]
    fn test_missing_type_is_skipped_deep_in_tree() {
        let output = walk(json!({
            "id": "0:1",
            "type": "FRAME",
            "children": [{"id": "1:1", "type": "GROUP", "children": [
                {"id": "2:1"},
                {"id": "2:2", "type": "TEXT"}
            ]}]
        }));

        let group = output.root.find("1:1").unwrap();
        assert_eq!(group.children_count, 1);
        assert_eq!(output.stats.skipped[0].parent_id, "1:1");
        assert_eq!(output.stats.text_nodes, 1);
    }

    #[test]
    fn test_malformed_root_is_fatal() {
        let config = StyleConfig::default();
        let result = TreeWalker::new(&config).walk_tree(&json!({"name": "orphan"}));
        assert!(matches!(result, Err(ExtractError::MalformedRoot(_))));
    }

    #[test]
    fn test_depth_and_order() {
        let output = walk(json!({
            "id": "a",
            "type": "FRAME",
            "children": [
                {"id": "b", "type": "FRAME", "children": [{"id": "c", "type": "TEXT"}]},
                {"id": "d", "type": "RECTANGLE"}
            ]
        }));

        let visited: Vec<(&str, u32)> = output.root.iter().map(|n| (n.id.as_str(), n.depth)).collect();
        assert_eq!(visited, vec![("a", 0), ("b", 1), ("c", 2), ("d", 1)]);
    }

    #[test]
    fn test_statistics_and_component_links() {
        let output = walk(json!({
            "id": "0:1",
            "type": "FRAME",
            "children": [
                {"id": "1:1", "type": "COMPONENT_SET", "name": "Button", "children": [
                    {"id": "2:1", "type": "COMPONENT", "name": "State=Default", "componentSetId": "1:1"},
                    {"id": "2:2", "type": "COMPONENT", "name": "State=Hover", "componentSetId": "1:1"}
                ]},
                {"id": "3:1", "type": "INSTANCE", "name": "Button", "componentId": "2:2"},
                {"id": "3:2", "type": "INSTANCE", "name": "Avatar", "componentId": "99:1"},
                {"id": "4:1", "type": "BOOLEAN_OPERATION"},
                {"id": "4:2", "type": "TEXT", "characters": "Label"},
                {"id": "4:3", "type": "RECTANGLE", "fills": [{"type": "IMAGE", "imageRef": "abc"}]}
            ]
        }));

        let stats = &output.stats;
        assert_eq!(stats.component_nodes, 2);
        assert_eq!(stats.instance_nodes, 2);
        assert_eq!(stats.vector_nodes, 1);
        assert_eq!(stats.text_nodes, 1);
        assert_eq!(stats.image_nodes, 1);
        assert!(stats.image_node_ids.contains("4:3"));

        assert_eq!(stats.instances[0].component_name.as_deref(), Some("State=Hover"));
        assert!(stats.instances[0].resolved);
        assert!(!stats.instances[1].resolved);

        let instance = output.root.find("3:1").unwrap();
        assert_eq!(instance.component_id.as_deref(), Some("2:2"));
        assert!(output.root.find("4:3").unwrap().has_image_fill);
        assert_eq!(output.root.find("4:2").unwrap().characters.as_deref(), Some("Label"));
    }

    #[test]
    fn test_class_name_joins_tokens() {
        let output = walk(json!({
            "id": "0:1",
            "type": "FRAME",
            "layoutMode": "VERTICAL",
            "paddingTop": 16, "paddingRight": 16, "paddingBottom": 16, "paddingLeft": 16
        }));
        assert_eq!(output.root.class_name, output.root.class_tokens.join(" "));
        assert!(output.root.class_name.starts_with("flex flex-col"));
    }

    #[test]
    fn test_duplicate_id_is_skipped() {
        let output = walk(json!({
            "id": "0:1",
            "type": "FRAME",
            "children": [
                {"id": "1:1", "type": "RECTANGLE"},
                {"id": "1:1", "type": "ELLIPSE"}
            ]
        }));
        assert_eq!(output.root.children_count, 1);
        assert_eq!(output.root.children[0].node_type, crate::types::NodeType::Rectangle);
        assert!(output.stats.skipped[0].reason.contains("1:1"));
    }

    #[test]
    fn test_non_array_children_are_ignored() {
        let output = walk(json!({"id": "0:1", "type": "FRAME", "children": "oops"}));
        assert_eq!(output.root.children_count, 0);
    }
}
