use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::images::{merge_image_urls, ImageMap};
use crate::tree::{AnnotatedNode, ComponentRef, InstanceRef, TreeStats};
use crate::types::NodeType;

/// Component and instance usage of the extracted tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAnalysis {
    pub instance_count: usize,
    pub component_count: usize,
    pub components: Vec<ComponentRef>,
    pub instances: Vec<InstanceRef>,
}

/// Node tallies of the extracted tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub text_nodes: usize,
    pub vector_nodes: usize,
    pub image_nodes: usize,
    pub component_nodes: usize,
    pub instance_nodes: usize,
    pub skipped_nodes: usize,
}

/// Final output document of an extraction run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    pub root_id: String,
    pub root_name: String,
    pub root_type: NodeType,
    pub direct_children_count: usize,
    pub total_descendants: usize,
    /// RFC 3339, UTC, millisecond precision
    pub extracted_at: String,
    pub tree: AnnotatedNode,
    pub component_analysis: ComponentAnalysis,
    pub summary: Summary,
}

/// Assemble the report from the walk output and the resolved image URLs
///
/// Pure: the same inputs always give the same report.
pub fn build_report(
    tree: &AnnotatedNode,
    stats: &TreeStats,
    images: &ImageMap,
    extracted_at: DateTime<Utc>,
) -> ExtractionReport {
    let tree = merge_image_urls(tree, images);

    ExtractionReport {
        root_id: tree.id.clone(),
        root_name: tree.name.clone(),
        root_type: tree.node_type,
        direct_children_count: tree.children_count,
        total_descendants: tree.total_descendants(),
        extracted_at: extracted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        component_analysis: ComponentAnalysis {
            instance_count: stats.instance_nodes,
            component_count: stats.component_nodes,
            components: stats.components.clone(),
            instances: stats.instances.clone(),
        },
        summary: Summary {
            text_nodes: stats.text_nodes,
            vector_nodes: stats.vector_nodes,
            image_nodes: stats.image_nodes,
            component_nodes: stats.component_nodes,
            instance_nodes: stats.instance_nodes,
            skipped_nodes: stats.skipped.len(),
        },
        tree,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;
    use crate::tree::TreeWalker;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_report_fields() {
        let config = StyleConfig::default();
        let output = TreeWalker::new(&config)
            .walk_tree(&json!({
                "id": "0:1",
                "name": "Page",
                "type": "FRAME",
                "children": [
                    {"id": "1:1", "type": "FRAME", "children": [
                        {"id": "2:1", "type": "COMPONENT", "name": "Chip"},
                        {"id": "2:2", "type": "INSTANCE", "name": "Chip", "componentId": "2:1"}
                    ]},
                    {"id": "1:2", "type": "TEXT", "characters": "Hello"}
                ]
            }))
            .unwrap();

        let report = build_report(&output.root, &output.stats, &ImageMap::new(), fixed_time());

        assert_eq!(report.root_id, "0:1");
        assert_eq!(report.root_name, "Page");
        assert_eq!(report.root_type, NodeType::Frame);
        assert_eq!(report.direct_children_count, 2);
        assert_eq!(report.total_descendants, 4);
        assert_eq!(report.extracted_at, "2024-05-01T12:30:00.000Z");
        assert_eq!(report.component_analysis.component_count, 1);
        assert_eq!(report.component_analysis.instance_count, 1);
        assert!(report.component_analysis.instances[0].resolved);
        assert_eq!(report.summary.text_nodes, 1);
        assert_eq!(report.summary.skipped_nodes, 0);
    }

    #[test]
    fn test_report_json_shape() {
        let config = StyleConfig::default();
        let output = TreeWalker::new(&config)
            .walk_tree(&json!({"id": "0:1", "name": "Solo", "type": "COMPONENT_SET"}))
            .unwrap();
        let report = build_report(&output.root, &output.stats, &ImageMap::new(), fixed_time());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["rootType"], "COMPONENT_SET");
        assert_eq!(value["directChildrenCount"], 0);
        assert_eq!(value["totalDescendants"], 0);
        assert_eq!(value["tree"]["classTokens"], json!(["block"]));
        assert_eq!(value["componentAnalysis"]["components"], json!([]));
        assert_eq!(value["summary"]["imageNodes"], 0);
    }

    #[test]
    fn test_report_is_deterministic() {
        let config = StyleConfig::default();
        let raw = json!({
            "id": "0:1",
            "type": "FRAME",
            "children": [
                {"id": "1:1", "type": "RECTANGLE", "fills": [{"type": "IMAGE"}]},
                {"id": "1:2", "type": "TEXT", "characters": "x", "style": {"fontSize": 12}}
            ]
        });
        let mut images = ImageMap::new();
        images.insert("1:1".to_string(), "https://img.example/a.png".to_string());

        let render = || {
            let output = TreeWalker::new(&config).walk_tree(&raw).unwrap();
            let report = build_report(&output.root, &output.stats, &images, fixed_time());
            serde_json::to_string(&report).unwrap()
        };

        assert_eq!(render(), render());
    }
}
