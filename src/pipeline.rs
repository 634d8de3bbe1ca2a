use chrono::Utc;
use serde_json::Value as JsonValue;
use std::future::Future;
use tracing::{info, warn};

use crate::config::ExtractOptions;
use crate::error::{ExtractError, Result};
use crate::images::resolve_images_until;
use crate::report::{build_report, ExtractionReport};
use crate::source::DesignSource;
use crate::tree::TreeWalker;

/// Run a full extraction: fetch, walk, resolve images, report
///
/// Only a failure to fetch the root subtree is fatal. Malformed nodes are
/// skipped and image lookup failures leave the report without URLs.
///
/// # Arguments
/// * `source` - Where the tree and image URLs come from
/// * `root_id` - Id of the node to extract
/// * `options` - Depth, style tables and image lookup settings
///
/// # Returns
/// * `Ok(ExtractionReport)` - The annotated report
/// * `Err(ExtractError::SourceUnavailable)` - If the root fetch failed
/// * `Err(ExtractError::NodeNotFound)` - If the source has no such node
/// * `Err(ExtractError::MalformedRoot)` - If the root node is malformed
///
/// # Examples
/// ```
/// use figtail::{extract, ExtractOptions, FileSource};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = FileSource::from_json(json!({"id": "0:1", "type": "FRAME", "name": "Page"}));
/// let report = extract(&source, "0:1", &ExtractOptions::default()).await.unwrap();
/// assert_eq!(report.root_name, "Page");
/// # }
/// ```
pub async fn extract<S>(source: &S, root_id: &str, options: &ExtractOptions) -> Result<ExtractionReport>
where
    S: DesignSource + ?Sized,
{
    extract_until(source, root_id, options, std::future::pending()).await
}

/// Like [`extract`], abandoning the image lookup when `cancel_images` completes
///
/// The report is still produced, with no image URLs.
pub async fn extract_until<S, C>(
    source: &S,
    root_id: &str,
    options: &ExtractOptions,
    cancel_images: C,
) -> Result<ExtractionReport>
where
    S: DesignSource + ?Sized,
    C: Future<Output = ()>,
{
    let raw = fetch_root(source, root_id, options.depth).await?;

    let output = TreeWalker::new(&options.style).walk_tree(&raw)?;
    if !output.stats.skipped.is_empty() {
        warn!(
            root = root_id,
            skipped = output.stats.skipped.len(),
            "Some nodes were malformed and left out"
        );
    }

    let images = resolve_images_until(
        source,
        &output.stats.image_node_ids,
        &options.images,
        cancel_images,
    )
    .await;

    let report = build_report(&output.root, &output.stats, &images, Utc::now());

    info!(
        root = root_id,
        descendants = report.total_descendants,
        components = report.component_analysis.component_count,
        instances = report.component_analysis.instance_count,
        images = images.len(),
        "Extraction complete"
    );

    Ok(report)
}

async fn fetch_root<S>(source: &S, root_id: &str, depth: Option<u32>) -> Result<JsonValue>
where
    S: DesignSource + ?Sized,
{
    info!(root = root_id, ?depth, "Fetching design subtree");

    match source.fetch_subtree(root_id, depth).await {
        Ok(Some(raw)) => Ok(raw),
        Ok(None) => Err(ExtractError::NodeNotFound(root_id.to_string())),
        Err(source_error) => Err(ExtractError::SourceUnavailable {
            root_id: root_id.to_string(),
            source: source_error,
        }),
    }
}
