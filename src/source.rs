//! Design sources: where raw trees and image URLs come from.
//!
//! The remote design-file API client lives outside this crate; it plugs in
//! by implementing [`DesignSource`]. [`FileSource`] serves the same data from
//! JSON exports on disk, for offline runs and tests.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{Result, SourceError};

/// Image URL per node id; `None` when the source has no image for that id
pub type ImageUrls = BTreeMap<String, Option<String>>;

/// Provider of design trees and rendered image URLs
///
/// Both calls distinguish "no data" (`Ok(None)` / `None` entries) from a
/// failed request (`Err`).
#[async_trait]
pub trait DesignSource: Send + Sync {
    /// Fetch the subtree rooted at `root_id`, at most `depth` levels deep
    async fn fetch_subtree(
        &self,
        root_id: &str,
        depth: Option<u32>,
    ) -> std::result::Result<Option<JsonValue>, SourceError>;

    /// Fetch image URLs for a batch of node ids in one request
    async fn fetch_image_urls(
        &self,
        ids: &BTreeSet<String>,
    ) -> std::result::Result<ImageUrls, SourceError>;
}

/// Design source backed by JSON exports
///
/// Accepts a bare node, a file response (`{"document": node}`) or a nodes
/// response (`{"nodes": {"1:2": {"document": node}}}`). Image URLs come from
/// an images response (`{"images": {"1:2": "https://..."}}`) or a bare map.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    documents: Vec<JsonValue>,
    images: ImageUrls,
    images_error: Option<SourceError>,
}

impl FileSource {
    /// Build a source from an already parsed tree export
    pub fn from_json(export: JsonValue) -> Self {
        Self {
            documents: documents_of(export),
            ..Default::default()
        }
    }

    /// Attach an images export
    ///
    /// An images response carrying a non-null `err` makes every image lookup
    /// fail with [`SourceError::Api`], the way the remote API would.
    pub fn with_images(mut self, export: JsonValue) -> Self {
        match images_of(export) {
            Ok(images) => self.images = images,
            Err(e) => self.images_error = Some(e),
        }
        self
    }

    /// Read a tree export and an optional images export from disk
    ///
    /// # Arguments
    /// * `tree_path` - Path to the tree JSON export
    /// * `images_path` - Optional path to the images JSON export
    ///
    /// # Returns
    /// * `Ok(FileSource)` - The loaded source
    /// * `Err(ExtractError)` - If a file cannot be read or is not JSON
    pub async fn open(tree_path: &Path, images_path: Option<&Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(tree_path).await?;
        let mut source = FileSource::from_json(serde_json::from_str(&text)?);

        if let Some(path) = images_path {
            let text = tokio::fs::read_to_string(path).await?;
            source = source.with_images(serde_json::from_str(&text)?);
        }

        Ok(source)
    }
}

#[async_trait]
impl DesignSource for FileSource {
    async fn fetch_subtree(
        &self,
        root_id: &str,
        depth: Option<u32>,
    ) -> std::result::Result<Option<JsonValue>, SourceError> {
        let found = self
            .documents
            .iter()
            .find_map(|document| find_node(document, root_id));

        Ok(found.map(|node| truncate(node, depth)))
    }

    async fn fetch_image_urls(
        &self,
        ids: &BTreeSet<String>,
    ) -> std::result::Result<ImageUrls, SourceError> {
        if let Some(e) = &self.images_error {
            return Err(e.clone());
        }

        Ok(ids
            .iter()
            .map(|id| (id.clone(), self.images.get(id).cloned().flatten()))
            .collect())
    }
}

/// Root documents contained in a tree export
fn documents_of(export: JsonValue) -> Vec<JsonValue> {
    match export {
        JsonValue::Object(mut map) => {
            if let Some(JsonValue::Object(nodes)) = map.remove("nodes") {
                return nodes
                    .into_iter()
                    .filter_map(|(_, mut entry)| entry.get_mut("document").map(JsonValue::take))
                    .collect();
            }
            if let Some(document) = map.remove("document") {
                return vec![document];
            }
            vec![JsonValue::Object(map)]
        }
        _ => Vec::new(),
    }
}

fn images_of(export: JsonValue) -> std::result::Result<ImageUrls, SourceError> {
    let JsonValue::Object(mut map) = export else {
        return Err(SourceError::Decode("images export is not an object".to_string()));
    };

    if let Some(err) = map.get("err").filter(|e| !e.is_null()) {
        let status = map
            .get("status")
            .and_then(|s| s.as_u64())
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(400);
        let message = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
        return Err(SourceError::Api { status, message });
    }

    let entries = match map.remove("images") {
        Some(JsonValue::Object(images)) => images,
        Some(_) => return Err(SourceError::Decode("`images` is not an object".to_string())),
        None => map,
    };

    Ok(entries
        .into_iter()
        .map(|(id, url)| (id, url.as_str().map(str::to_string)))
        .collect())
}

/// Depth-first search for a node by id
fn find_node<'v>(node: &'v JsonValue, id: &str) -> Option<&'v JsonValue> {
    if node.get("id").and_then(|v| v.as_str()) == Some(id) {
        return Some(node);
    }
    node.get("children")
        .and_then(|c| c.as_array())?
        .iter()
        .find_map(|child| find_node(child, id))
}

/// Copy of `node` without anything deeper than `depth` levels below it
fn truncate(node: &JsonValue, depth: Option<u32>) -> JsonValue {
    let Some(depth) = depth else {
        return node.clone();
    };

    let mut copy = node.clone();
    prune(&mut copy, depth);
    copy
}

fn prune(node: &mut JsonValue, remaining: u32) {
    let Some(obj) = node.as_object_mut() else {
        return;
    };

    if remaining == 0 {
        obj.remove("children");
        return;
    }

    if let Some(JsonValue::Array(children)) = obj.get_mut("children") {
        for child in children.iter_mut() {
            prune(child, remaining - 1);
        }
    }
}
