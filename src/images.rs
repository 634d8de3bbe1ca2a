//! Image URL resolution.
//!
//! Image-filled nodes are collected during the walk, looked up in one
//! batched request, and merged back onto a copy of the annotated tree. Any
//! failure of the lookup degrades to "no image URLs"; it never fails the run.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use tracing::{debug, info, warn};

use crate::config::ImageResolverConfig;
use crate::source::DesignSource;
use crate::tree::AnnotatedNode;

/// Resolved image URL per node id
pub type ImageMap = BTreeMap<String, String>;

/// Ids of every node of `tree` whose first visible fill is an image
pub fn collect_image_node_ids(tree: &AnnotatedNode) -> BTreeSet<String> {
    tree.iter()
        .filter(|node| node.has_image_fill)
        .map(|node| node.id.clone())
        .collect()
}

/// Resolve image URLs for a set of node ids
///
/// Issues one batched request per attempt. Each attempt is bounded by
/// `config.timeout()`; failed attempts are retried up to
/// `config.max_attempts` with a linear backoff. Ids the source has no URL
/// for are left out of the result.
///
/// # Arguments
/// * `source` - The design source to query
/// * `ids` - Node ids to resolve
/// * `config` - Timeout and retry settings
///
/// # Returns
/// The resolved URLs, or an empty map if every attempt failed.
pub async fn resolve_images<S>(source: &S, ids: &BTreeSet<String>, config: &ImageResolverConfig) -> ImageMap
where
    S: DesignSource + ?Sized,
{
    if ids.is_empty() {
        return ImageMap::new();
    }

    let attempts = config.max_attempts.max(1);

    for attempt in 1..=attempts {
        match tokio::time::timeout(config.timeout(), source.fetch_image_urls(ids)).await {
            Ok(Ok(urls)) => {
                let resolved: ImageMap = urls
                    .into_iter()
                    .filter_map(|(id, url)| match url {
                        Some(url) => Some((id, url)),
                        None => {
                            debug!(node = %id, "No image URL returned");
                            None
                        }
                    })
                    .collect();
                info!(requested = ids.len(), resolved = resolved.len(), "Resolved image URLs");
                return resolved;
            }
            Ok(Err(e)) => {
                warn!(attempt, attempts, error = %e, "Image URL request failed");
            }
            Err(_) => {
                warn!(attempt, attempts, timeout_ms = config.timeout_ms, "Image URL request timed out");
            }
        }

        if attempt < attempts {
            tokio::time::sleep(config.backoff(attempt)).await;
        }
    }

    warn!(requested = ids.len(), "Continuing without image URLs");
    ImageMap::new()
}

/// Like [`resolve_images`], but gives up as soon as `cancel` completes
///
/// Cancellation yields an empty map, exactly like a failed lookup.
pub async fn resolve_images_until<S, C>(
    source: &S,
    ids: &BTreeSet<String>,
    config: &ImageResolverConfig,
    cancel: C,
) -> ImageMap
where
    S: DesignSource + ?Sized,
    C: Future<Output = ()>,
{
    tokio::select! {
        urls = resolve_images(source, ids, config) => urls,
        _ = cancel => {
            warn!(requested = ids.len(), "Image URL lookup cancelled");
            ImageMap::new()
        }
    }
}

/// Copy of `tree` with resolved URLs attached by node id
pub fn merge_image_urls(tree: &AnnotatedNode, urls: &ImageMap) -> AnnotatedNode {
    AnnotatedNode {
        image_url: urls.get(&tree.id).cloned().or_else(|| tree.image_url.clone()),
        children: tree
            .children
            .iter()
            .map(|child| merge_image_urls(child, urls))
            .collect(),
        ..tree.clone_shallow()
    }
}

impl AnnotatedNode {
    /// Clone of this node without its children
    fn clone_shallow(&self) -> AnnotatedNode {
        AnnotatedNode {
            id: self.id.clone(),
            name: self.name.clone(),
            node_type: self.node_type,
            depth: self.depth,
            visible: self.visible,
            class_tokens: self.class_tokens.clone(),
            class_name: self.class_name.clone(),
            children_count: self.children_count,
            characters: self.characters.clone(),
            component_id: self.component_id.clone(),
            has_image_fill: self.has_image_fill,
            image_url: self.image_url.clone(),
            children: Vec::new(),
        }
    }
}
