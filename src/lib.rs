//! # figtail
//!
//! A library for compiling Figma design trees into utility-class annotated
//! JSON.
//!
//! Every node of the tree gets an ordered list of class tokens derived from
//! its layout, fills, strokes, typography and effects. Colors snap to a named
//! palette and measurements to discrete scales, falling back to
//! arbitrary-value tokens (`w-[320px]`, `bg-[rgb(26,51,77)]`) when nothing
//! matches exactly. The report also carries component/instance usage and
//! node tallies.
//!
//! ## Example
//!
//! ```no_run
//! use figtail::{extract, ExtractOptions, FileSource};
//! use std::path::Path;
//!
//! # async fn run() -> figtail::Result<()> {
//! let source = FileSource::open(Path::new("file.json"), Some(Path::new("images.json"))).await?;
//! let report = extract(&source, "12:34", &ExtractOptions::default()).await?;
//!
//! println!("Root: {} ({} descendants)", report.root_name, report.total_descendants);
//! println!("Classes: {}", report.tree.class_name);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod images;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod style;
pub mod tree;
pub mod types;

// Re-export commonly used items
pub use config::{ExtractOptions, ImageResolverConfig, StyleConfig};
pub use error::{ExtractError, Result, SourceError};
pub use images::{collect_image_node_ids, merge_image_urls, resolve_images, ImageMap};
pub use pipeline::{extract, extract_until};
pub use report::{build_report, ExtractionReport};
pub use source::{DesignSource, FileSource, ImageUrls};
pub use tree::{AnnotatedNode, TreeStats, TreeWalker};
pub use types::{Node, NodeKind, NodeType};
