use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use figtail::{ExtractOptions, FileSource};

#[derive(Parser)]
#[command(name = "figtail")]
#[command(version, about = "Compile a Figma design tree into class-annotated JSON")]
#[command(long_about = "Compile a Figma design tree into class-annotated JSON\n\n\
    Reads a design-file JSON export (file or nodes response), annotates the\n\
    subtree rooted at NODE_ID with utility classes and prints the report.\n\n\
    JSON output is pretty-printed by default with indentation.\n\n  \
    figtail file.json 12:34 [--images images.json] [--depth 3] [--compact] [-v]")]
struct Cli {
    /// Design tree JSON export
    input: PathBuf,

    /// Id of the node to extract
    node_id: String,

    /// Images response JSON mapping node ids to rendered URLs
    #[arg(long)]
    images: Option<PathBuf>,

    /// Extraction options JSON (style tables, image lookup settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum depth below the root node (overrides the config file)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Compact JSON output (default is pretty-printed with indentation)
    #[arg(long)]
    compact: bool,

    /// Verbose output for debugging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    figtail::logging::init_tracing(cli.verbose);

    let mut options = match cli.config.as_ref() {
        Some(path) => ExtractOptions::from_json_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => ExtractOptions::default(),
    };
    if cli.depth.is_some() {
        options.depth = cli.depth;
    }

    let source = FileSource::open(&cli.input, cli.images.as_deref())
        .await
        .with_context(|| format!("Failed to read design export: {}", cli.input.display()))?;

    let report = figtail::extract(&source, &cli.node_id, &options)
        .await
        .with_context(|| format!("Failed to extract node {}", cli.node_id))?;

    // Format output (pretty by default, compact if flag is set)
    let output = if cli.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };

    println!("{}", output);

    Ok(())
}
