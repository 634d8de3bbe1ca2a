use thiserror::Error;

/// Failure reported by a design source
///
/// Keeps transport problems apart from errors the remote API reported itself,
/// so callers can decide how to degrade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Could not decode source response: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Design source unavailable while fetching {root_id}: {source}")]
    SourceUnavailable {
        root_id: String,
        #[source]
        source: SourceError,
    },

    #[error("Node {0} not found in design source")]
    NodeNotFound(String),

    #[error("Root node is malformed: {0}")]
    MalformedRoot(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
