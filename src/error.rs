use std::path::PathBuf;

use thiserror::Error;

use crate::diagram::Endpoint;

/// Malformed diagram input. Raised before any simulation tick runs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("entity {index} has no name")]
    MissingName { index: usize },
    #[error("relation {relation} has {endpoint} index {index}, but only {count} entities exist")]
    DanglingRelation {
        relation: usize,
        endpoint: Endpoint,
        index: usize,
        count: usize,
    },
}

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("render surface `{0}` is not available")]
    SurfaceUnavailable(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {origin}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
