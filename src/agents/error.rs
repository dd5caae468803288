//! Agent errors
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error from a learning agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("checkpoint I/O on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid checkpoint {path:?}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("parameter update failed: {0}")]
    Update(String),
}
