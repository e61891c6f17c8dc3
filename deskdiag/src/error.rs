// ABOUTME: defines the engine error type for the few paths that are errors rather than result data.
// ABOUTME: execution outcomes are never errors; they travel as fields on ExecutionResult.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The safety validator refused the command. Nothing was spawned.
    #[error("command rejected: {reason}")]
    Rejected { reason: String },

    /// A caller-supplied probe target carried shell metacharacters.
    #[error("invalid probe target {target:?}")]
    InvalidTarget { target: String },

    #[error("read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
