//! Service-level error taxonomy.
//!
//! Transform diagnostics are plain data (`TranspileError`) and never flow
//! through this type; everything a long-lived service can fail with does.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid engine configuration: {0}")]
    Config(String),

    #[error("Unknown stylesheet: {id}")]
    UnknownStylesheet { id: String },

    #[error("Compiler not initialized")]
    CompilerNotInitialized,

    #[error("CSS worker failed to initialize: {0}")]
    WorkerInit(String),

    #[error("CSS compilation failed: {0}")]
    Compile(String),

    #[error("Failed to load module: {0}")]
    ModuleLoad(String),

    #[error("Channel '{0}' is closed")]
    ChannelClosed(&'static str),

    #[error("{what} exceeds {limit} byte limit")]
    TooLarge { what: &'static str, limit: usize },

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Host '{host}' is not allowed")]
    PrivateHost { host: String },

    #[error("Malformed registry document: {0}")]
    MalformedRegistry(String),

    #[error("Registry item has no usable file")]
    NoUsableFile,

    #[error("Malformed example index: {0}")]
    MalformedIndex(String),

    #[error("Failed to read '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Snippet '{id}' not found")]
    SnippetNotFound { id: String },
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}
