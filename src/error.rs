use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("retries must be at least 1 (got {0})")]
    InvalidRetries(u32),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode run config: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Engine exited with code {0} before reporting results")]
    NonZeroExit(i32),

    #[error("Failed to read engine results from '{path}': {source}")]
    ReadResults {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode engine results: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum RetryError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Engine reported {failures} failure(s): {}", .message.as_deref().unwrap_or("no message"))]
    EngineFailure {
        failures: u64,
        message: Option<String>,
    },

    #[error("Run #{attempt} reported {total_failed} failed test(s) but no failing spec")]
    InconsistentResult { attempt: u32, total_failed: u64 },
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write summary: {0}")]
    WriteSummary(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
