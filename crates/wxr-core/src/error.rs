//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Replay engine error types."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("tick interval must be greater than zero")]
    InvalidTickInterval,
    #[error("record channel capacity must be greater than zero")]
    InvalidChannelCapacity,
    #[error("unsupported source format: {0}")]
    UnsupportedFormat(String),
    #[error("unable to read source {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("playback task failed: {0}")]
    Scheduler(#[from] tokio::task::JoinError),
    #[error("json deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml deserialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("csv deserialization error: {0}")]
    Csv(#[from] csv::Error),
}
