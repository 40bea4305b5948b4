// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("expected 21 hand landmarks, got {0}")]
    LandmarkCount(usize),
    #[error("landmark {0} has a non-finite coordinate")]
    NonFinite(usize),
}

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("failed to start landmark detector `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("landmark detector did not signal ready, got {0:?}")]
    Handshake(String),

    #[error("landmark detector closed its pipe")]
    Closed,

    #[error("landmark detector i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed detector response {line:?}: {source}")]
    Protocol {
        line: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open camera {index}: {message}")]
    Open { index: u32, message: String },

    #[error("failed to open camera stream: {0}")]
    Stream(String),

    #[error("failed to capture frame: {0}")]
    Frame(String),

    #[error("failed to decode frame: {0}")]
    Decode(String),
}
