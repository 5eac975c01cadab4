//! Error types for the navigator
//!
//! Only decoding entry points and layout application can fail. The
//! interactive path (layout, virtualization, selection, input) degrades
//! instead of erroring.

use thiserror::Error;

/// Errors that can occur while decoding input or applying a layout
#[derive(Error, Debug)]
pub enum NavError {
    /// A JSON or YAML document could not be decoded
    #[error("parse error: {0}")]
    Parse(String),

    /// A layout result was computed for a different graph generation
    #[error("stale layout: graph is at generation {expected}, result is from generation {found}")]
    StaleLayout { expected: u64, found: u64 },
}

impl From<serde_json::Error> for NavError {
    fn from(err: serde_json::Error) -> Self {
        NavError::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for NavError {
    fn from(err: serde_yaml::Error) -> Self {
        NavError::Parse(err.to_string())
    }
}

/// Result type for navigator operations
pub type NavResult<T> = Result<T, NavError>;
