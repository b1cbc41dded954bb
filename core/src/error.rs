//! Error types for pacebench-core

use thiserror::Error;

/// Core error type
///
/// Only fallible edges surface here. Run termination (count exhausted,
/// duration elapsed, interrupt) is never an error.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A required builder field was not provided
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Workload error
    #[error("workload error: {0}")]
    Workload(String),

    /// Config file could not be parsed
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Build a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a missing-field error
    pub fn missing_config(field: &'static str) -> Self {
        Self::MissingConfig(field)
    }

    /// Build a workload error
    pub fn workload(msg: impl Into<String>) -> Self {
        Self::Workload(msg.into())
    }
}

/// Result type alias
pub type BenchResult<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BenchError::missing_config("workload").to_string(),
            "missing required configuration: workload"
        );
        assert_eq!(
            BenchError::config("bad rate").to_string(),
            "configuration error: bad rate"
        );
    }

    #[test]
    fn test_parse_error_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: BenchError = err.into();
        assert!(matches!(err, BenchError::Parse(_)));
    }
}
