//! Error types for stepgate
//!
//! Validation problems are never errors here; they are returned as
//! `ValidationResult` data. These variants cover configuration and
//! transport plumbing only.

use thiserror::Error;

/// All error types that can occur in stepgate
#[derive(Debug, Error)]
pub enum GateError {
    /// Configuration could not be loaded or is inconsistent
    #[error("Config error: {0}")]
    Config(String),

    /// Notification transport rejected a delivery
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for stepgate operations
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = GateError::Config("final-step must be > 0".to_string());
        assert_eq!(err.to_string(), "Config error: final-step must be > 0");
    }

    #[test]
    fn test_transport_error() {
        let err = GateError::Transport("channel not found".to_string());
        assert_eq!(err.to_string(), "Transport error: channel not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GateError = io_err.into();
        assert!(matches!(err, GateError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: GateError = json_err.into();
        assert!(matches!(err, GateError::Json(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [1, 2").unwrap_err();
        let err: GateError = yaml_err.into();
        assert!(matches!(err, GateError::Yaml(_)));
    }
}
