//! Error handling module for shotty
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Provider failures are flattened into [`ShottyError::Provider`] so callers never
//! depend on SDK error generics.

use thiserror::Error;

/// Main error type for shotty
#[derive(Error, Debug)]
pub enum ShottyError {
    /// IO errors (writing rows, reading config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (settings values, CLI input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A call to the cloud provider failed
    #[error("{action} {resource} failed: {message}")]
    Provider {
        action: &'static str,
        resource: String,
        message: String,
    },

    /// An instance did not reach the target state in time
    #[error("timed out waiting for {instance_id} to become {target}")]
    WaitTimeout { instance_id: String, target: String },

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for shotty operations
pub type Result<T> = std::result::Result<T, ShottyError>;

// Convenient error constructors
impl ShottyError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a provider error for `action` on `resource`
    pub fn provider(
        action: &'static str,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            action,
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Create a wait timeout error
    pub fn wait_timeout(instance_id: impl Into<String>, target: impl Into<String>) -> Self {
        Self::WaitTimeout {
            instance_id: instance_id.into(),
            target: target.into(),
        }
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }

    /// True for failures reported by the cloud provider, including wait timeouts.
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::WaitTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShottyError::config("missing file");
        assert_eq!(err.to_string(), "Configuration error: missing file");

        let err = ShottyError::validation("profile must not be empty");
        assert_eq!(err.to_string(), "Validation error: profile must not be empty");
    }

    #[test]
    fn test_provider_error_display() {
        let err = ShottyError::provider("stop", "i-0abc", "IncorrectInstanceState");
        assert_eq!(err.to_string(), "stop i-0abc failed: IncorrectInstanceState");
        assert!(err.is_provider());

        let err = ShottyError::wait_timeout("i-0abc", "stopped");
        assert_eq!(
            err.to_string(),
            "timed out waiting for i-0abc to become stopped"
        );
        assert!(err.is_provider());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ShottyError = io_err.into();
        assert!(matches!(err, ShottyError::Io(_)));
        assert!(!err.is_provider());
    }
}
