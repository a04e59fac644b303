//! Error types for the Pathwise engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Pathwise workspace.
///
/// Variants are structured so that callers can decide between re-prompting,
/// degrading, or resetting a session without parsing messages.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PathwiseError {
    /// Malformed request or parameter (bad importance, empty distribution, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A downstream collaborator failed
    #[error("Collaborator '{collaborator}' unavailable: {message}")]
    CollaboratorUnavailable {
        collaborator: String,
        message: String,
    },

    /// A downstream collaborator did not answer in time
    #[error("Collaborator '{collaborator}' timed out after {after_ms}ms")]
    Timeout { collaborator: String, after_ms: u64 },

    /// The dialog store handed back something the state machine cannot accept
    #[error("Dialog state corrupted for user '{user_id}': {message}")]
    StateCorruption { user_id: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PathwiseError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a CollaboratorUnavailable error
    pub fn unavailable(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CollaboratorUnavailable {
            collaborator: collaborator.into(),
            message: message.into(),
        }
    }

    /// Creates a Timeout error
    pub fn timeout(collaborator: impl Into<String>, after_ms: u64) -> Self {
        Self::Timeout {
            collaborator: collaborator.into(),
            after_ms,
        }
    }

    /// Creates a StateCorruption error
    pub fn state_corruption(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StateCorruption {
            user_id: user_id.into(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an InvalidInput error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is a StateCorruption error
    pub fn is_state_corruption(&self) -> bool {
        matches!(self, Self::StateCorruption { .. })
    }

    /// Check if a collaborator failed or timed out.
    ///
    /// The pipeline logs these as expected degradation; the server maps them
    /// to `503`.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::CollaboratorUnavailable { .. } | Self::Timeout { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PathwiseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PathwiseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PathwiseError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PathwiseError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at binary boundaries)
impl From<anyhow::Error> for PathwiseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, PathwiseError>`.
pub type Result<T> = std::result::Result<T, PathwiseError>;
