//! Error types for OKRA.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire OKRA workspace.
///
/// Variants follow the remote-service failure taxonomy: some are item-level
/// (swallowed by the batch adapters with a safe default), others are fatal for
/// the path that raised them.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum OkraError {
    /// 401/403 from the remote service. Fatal, never retried.
    #[error("Authentication failed ({status}) for '{path}'")]
    Auth { status: u16, path: String },

    /// 404 from the remote service.
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// 429 from the remote service. The client has already waited
    /// `retry_after_secs` before reporting this.
    #[error("Rate limited on '{path}' (waited {retry_after_secs}s)")]
    RateLimited { path: String, retry_after_secs: u64 },

    /// A response that cannot be trusted as JSON (HTML error page, garbage).
    #[error("Malformed response from '{path}': {reason}")]
    MalformedResponse { path: String, reason: String },

    /// Any other non-success HTTP status.
    #[error("HTTP {status} from '{path}'")]
    Http { status: u16, path: String },

    /// One or more session identifiers did not match any known session.
    #[error(
        "Could not resolve session(s): {}. Available sessions: {}",
        unresolved.join(", "),
        available.join(", ")
    )]
    UnresolvedIdentifiers {
        unresolved: Vec<String>,
        available: Vec<String>,
    },

    /// Network-level failure of a request or of a whole batch chunk.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OkraError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates a MalformedResponse error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Maps an HTTP status code onto the taxonomy.
    ///
    /// 429 maps to `RateLimited` with no wait recorded; callers that actually
    /// waited should build the variant themselves.
    pub fn from_status(status: u16, path: impl Into<String>) -> Self {
        let path = path.into();
        match status {
            401 | 403 => Self::Auth { status, path },
            404 => Self::NotFound { path },
            429 => Self::RateLimited {
                path,
                retry_after_secs: 0,
            },
            _ => Self::Http { status, path },
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a rate-limit error
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Check if this is a malformed-response error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for OkraError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for OkraError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for OkraError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, OkraError>`.
pub type Result<T> = std::result::Result<T, OkraError>;
