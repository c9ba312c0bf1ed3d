//! Error types for the VentureLens client core.

use thiserror::Error;

/// Reasons a submission is refused before any side effect happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("description must not be empty")]
    EmptyDescription,

    /// The shared-password gate has not been passed in this session.
    #[error("access has not been granted for this session")]
    AccessNotGranted,

    /// Another analysis request is still outstanding.
    #[error("an analysis request is already in flight")]
    RequestInFlight,
}

/// A shared error type for the VentureLens client.
///
/// Variants mirror the failure classes the session controller distinguishes
/// internally. Only [`LensError::Validation`] is ever shown to the user
/// verbatim; everything else collapses into a generic failure notice.
#[derive(Error, Debug, Clone)]
pub enum LensError {
    /// Input or session-state validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The auth endpoint was unreachable or returned no usable token
    #[error("Token acquisition failed: {0}")]
    TokenAcquisition(String),

    /// A stored token could not be decoded
    #[error("Malformed token")]
    MalformedToken,

    /// Password verification returned a negative status
    #[error("Access denied")]
    AccessDenied,

    /// The analysis call failed at the transport or returned a non-success response
    #[error("Analysis request failed: {0}")]
    AnalysisRequest(String),

    /// A remote call outside the token and analysis paths failed in transit
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistence layer error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LensError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn token_acquisition(message: impl Into<String>) -> Self {
        Self::TokenAcquisition(message.into())
    }

    pub fn analysis_request(message: impl Into<String>) -> Self {
        Self::AnalysisRequest(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_token_acquisition(&self) -> bool {
        matches!(self, Self::TokenAcquisition(_))
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied)
    }

    pub fn is_analysis_request(&self) -> bool {
        matches!(self, Self::AnalysisRequest(_))
    }

    /// Returns the validation cause, if this is a validation error.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// Short, stable label used as a structured field in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::TokenAcquisition(_) => "token_acquisition",
            Self::MalformedToken => "malformed_token",
            Self::AccessDenied => "access_denied",
            Self::AnalysisRequest(_) => "analysis_request",
            Self::Transport(_) => "transport",
            Self::Io { .. } => "io",
            Self::Serialization { .. } => "serialization",
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LensError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LensError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, LensError>`.
pub type Result<T> = std::result::Result<T, LensError>;
