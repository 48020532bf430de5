//! Error types for the air-quality overlay crates.

use thiserror::Error;

use crate::geo::GeoError;
use crate::grid::GridError;

/// Result type alias using AqError.
pub type AqResult<T> = Result<T, AqError>;

/// Primary error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AqError {
    // === Not an error: superseded request ===
    #[error("Request superseded")]
    Cancelled,

    // === Transport failures ===
    #[error("Data service unreachable: {0}")]
    Transport(String),

    #[error("Data service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Request timeout")]
    Timeout,

    // === Service-reported failures ===
    #[error("Data service error: {0}")]
    Service(String),

    // === Malformed payloads ===
    #[error("Malformed grid: {0}")]
    MalformedGrid(#[from] GridError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    // === Caller input ===
    #[error("Invalid viewport: {0}")]
    InvalidViewport(#[from] GeoError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Coarse classes of [`AqError`], used for logging and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Cancelled,
    Transport,
    Service,
    Malformed,
    InvalidInput,
}

impl ErrorClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::Cancelled => "cancelled",
            ErrorClass::Transport => "transport",
            ErrorClass::Service => "service",
            ErrorClass::Malformed => "malformed",
            ErrorClass::InvalidInput => "invalid_input",
        }
    }
}

impl AqError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AqError::Cancelled => ErrorClass::Cancelled,
            AqError::Transport(_) | AqError::HttpStatus(_) | AqError::Timeout => {
                ErrorClass::Transport
            }
            AqError::Service(_) => ErrorClass::Service,
            AqError::MalformedGrid(_) | AqError::MalformedPayload(_) | AqError::Decode(_) => {
                ErrorClass::Malformed
            }
            AqError::InvalidViewport(_) | AqError::Config(_) => ErrorClass::InvalidInput,
        }
    }

    /// Superseded requests are dropped without telling the user.
    pub fn is_silent(&self) -> bool {
        self.class() == ErrorClass::Cancelled
    }

    /// Text shown to the user for this error.
    ///
    /// Malformed payloads get a generic message; their detail goes to logs.
    pub fn advisory_message(&self) -> String {
        match self {
            AqError::Cancelled => String::new(),
            AqError::Transport(_) | AqError::Timeout => "Backend unreachable".to_string(),
            AqError::HttpStatus(code) => format!("Air-quality service failed (HTTP {})", code),
            AqError::Service(message) => message.clone(),
            AqError::MalformedGrid(_) | AqError::MalformedPayload(_) | AqError::Decode(_) => {
                "Received unusable data from the air-quality service".to_string()
            }
            AqError::InvalidViewport(e) => e.to_string(),
            AqError::Config(message) => message.clone(),
        }
    }
}

impl From<serde_json::Error> for AqError {
    fn from(err: serde_json::Error) -> Self {
        AqError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_silent() {
        assert!(AqError::Cancelled.is_silent());
        assert!(!AqError::Transport("refused".into()).is_silent());
        assert!(!AqError::Service("quota".into()).is_silent());
    }

    #[test]
    fn test_malformed_advisory_is_generic() {
        let err = AqError::from(GridError::Empty);
        assert_eq!(err.class(), ErrorClass::Malformed);
        assert!(!err.advisory_message().contains("empty"));
    }

    #[test]
    fn test_service_advisory_passes_message() {
        let err = AqError::Service("Location not found".into());
        assert_eq!(err.advisory_message(), "Location not found");
        assert_eq!(err.class().as_str(), "service");
    }
}
