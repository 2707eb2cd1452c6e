//! Error types for the simulation engine
//!
//! The tick itself never fails: illegal actions are silently ignored. Errors
//! only surface from construction, configuration and history export.

use thiserror::Error;

/// Errors returned by construction, configuration and export APIs
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] validator::ValidationErrors),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown match state tag: {0}")]
    UnknownState(u8),

    #[error("Unknown action tag: {0}")]
    UnknownAction(u8),

    #[error("Roster size mismatch: expected {expected} players, found {found}")]
    RosterMismatch { expected: usize, found: usize },
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::UnknownState(42);
        assert_eq!(err.to_string(), "Unknown match state tag: 42");

        let err = SimError::RosterMismatch { expected: 4, found: 3 };
        assert!(err.to_string().contains("expected 4"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SimError = io.into();
        assert!(matches!(err, SimError::Io(_)));
    }
}
