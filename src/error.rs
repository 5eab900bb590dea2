//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout orgctl.
//! All errors are structured and map to stable error codes.
//!
//! # Error Categories
//! - `ResolutionFailure`: a name/title matched zero or more-than-one rows
//!   where exactly one was required
//! - `ConstraintViolation`: storage rejected a write (uniqueness, NOT NULL,
//!   foreign key, CHECK)
//! - `ConnectionFailed`: the database could not be opened
//! - `QueryFailed`: statement preparation or execution failure
//! - `InvalidInput`: malformed caller input (e.g., an unsplittable display name)
//! - `ConfigError`: configuration file or registry errors
//! - `PromptFailed`: the interactive terminal layer failed
//!
//! A filtered read returning zero rows is *not* an error anywhere in this
//! crate; it is an empty result.

use thiserror::Error;

/// Main error type for orgctl operations
#[derive(Error, Debug)]
pub enum OrgError {
    /// A name or title supplied for foreign-key resolution matched zero or
    /// more-than-one rows where exactly one was required
    #[error("Could not resolve {entity} \"{input}\": {matches} matches where exactly one was required")]
    ResolutionFailure {
        /// Entity kind being resolved ("employee", "role", "department")
        entity: &'static str,
        /// The human-entered name or title
        input: String,
        /// Number of rows that matched
        matches: usize,
    },

    /// Storage rejected a write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database could not be opened
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Statement preparation or execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Invalid input or missing required parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (file not found, invalid JSON, etc.)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Interactive prompt failure (EOF, broken terminal)
    #[error("Prompt failed: {0}")]
    PromptFailed(String),
}

impl OrgError {
    /// Convert error to a stable error code string
    ///
    /// Error codes are stable and suitable for programmatic handling.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ResolutionFailure { .. } => "RESOLUTION_FAILED",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::QueryFailed(_) => "QUERY_FAILED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::PromptFailed(_) => "PROMPT_FAILED",
        }
    }

    /// Get the human-readable error message
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create a resolution failure for a named entity
    pub fn resolution(entity: &'static str, input: impl Into<String>, matches: usize) -> Self {
        Self::ResolutionFailure { entity, input: input.into(), matches }
    }

    /// Create a constraint violation error
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::ConstraintViolation(message.into())
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

impl From<dialoguer::Error> for OrgError {
    fn from(err: dialoguer::Error) -> Self {
        Self::PromptFailed(err.to_string())
    }
}

/// Result type alias for orgctl operations
pub type Result<T> = std::result::Result<T, OrgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(OrgError::resolution("employee", "Ada Lovelace", 0).error_code(), "RESOLUTION_FAILED");
        assert_eq!(OrgError::constraint("test").error_code(), "CONSTRAINT_VIOLATION");
        assert_eq!(OrgError::connection_failed("test").error_code(), "CONNECTION_FAILED");
        assert_eq!(OrgError::query_failed("test").error_code(), "QUERY_FAILED");
        assert_eq!(OrgError::invalid_input("test").error_code(), "INVALID_INPUT");
        assert_eq!(OrgError::config_error("test").error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_resolution_message_carries_cardinality() {
        let err = OrgError::resolution("employee", "Sam Smith", 2);
        assert!(err.message().contains("employee"));
        assert!(err.message().contains("Sam Smith"));
        assert!(err.message().contains("2 matches"));

        let err = OrgError::resolution("role", "Engineer", 0);
        assert!(err.message().contains("0 matches"));
    }

    #[test]
    fn test_error_messages() {
        let err = OrgError::constraint("UNIQUE constraint failed: department.name");
        assert!(err.message().contains("department.name"));

        let err = OrgError::connection_failed("unable to open database file");
        assert!(err.message().contains("unable to open"));
    }

    #[test]
    fn test_error_constructors() {
        let err = OrgError::resolution("department", "Sales", 3);
        assert!(matches!(err, OrgError::ResolutionFailure { matches: 3, .. }));

        let err = OrgError::constraint("test");
        assert!(matches!(err, OrgError::ConstraintViolation(_)));

        let err = OrgError::query_failed("test");
        assert!(matches!(err, OrgError::QueryFailed(_)));

        let err = OrgError::invalid_input("test");
        assert!(matches!(err, OrgError::InvalidInput(_)));

        let err = OrgError::config_error("test");
        assert!(matches!(err, OrgError::ConfigError(_)));
    }
}
