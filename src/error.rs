//! Error types for kakapo scripts.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Message carried by every management (write) operation on a collection.
pub const MANAGEMENT_UNAVAILABLE: &str = "management features not currently available";

/// Main error type for kakapo script operations.
#[derive(Error, Debug)]
pub enum KakapoError {
    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, constraint violations, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (malformed payload, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operations that exist in the API but are not available yet.
    #[error("Not implemented: {0}")]
    Unimplemented(String),

    /// Failure raised by a user script handler, passed through untouched.
    #[error(transparent)]
    Handler(anyhow::Error),
}

impl KakapoError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates the error returned by collection write operations.
    pub fn management_unavailable() -> Self {
        Self::Unimplemented(MANAGEMENT_UNAVAILABLE.to_string())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Unimplemented(_) => "Unimplemented",
            Self::Handler(_) => "Script Error",
        }
    }

    /// Returns true if this error is the unimplemented-feature placeholder.
    pub fn is_unimplemented(&self) -> bool {
        matches!(self, Self::Unimplemented(_))
    }
}

/// Result type alias using KakapoError.
pub type Result<T> = std::result::Result<T, KakapoError>;
