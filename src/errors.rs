//! Unified error types for the crate.

use thiserror::Error;

/// Every failure a core, config or database operation can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be loaded or are malformed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Failure reported by the database driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No row with this identifier
    #[error("{entity} {id} does not exist")]
    NotFound {
        /// Kind of record looked up
        entity: &'static str,
        /// Identifier that was not found
        id: i64,
    },

    /// Caller input breaks a business rule
    #[error("Validation error: {message}")]
    Validation {
        /// Which rule was broken
        message: String,
    },

    /// A quantity is out of range for the operation
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// A stock change would leave a negative quantity
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// Units currently held
        available: i64,
        /// Units asked for
        requested: i64,
    },

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the error was caused by caller input rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidQuantity { .. } | Self::InsufficientStock { .. }
        )
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
