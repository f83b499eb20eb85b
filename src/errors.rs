//! Unified error type for `MoneyBuddy`.
//!
//! Every fallible operation in the crate returns [`Result`]. The router decides which
//! variants are shown to users and which are only logged.

use thiserror::Error;

/// All errors produced by the library and the bot binary.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration (config.toml, environment)
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Any failure reported by the persistence layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The owner has no (non-deleted) transactions to operate on
    #[error("No transactions found for owner {owner_id}")]
    NoTransactions {
        /// Chat-platform user id that owns the ledger
        owner_id: i64,
    },

    /// The remote classifier could not produce a valid category
    #[error("Classification failed: {message}")]
    Classification {
        /// What went wrong (transport, status, unknown category, ...)
        message: String,
    },

    /// CSV encoding failure during export
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (config file, database directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A reply could not be delivered in time
    #[error("Delivery failed: {message}")]
    Delivery {
        /// What was being sent and why it failed
        message: String,
    },

    /// Error raised by serenity/poise
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for building a [`Error::Classification`].
    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
