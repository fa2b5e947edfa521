use thiserror::Error;

/// Common error types used across the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
