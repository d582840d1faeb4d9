//! Error types for spendview-data

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("Invalid page cursor: {cursor}")]
    InvalidCursor { cursor: String },

    #[error("Employee id cannot be empty")]
    EmptyEmployeeId,

    #[error("Invalid fixture data: {message}")]
    InvalidData { message: String },

    #[error("IO error")]
    Io(#[from] io::Error),
}

impl ProviderError {
    /// Shorthand for an unavailable provider
    pub fn unavailable(message: impl Into<String>) -> Self {
        ProviderError::Unavailable { message: message.into() }
    }
}
