//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Form(#[from] crate::form::FormError),

    #[error("Invalid image locator: {0}")]
    InvalidLocator(String),
}

pub type Result<T> = std::result::Result<T, Error>;
