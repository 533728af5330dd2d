// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Malformed markup at byte {offset}: {reason}")]
    MalformedMarkup { offset: usize, reason: String },

    #[error("Chunk is too large ({size} bytes, limit {limit})")]
    ChunkTooLarge { size: usize, limit: usize },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("List field '{0}' has no items")]
    EmptyList(&'static str),

    #[error("Date '{0}' is not a YYYY-MM-DD calendar date")]
    InvalidDate(String),

    #[error("Image at position {0} has an empty src")]
    InvalidImage(usize),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
