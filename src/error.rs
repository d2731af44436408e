//! Error types for colorcode

use thiserror::Error;

/// Result type alias for colorcode operations
pub type Result<T> = std::result::Result<T, ColorCodeError>;

/// Crate error types
#[derive(Error, Debug)]
pub enum ColorCodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Cannot write config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Cannot build term pattern: {0}")]
    Pattern(#[from] fancy_regex::Error),

    #[error("Cannot build term pattern: {0}")]
    TermPattern(#[from] regex::Error),

    #[error("Color table is empty. Configure your color mappings first.")]
    EmptyDictionary,

    #[error("Batch has {count} notes, more than the limit of {limit}")]
    TooManyNotes { count: usize, limit: usize },

    #[error("Could not determine config file path")]
    NoConfigPath,

    #[error("{0}")]
    Message(String),
}
