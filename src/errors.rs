// ABOUTME: Error types for the inklayers application
// ABOUTME: Provides structured error handling for loading, resolving and exporting slides

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InkError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("SVG parsing error: {0}")]
    XmlError(String),

    #[error("Config file parsing error: {0}")]
    ConfigParseError(String),

    #[error("Config file format error: {0} not found.")]
    MissingKey(String),

    #[error("Error in slide configuration: two slides with the same name found: {0}")]
    DuplicateSlideName(String),

    #[error("Error in slide configuration: slide #{slide} is based on unknown slide '{base}'")]
    UnknownBase { slide: usize, base: String },

    #[error("Error in slide configuration: circular based-on detected among slides {0:?}")]
    CircularBase(Vec<String>),

    #[error("Cannot build a file name from format '{format}' for slide #{slide}")]
    FilenameError { slide: usize, format: String },

    #[error("File type \"{0}\" not supported")]
    UnsupportedInput(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

/// Failure of the `#n-#m` interval grammar. Never fatal: callers fall back to
/// label lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("interval token '{0}' must start with '#'")]
    MissingSentinel(String),

    #[error("interval token '{0}' is not a decimal index")]
    InvalidIndex(String),

    #[error("interval '{0}' has more than two bounds")]
    TooManyBounds(String),
}

impl From<anyhow::Error> for InkError {
    fn from(err: anyhow::Error) -> Self {
        InkError::UnknownError(err.to_string())
    }
}

impl From<quick_xml::Error> for InkError {
    fn from(err: quick_xml::Error) -> Self {
        InkError::XmlError(err.to_string())
    }
}

impl From<serde_json::Error> for InkError {
    fn from(err: serde_json::Error) -> Self {
        InkError::ConfigParseError(format!("JSON: {}", err))
    }
}

impl From<toml::de::Error> for InkError {
    fn from(err: toml::de::Error) -> Self {
        InkError::ConfigParseError(format!("TOML: {}", err))
    }
}

impl From<ini::ParseError> for InkError {
    fn from(err: ini::ParseError) -> Self {
        InkError::ConfigParseError(format!("INI: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, InkError>;
