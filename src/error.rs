//! Unified error type for all patternlog operations.

use std::path::PathBuf;

use crate::pattern::PatternError;

/// Error type for patternlog operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error from a file or console sink.
    Io(std::io::Error),
    /// Malformed format pattern, rejected at compile time.
    Pattern(PatternError),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// A writer property is missing (e.g. `file` for a file-backed writer).
    MissingProperty(&'static str),
    /// A writer property holds a value that cannot be interpreted.
    InvalidProperty { key: &'static str, value: String },
    /// Unknown writer `type` in configuration.
    UnknownWriter(String),
    /// Unknown rotation policy name in configuration.
    UnknownPolicy(String),
    /// Invalid log level string.
    InvalidLevel(String),
    /// A structured log file does not contain the expected array delimiter.
    CorruptFile(PathBuf),
    /// Operation on a writer that has already been closed.
    Closed,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Pattern(e) => write!(f, "pattern error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
            Self::MissingProperty(key) => write!(f, "missing writer property: {key}"),
            Self::InvalidProperty { key, value } => {
                write!(f, "invalid value '{value}' for writer property '{key}'")
            }
            Self::UnknownWriter(name) => write!(f, "unknown writer type: {name}"),
            Self::UnknownPolicy(name) => write!(f, "unknown rotation policy: {name}"),
            Self::InvalidLevel(level) => write!(f, "invalid log level: {level}"),
            Self::CorruptFile(path) => write!(
                f,
                "no closing array bracket found in {}",
                path.display()
            ),
            Self::Closed => write!(f, "writer is closed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Pattern(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<PatternError> for Error {
    fn from(e: PatternError) -> Self {
        Self::Pattern(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}
