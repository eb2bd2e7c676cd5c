//! Error types for loading datasets, reading profiles and writing reports.
//!
//! Parsing individual cells never fails (see [`crate::analyser::logic::parsing`]);
//! everything in here is fatal for a run and is raised before any report
//! line is written.

use std::fmt;

#[derive(Debug)]
pub enum SocialStatsError {
    /// I/O errors (reading inputs, writing report sinks)
    Io(std::io::Error),

    /// Table loading or column extraction errors
    DataProcessing(String),

    /// Invalid or unreadable profile
    Config(String),

    /// Input file missing or not a file
    InvalidPath(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for SocialStatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::InvalidPath(msg) => write!(f, "Invalid path: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SocialStatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SocialStatsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for SocialStatsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for SocialStatsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for SocialStatsError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SocialStatsError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SocialStatsError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(msg.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(f(), e.into()))
    }
}

/// Keeps the variant so callers can still match on the failure category.
fn wrap(msg: String, err: SocialStatsError) -> SocialStatsError {
    match err {
        SocialStatsError::Io(e) => {
            SocialStatsError::Io(std::io::Error::new(e.kind(), format!("{msg}: {e}")))
        }
        SocialStatsError::DataProcessing(inner) => {
            SocialStatsError::DataProcessing(format!("{msg}: {inner}"))
        }
        SocialStatsError::Config(inner) => SocialStatsError::Config(format!("{msg}: {inner}")),
        SocialStatsError::InvalidPath(inner) => {
            SocialStatsError::InvalidPath(format!("{msg}: {inner}"))
        }
        SocialStatsError::Other(inner) => SocialStatsError::Other(format!("{msg}: {inner}")),
    }
}
