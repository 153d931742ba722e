use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BelignError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BelignError>;

/// A single malformed statement, recorded per statement and surfaced in the
/// report. Never aborts a run and never counts toward one-sided findings.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("parse error at byte {position}: {message} (near `{fragment}`)")]
pub struct ParseError {
    pub message: String,
    /// The offending slice of the input, truncated for readability.
    pub fragment: String,
    /// Byte offset into the raw statement where the problem was detected.
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, input: &str, position: usize) -> Self {
        let end = (position + 24).min(input.len());
        // Clamp to char boundaries so slicing never panics on multibyte input.
        let start = floor_char_boundary(input, position.min(input.len()));
        let end = floor_char_boundary(input, end);
        Self {
            message: message.into(),
            fragment: input[start..end].to_string(),
            position,
        }
    }
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
