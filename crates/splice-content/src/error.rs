//! Error types for splice-content

/// Result type for splice-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating or splicing a block
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Start marker not found: {marker:?}")]
    MarkerNotFound { marker: String },

    #[error("End delimiter {delimiter:?} not found after byte {from}")]
    DelimiterNotFound { delimiter: String, from: usize },

    #[error("Invalid block pattern: {message}")]
    InvalidPattern { message: String },
}

impl Error {
    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            message: message.into(),
        }
    }
}
