//! Error types for content conversion

use thiserror::Error;

/// Errors that can occur while building or converting content
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The serialized form carries no recognized representation tag
    #[error("Invalid serialized content: {0}")]
    InvalidFormat(String),

    /// No representation is available to serialize or convert from
    #[error("No content")]
    NoContent,

    /// Binary data or a data URL was requested without a content type
    #[error("Content type required: {0}")]
    ContentTypeRequired(String),

    /// The string does not have the `data:<type>;base64,<payload>` shape
    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),

    /// A character outside the base64 alphabet was found while decoding
    #[error("Invalid base64 character {character:?} at position {position}")]
    InvalidCharacter {
        /// The offending character
        character: char,
        /// Character index in the input with line breaks removed
        position: usize,
    },

    /// The operation needs a platform buffer implementation that is not configured
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The value handed to binary construction is not a recognized buffer
    #[error("Not a buffer: {0}")]
    NotABuffer(String),
}

/// Result type using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidFormat(err.to_string())
    }
}
