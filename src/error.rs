//! Error types for typed error handling.
//!
//! Every failure the core can report is a variant here. Controllers turn
//! them into user-visible effects (view updates, notifications); the binary
//! wraps them in `anyhow` with additional context.

use crate::upload::Phase;

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Library errors with structured context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Listing request failed in transport or returned a non-success status.
    #[error("listing fetch failed: {reason}")]
    Fetch { reason: String },

    /// Listing response could not be parsed.
    #[error("malformed listing response: {0}")]
    MalformedResponse(String),

    /// File rejected before transmission.
    #[error("File {filename} exceeds maximum size of {max_mb} MB")]
    FileTooLarge { filename: String, max_mb: u64 },

    /// Upload failed during or after transmission. The message is the
    /// transport's text, shown verbatim.
    #[error("{message}")]
    Transport { message: String },

    /// Sort requested on a column that was never registered.
    #[error("unknown sort column: {0}")]
    UnknownColumn(String),

    /// More files than a single upload action accepts.
    #[error("too many files selected: {count} (max {max})")]
    TooManyFiles { count: usize, max: usize },

    /// Upload session driven out of order.
    #[error("invalid upload transition from {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error with context.
    #[error("IO error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a fetch error from any displayable cause.
    pub fn fetch(reason: impl std::fmt::Display) -> Self {
        Self::Fetch {
            reason: reason.to_string(),
        }
    }

    /// Create a malformed response error.
    pub fn malformed(reason: impl std::fmt::Display) -> Self {
        Self::MalformedResponse(reason.to_string())
    }

    /// Create a transport error carrying the transport's message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error belongs to the listing-fetch family.
    #[must_use]
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::MalformedResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message_is_verbatim() {
        let err = Error::transport("502 Bad Gateway");
        assert_eq!(err.to_string(), "502 Bad Gateway");
    }

    #[test]
    fn test_file_too_large_mentions_name_and_limit() {
        let err = Error::FileTooLarge {
            filename: "lecture.mp4".to_string(),
            max_mb: 10,
        };
        assert_eq!(
            err.to_string(),
            "File lecture.mp4 exceeds maximum size of 10 MB"
        );
    }

    #[test]
    fn test_fetch_family() {
        assert!(Error::fetch("connection refused").is_fetch());
        assert!(Error::malformed("missing totalCount").is_fetch());
        assert!(!Error::transport("boom").is_fetch());
    }
}
