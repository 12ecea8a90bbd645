//! Error types for the viewer core.
//!
//! Every error renders as a one-line status message through `Display`, so
//! the session can show it without further formatting.

use std::io;

use thiserror::Error;

/// Errors from [`PagedFile`](crate::paged_file::PagedFile).
#[derive(Debug, Error)]
pub enum PagedFileError {
    #[error("{0}")]
    Io(#[from] io::Error),

    /// A read outside `[0, len)`. Callers clamp before reading, so this is
    /// a contract violation rather than a user error.
    #[error("address {addr:#x} out of range (length {len:#x})")]
    OutOfRange { addr: u64, len: u64 },
}

/// Errors from the search engine.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Malformed hex pattern: {0}")]
    MalformedHexPattern(String),

    #[error("No previous search pattern")]
    EmptyHistory,

    #[error(transparent)]
    Io(#[from] PagedFileError),
}

/// Errors from navigation.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Io(#[from] PagedFileError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_is_hex() {
        let err = PagedFileError::OutOfRange { addr: 0x20, len: 0x10 };
        assert_eq!(err.to_string(), "address 0x20 out of range (length 0x10)");
    }

    #[test]
    fn search_errors_read_as_status_messages() {
        assert_eq!(
            SearchError::MalformedHexPattern("414".into()).to_string(),
            "Malformed hex pattern: 414"
        );
        assert_eq!(SearchError::EmptyHistory.to_string(), "No previous search pattern");
    }

    #[test]
    fn io_errors_pass_through() {
        let io = io::Error::new(io::ErrorKind::UnexpectedEof, "short read");
        let nav = NavError::from(PagedFileError::from(io));
        assert_eq!(nav.to_string(), "short read");
    }
}
