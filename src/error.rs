//! Error types for the readaloud library.

use std::io;
use thiserror::Error;

/// Result type alias for readaloud operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, segmenting, or playing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading document bytes or configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document source could not open the given bytes.
    #[error("Failed to open document: {0}")]
    DocumentOpen(String),

    /// A page could not be fetched from the document handle.
    #[error("Failed to fetch page {page}: {reason}")]
    PageFetch {
        /// 1-indexed page number that was requested
        page: u32,
        /// Collaborator-provided reason
        reason: String,
    },

    /// The document handle returned a different page than the one requested.
    #[error("Requested page {requested} but the document returned page {returned}")]
    PageMismatch {
        /// Page number that was requested
        requested: u32,
        /// Page number reported by the returned page
        returned: u32,
    },

    /// The text content of a page could not be fetched.
    #[error("Failed to fetch text content of page {page}: {reason}")]
    TextContent {
        /// 1-indexed page number
        page: u32,
        /// Collaborator-provided reason
        reason: String,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// A sentence segmenter could not segment the text.
    ///
    /// The pipeline recovers from this by falling back to fixed-size chunks.
    #[error("Sentence segmentation failed: {0}")]
    Segmentation(String),

    /// A page could not be rendered into its target.
    #[error("Failed to render page {page}: {reason}")]
    Render {
        /// 1-indexed page number
        page: u32,
        /// Collaborator-provided reason
        reason: String,
    },

    /// The session already left Idle; a new document needs a new session.
    #[error("Session has already started")]
    SessionStarted,

    /// An option value is out of its valid range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error means the document could not be loaded.
    ///
    /// Load failures halt the pipeline before any chunk or utterance exists.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::DocumentOpen(_)
                | Error::PageFetch { .. }
                | Error::PageMismatch { .. }
                | Error::TextContent { .. }
                | Error::PageOutOfRange(..)
        )
    }
}
