//! Error types for the pdf-highlights library.
//!
//! Every variant of [`HighlightError`] is terminal for the run: there are no
//! partial results and nothing is retried, since the inputs are static local
//! files. Finding zero highlights is *not* an error; it is reported through
//! [`crate::output::ExtractionOutput::is_empty`].
//!
//! [`HighlightError::kind`] folds the variants onto the three classes a
//! caller usually branches on (input missing, open failure, write failure)
//! plus the few auxiliary ones.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-highlights library.
#[derive(Debug, Error)]
pub enum HighlightError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input PDF file not found: '{path}'")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The PDF parser refused the file.
    #[error("Error opening PDF file '{path}': {detail}")]
    OpenFailed { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// A page, its annotations or its text layer could not be loaded.
    #[error("Failed to read page {page}: {detail}")]
    PageAccess { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Error writing to output file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON rendering of the result failed.
    #[error("Failed to serialise highlights: {0}")]
    Serialize(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium is normally downloaded automatically on first run.\n\
If the download failed you can set PDFIUM_LIB_PATH=/path/to/libpdfium\n\
to use an existing copy."
    )]
    PdfiumBindingFailed(String),
}

/// Coarse classification of a [`HighlightError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input path does not exist.
    InputNotFound,
    /// The document could not be opened or parsed.
    Open,
    /// A page could not be read after the document opened.
    Extraction,
    /// The output destination could not be written.
    Write,
    /// The configuration was rejected.
    Config,
    /// The PDF engine is unavailable.
    Binding,
}

impl HighlightError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HighlightError::InputNotFound { .. } => ErrorKind::InputNotFound,
            HighlightError::PermissionDenied { .. }
            | HighlightError::NotAPdf { .. }
            | HighlightError::OpenFailed { .. }
            | HighlightError::PasswordRequired { .. }
            | HighlightError::WrongPassword { .. } => ErrorKind::Open,
            HighlightError::PageAccess { .. } => ErrorKind::Extraction,
            HighlightError::WriteFailed { .. } | HighlightError::Serialize(_) => ErrorKind::Write,
            HighlightError::InvalidConfig(_) => ErrorKind::Config,
            HighlightError::PdfiumBindingFailed(_) => ErrorKind::Binding,
        }
    }
}

impl From<pdfium_auto::PdfiumAutoError> for HighlightError {
    fn from(e: pdfium_auto::PdfiumAutoError) -> Self {
        HighlightError::PdfiumBindingFailed(e.to_string())
    }
}
