//! Error types for the cuenta-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the cuenta library.
#[derive(Error, Debug)]
pub enum CuentaError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// A whole document could not be read; no records were produced for it.
    #[error("failed to read {}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: PdfError,
    },

    /// The input file type is not one the document loaders understand.
    #[error("unsupported input type: {}", .0.display())]
    UnsupportedInput(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input or configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CuentaError {
    /// Attach the document path to a PDF failure.
    pub fn document(path: impl Into<PathBuf>, source: PdfError) -> Self {
        Self::Document {
            path: path.into(),
            source,
        }
    }
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to decode a page content stream.
    #[error("failed to decode content of page {page}: {reason}")]
    Content { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors raised while extracting a single statement row.
///
/// These never escape a document parse: the classifiers log and skip the
/// offending row.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Result type for the cuenta library.
pub type Result<T> = std::result::Result<T, CuentaError>;
