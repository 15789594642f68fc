//! Statement documents: PDFs, plain-text dumps and JSON token dumps.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{CuentaError, Result};
use crate::layout::PositionedToken;
use crate::pdf::{LineSource, PdfFile, PdfTextExtractor, PdfTokenExtractor, TokenSource};

/// Page contents handed to the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentPages {
    /// Positioned tokens only (JSON token dumps).
    Tokens(Vec<Vec<PositionedToken>>),
    /// Raw text lines only (plain-text dumps).
    Lines(Vec<Vec<String>>),
    /// Both views of the same pages (PDFs).
    Both {
        tokens: Vec<Vec<PositionedToken>>,
        lines: Vec<Vec<String>>,
    },
}

enum Source {
    Pdf(PdfFile),
    Text(String),
    Tokens(Vec<Vec<PositionedToken>>),
}

/// One input document and the branch its records belong to.
pub struct StatementDocument {
    /// Where the document came from; used in diagnostics.
    pub path: PathBuf,
    /// Caller-supplied branch label.
    pub branch: String,
    source: Source,
}

impl StatementDocument {
    /// Open a document, choosing the loader from the file extension.
    ///
    /// `.pdf` files are parsed with lopdf, `.json` files must hold token
    /// pages (`[[{"text", "top", "x0"}]]`), `.txt` files are plain text with
    /// pages separated by form feeds.
    pub fn open(path: impl AsRef<Path>, branch: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let source = match extension.as_deref() {
            Some("pdf") => {
                let data = fs::read(path)?;
                let pdf = PdfFile::load(&data).map_err(|e| CuentaError::document(path, e))?;
                Source::Pdf(pdf)
            }
            Some("json") => {
                let text = fs::read_to_string(path)?;
                Source::Tokens(serde_json::from_str(&text)?)
            }
            Some("txt") | Some("text") => Source::Text(fs::read_to_string(path)?),
            _ => return Err(CuentaError::UnsupportedInput(path.to_path_buf())),
        };

        debug!("Opened {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            branch: branch.into(),
            source,
        })
    }

    /// A document from already-extracted text.
    pub fn from_text(path: impl Into<PathBuf>, branch: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            branch: branch.into(),
            source: Source::Text(text.into()),
        }
    }

    /// A document from already-extracted token pages.
    pub fn from_tokens(
        path: impl Into<PathBuf>,
        branch: impl Into<String>,
        pages: Vec<Vec<PositionedToken>>,
    ) -> Self {
        Self {
            path: path.into(),
            branch: branch.into(),
            source: Source::Tokens(pages),
        }
    }

    /// A loaded PDF.
    pub fn from_pdf(path: impl Into<PathBuf>, branch: impl Into<String>, pdf: PdfFile) -> Self {
        Self {
            path: path.into(),
            branch: branch.into(),
            source: Source::Pdf(pdf),
        }
    }

    /// Extract the page contents.
    pub fn pages(&self) -> Result<DocumentPages> {
        match &self.source {
            Source::Text(text) => Ok(DocumentPages::Lines(split_pages(text))),
            Source::Tokens(pages) => Ok(DocumentPages::Tokens(pages.clone())),
            Source::Pdf(pdf) => {
                let lines = PdfTextExtractor::new(pdf).lines();
                let tokens = PdfTokenExtractor::new(pdf).and_then(|extractor| extractor.tokens());

                // The document is lost only when neither view can be read.
                match (lines, tokens) {
                    (Ok(lines), Ok(tokens)) => Ok(DocumentPages::Both { tokens, lines }),
                    (Ok(lines), Err(e)) => {
                        warn!("{}: no positioned text ({})", self.path.display(), e);
                        Ok(DocumentPages::Lines(lines))
                    }
                    (Err(e), Ok(tokens)) => {
                        warn!("{}: no raw text ({})", self.path.display(), e);
                        Ok(DocumentPages::Tokens(tokens))
                    }
                    (Err(e), Err(_)) => Err(CuentaError::document(&self.path, e)),
                }
            }
        }
    }
}

/// Split plain text into pages on form feeds, then into trimmed lines.
pub fn split_pages(text: &str) -> Vec<Vec<String>> {
    text.split('\x0c').map(crate::pdf::text_lines).collect()
}
