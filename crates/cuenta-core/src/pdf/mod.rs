//! PDF processing module.
//!
//! Two views of a loaded PDF feed the statement parsers: positioned tokens
//! for the wide layout and raw text lines for the block layout.

mod extractor;
mod loader;
mod tokens;

pub use extractor::PdfTextExtractor;
pub use loader::PdfFile;
pub use tokens::PdfTokenExtractor;

use crate::error::PdfError;
use crate::layout::PositionedToken;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Anything with numbered pages (1-indexed).
pub trait PageSource {
    /// Get the number of pages.
    fn page_count(&self) -> u32;
}

/// Trait for sources of positioned text tokens.
pub trait TokenSource: PageSource {
    /// Extract the tokens of a specific page.
    fn page_tokens(&self, page: u32) -> Result<Vec<PositionedToken>>;

    /// Extract the tokens of every page, in page order.
    fn tokens(&self) -> Result<Vec<Vec<PositionedToken>>> {
        (1..=self.page_count()).map(|page| self.page_tokens(page)).collect()
    }
}

/// Trait for sources of raw text lines.
pub trait LineSource: PageSource {
    /// Extract the trimmed lines of a specific page, blank ones included.
    fn page_lines(&self, page: u32) -> Result<Vec<String>>;

    /// Extract the lines of every page, in page order.
    fn lines(&self) -> Result<Vec<Vec<String>>> {
        (1..=self.page_count()).map(|page| self.page_lines(page)).collect()
    }
}

/// Split extracted text into trimmed lines.
///
/// Blank lines are kept: block statements address fields by line offset and
/// an empty cell still occupies its line.
pub(crate) fn text_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim().to_string()).collect()
}
