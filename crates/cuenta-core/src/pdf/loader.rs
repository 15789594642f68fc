//! Loading PDF bytes with lopdf.

use lopdf::{Document, ObjectId};
use tracing::debug;

use super::{PageSource, Result};
use crate::error::PdfError;

/// A parsed PDF plus the (decrypted) bytes pdf-extract re-reads.
pub struct PdfFile {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfFile {
    /// Load a PDF from bytes.
    ///
    /// Documents encrypted with an empty user password are decrypted.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self { document, raw_data })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    pub(crate) fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.document
            .get_pages()
            .get(&page)
            .copied()
            .ok_or(PdfError::InvalidPage(page))
    }
}

impl PageSource for PdfFile {
    fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_a_parse_error() {
        let result = PdfFile::load(b"not a pdf at all");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }
}
