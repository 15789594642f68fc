//! Raw text lines for block-layout statements, using lopdf and pdf-extract.

use tracing::{debug, warn};

use super::{text_lines, LineSource, PageSource, PdfFile, Result};
use crate::error::PdfError;

/// Line extractor over a loaded PDF.
///
/// Pages are read with lopdf. When lopdf yields no text at all the whole
/// document is re-read with pdf-extract.
pub struct PdfTextExtractor<'a> {
    pdf: &'a PdfFile,
}

impl<'a> PdfTextExtractor<'a> {
    pub fn new(pdf: &'a PdfFile) -> Self {
        Self { pdf }
    }

    /// Whole-document text via pdf-extract.
    pub fn extract_text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(self.pdf.raw_data())
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// pdf-extract output, split into pages on form feeds.
    fn fallback_lines(&self) -> Result<Vec<Vec<String>>> {
        let text = self.extract_text()?;
        let pages: Vec<Vec<String>> = text.split('\x0c').map(text_lines).collect();
        debug!("pdf-extract fallback produced {} pages", pages.len());
        Ok(pages)
    }
}

impl PageSource for PdfTextExtractor<'_> {
    fn page_count(&self) -> u32 {
        self.pdf.page_count()
    }
}

impl LineSource for PdfTextExtractor<'_> {
    fn page_lines(&self, page: u32) -> Result<Vec<String>> {
        self.pdf.page_id(page)?;
        let text = self
            .pdf
            .document()
            .extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        Ok(text_lines(&text))
    }

    fn lines(&self) -> Result<Vec<Vec<String>>> {
        let mut pages = Vec::with_capacity(self.page_count() as usize);
        for page in 1..=self.page_count() {
            match self.page_lines(page) {
                Ok(lines) => pages.push(lines),
                Err(e) => {
                    warn!("Page {}: {}", page, e);
                    pages.push(Vec::new());
                }
            }
        }

        if pages.iter().flatten().all(|line| line.is_empty()) {
            debug!("lopdf produced no text, falling back to pdf-extract");
            return self.fallback_lines();
        }

        Ok(pages)
    }
}
