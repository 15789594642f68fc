//! Positioned-token extraction for wide-layout statements.
//!
//! pdf-extract interprets the content streams and reports every glyph with
//! its text rendering matrix, advance width and decoded Unicode. The
//! collector below groups those glyphs into word tokens.

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, trace};

use super::{PageSource, PdfFile, Result, TokenSource};
use crate::error::PdfError;
use crate::layout::PositionedToken;

/// Horizontal gap, in font sizes, that separates two words.
const WORD_GAP: f64 = 0.1;

/// Vertical shift, in font sizes, that starts a new token.
const BASELINE_SHIFT: f64 = 0.5;

/// Token extractor over a loaded PDF.
pub struct PdfTokenExtractor<'a> {
    pdf: &'a PdfFile,
    document: pdf_extract::Document,
}

impl<'a> PdfTokenExtractor<'a> {
    /// Re-read the PDF bytes with the lopdf build pdf-extract links against.
    pub fn new(pdf: &'a PdfFile) -> Result<Self> {
        let document = pdf_extract::Document::load_mem(pdf.raw_data())
            .map_err(|e| PdfError::Parse(e.to_string()))?;
        Ok(Self { pdf, document })
    }
}

impl PageSource for PdfTokenExtractor<'_> {
    fn page_count(&self) -> u32 {
        self.pdf.page_count()
    }
}

impl TokenSource for PdfTokenExtractor<'_> {
    fn page_tokens(&self, page: u32) -> Result<Vec<PositionedToken>> {
        self.pdf.page_id(page)?;

        let mut collector = TokenCollector::default();
        pdf_extract::output_doc_page(&self.document, &mut collector, page).map_err(|e| {
            PdfError::Content {
                page,
                reason: e.to_string(),
            }
        })?;

        let tokens = collector.into_tokens();
        debug!("Page {}: {} tokens", page, tokens.len());
        Ok(tokens)
    }
}

/// A word being assembled from consecutive glyphs.
#[derive(Debug)]
struct Word {
    text: String,
    top: f64,
    x0: f64,
    end: f64,
    size: f64,
}

/// [`OutputDev`] that turns glyphs into word tokens with top-left origin
/// coordinates.
#[derive(Debug, Default)]
pub(crate) struct TokenCollector {
    page_height: f64,
    word: Option<Word>,
    tokens: Vec<PositionedToken>,
}

impl TokenCollector {
    fn flush(&mut self) {
        if let Some(word) = self.word.take() {
            trace!("Token {:?} at ({:.1}, {:.1})", word.text, word.x0, word.top);
            self.tokens
                .push(PositionedToken::new(word.text, word.top as f32, word.x0 as f32));
        }
    }

    pub(crate) fn into_tokens(mut self) -> Vec<PositionedToken> {
        self.flush();
        self.tokens
    }
}

impl OutputDev for TokenCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        self.flush();
        self.page_height = media_box.ury - media_box.lly;
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> std::result::Result<(), OutputError> {
        if char.trim().is_empty() {
            self.flush();
            return Ok(());
        }

        let x = trm.m31;
        let top = self.page_height - trm.m32;
        let size = font_size * (trm.m11 * trm.m22 - trm.m12 * trm.m21).abs().sqrt();
        let end = x + width * size;

        let continues = self.word.as_ref().is_some_and(|word| {
            let gap = x - word.end;
            (top - word.top).abs() <= word.size * BASELINE_SHIFT
                && gap <= word.size * WORD_GAP
                && gap >= -word.size
        });

        if continues {
            if let Some(word) = self.word.as_mut() {
                word.text.push_str(char);
                word.end = end;
            }
        } else {
            self.flush();
            self.word = Some(Word {
                text: char.to_string(),
                top,
                x0: x,
                end,
                size,
            });
        }

        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }
}
