//! Tax id (`NN-NNNNNNNN-N`) extraction and check-digit validation.

use super::patterns::{TAX_ID, TAX_ID_EXACT};
use super::{ExtractionMatch, FieldExtractor};

/// Tax id field extractor.
pub struct TaxIdExtractor;

impl TaxIdExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TaxIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TaxIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        TAX_ID
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// First tax id in the text.
pub fn find_tax_id(text: &str) -> Option<ExtractionMatch<String>> {
    TaxIdExtractor::new().extract(text)
}

/// Whether the whole (trimmed) text is a tax id.
pub fn is_tax_id(text: &str) -> bool {
    TAX_ID_EXACT.is_match(text.trim())
}

/// Validate the check digit of a tax id.
///
/// Weights: 5, 4, 3, 2, 7, 6, 5, 4, 3, 2 (mod 11). A remainder that maps to
/// 10 never yields a valid id.
pub fn validate_tax_id(tax_id: &str) -> bool {
    let digits: Vec<u32> = tax_id.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }

    let weights = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];
    let sum: u32 = digits.iter().zip(weights.iter()).map(|(d, w)| d * w).sum();

    let expected = match 11 - sum % 11 {
        11 => 0,
        10 => return false,
        n => n,
    };

    expected == digits[10]
}
