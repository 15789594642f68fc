//! Rule-based field extractors for statement rows.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod reference;
pub mod resolver;
pub mod tax_id;

pub use amounts::{format_amount, parse_amount, AmountExtractor, BlockAmountExtractor};
pub use dates::{leading_date, to_naive_date, DateExtractor};
pub use reference::{extract_reference, has_marker_word};
pub use resolver::{Resolution, Resolver, RowStatus};
pub use tax_id::{find_tax_id, is_tax_id, validate_tax_id, TaxIdExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value extracted from a line, with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range of the match in the source line.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
