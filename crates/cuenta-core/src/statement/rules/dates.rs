//! Date extraction.
//!
//! Statement dates are kept as the literal `DD/MM/YYYY` text. Printed dates
//! may contain formatting artifacts such as `31/02/2026`, so no calendar
//! validation happens here.

use chrono::NaiveDate;

use super::patterns::{DATE, DAY_MONTH, LEADING_DATE};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        DATE.find(text).map(|m| {
            ExtractionMatch::new(m.as_str().to_string(), m.as_str()).with_position(m.start(), m.end())
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE.find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Date at the very start of a line, if any.
pub fn leading_date(line: &str) -> Option<&str> {
    LEADING_DATE.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Whether the text contains something shaped like a day/month pair.
pub fn contains_day_month(text: &str) -> bool {
    DAY_MONTH.is_match(text)
}

/// Interpret a `DD/MM/YYYY` string as a calendar date.
pub fn to_naive_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}
