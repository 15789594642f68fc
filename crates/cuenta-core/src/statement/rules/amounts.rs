//! Amount extraction for statements printed with `.` thousands and `,` decimals.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use super::patterns::{AMOUNT, CURRENCY_AMOUNT};
use super::{ExtractionMatch, FieldExtractor};

/// Extractor for bare amounts (`1.234,56`) anywhere in a line.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AMOUNT
            .find_iter(text)
            .filter_map(|m| {
                let value = parse_or_skip(m.as_str())?;
                Some(ExtractionMatch::new(value, m.as_str()).with_position(m.start(), m.end()))
            })
            .collect()
    }
}

/// Extractor for currency-prefixed amounts (`$ 1.234,56`).
pub struct BlockAmountExtractor;

impl BlockAmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Whether the line carries a currency amount, parseable or not.
    pub fn is_amount_line(&self, text: &str) -> bool {
        CURRENCY_AMOUNT.is_match(text)
    }
}

impl Default for BlockAmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BlockAmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = CURRENCY_AMOUNT.captures(text)?;
        let full = caps.get(0)?;
        let value = parse_or_skip(&caps[1])?;
        Some(ExtractionMatch::new(value, full.as_str()).with_position(full.start(), full.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CURRENCY_AMOUNT
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let value = parse_or_skip(&caps[1])?;
                Some(ExtractionMatch::new(value, full.as_str()).with_position(full.start(), full.end()))
            })
            .collect()
    }
}

fn parse_or_skip(s: &str) -> Option<Decimal> {
    let parsed = parse_amount(s);
    if parsed.is_none() {
        debug!("Skipping unparsable amount {:?}", s);
    }
    parsed
}

/// Parse an amount such as `1.234,56` or `-0,50`.
///
/// All `.` are removed and `,` becomes the decimal point. Returns `None` for
/// anything that is not a number afterwards.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}

/// Format an amount the way statements print it (`1.234,56`).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("0,00"), Some(Decimal::ZERO));
        assert_eq!(parse_amount("12.345.678,90"), Some(dec("12345678.90")));
        assert_eq!(parse_amount("-500,00"), Some(dec("-500.00")));
        assert_eq!(parse_amount("999,99"), Some(dec("999.99")));
    }

    #[test]
    fn test_parse_amount_malformed() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("1,2,3"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("1234.56")), "1.234,56");
        assert_eq!(format_amount(dec("12345678.9")), "12.345.678,90");
        assert_eq!(format_amount(dec("-500")), "-500,00");
        assert_eq!(format_amount(Decimal::ZERO), "0,00");
    }

    #[test]
    fn test_extract_all_amounts_in_order() {
        let extractor = AmountExtractor::new();
        let results = extractor.extract_all("01/03/2026 FV 12 100,00 2.500,10 1.234,56");

        let values: Vec<Decimal> = results.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![dec("100.00"), dec("2500.10"), dec("1234.56")]);
        assert_eq!(results[2].source, "1.234,56");
    }

    #[test]
    fn test_dates_are_not_amounts() {
        let extractor = AmountExtractor::new();
        assert!(extractor.extract_all("01/03/2026 PENDIENTE").is_empty());
    }

    #[test]
    fn test_block_amount() {
        let extractor = BlockAmountExtractor::new();
        assert_eq!(extractor.extract("$ 1.500,00").map(|m| m.value), Some(dec("1500.00")));
        assert_eq!(extractor.extract("$-20,00").map(|m| m.value), Some(dec("-20.00")));
        assert!(extractor.extract("1.500,00").is_none());
        assert!(extractor.is_amount_line("Saldo $ 0,00"));
    }
}
