//! Debit / credit / transfer classification.
//!
//! Both layouts route their amount through [`Resolver::resolve`]. Precedence:
//! transfer exclusion, then credit notes, then the status keyword.

use rust_decimal::Decimal;

use super::reference::{has_marker_word, starts_with_marker};
use crate::models::config::MarkerConfig;
use crate::models::ledger::EntryType;

/// Row status keywords, most specific first.
const STATUS_KEYWORDS: [(&str, RowStatus); 4] = [
    ("COBRADO PMENTE", RowStatus::CollectedPending),
    ("COBRADO", RowStatus::Collected),
    ("INGRESADO", RowStatus::Entered),
    ("PENDIENTE", RowStatus::Pending),
];

/// Status of a statement row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    /// Collected, with a pending remainder (`COBRADO PMENTE`).
    CollectedPending,
    /// Collected (`COBRADO`).
    Collected,
    /// Entered / issued (`INGRESADO`).
    Entered,
    /// Pending (`PENDIENTE`).
    Pending,
    /// Any other status text.
    Other(String),
}

impl RowStatus {
    /// Status keyword found in the text, if any.
    fn keyword(text: &str) -> Option<RowStatus> {
        let upper = text.to_uppercase();
        STATUS_KEYWORDS
            .iter()
            .find(|(keyword, _)| upper.contains(keyword))
            .map(|(_, status)| status.clone())
    }

    /// Classify a whole row, defaulting to pending.
    pub fn scan(line: &str) -> RowStatus {
        Self::keyword(line).unwrap_or(RowStatus::Pending)
    }

    /// Classify a status text, keeping it verbatim when no keyword matches.
    pub fn from_text(text: &str) -> RowStatus {
        Self::keyword(text).unwrap_or_else(|| RowStatus::Other(text.trim().to_string()))
    }

    /// Canonical status text.
    pub fn label(&self) -> &str {
        match self {
            RowStatus::CollectedPending => "COBRADO PMENTE",
            RowStatus::Collected => "COBRADO",
            RowStatus::Entered => "INGRESADO",
            RowStatus::Pending => "PENDIENTE",
            RowStatus::Other(text) => text,
        }
    }

    pub fn is_collected(&self) -> bool {
        matches!(self, RowStatus::CollectedPending | RowStatus::Collected)
    }
}

/// Outcome of classifying one row amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub debit: Decimal,
    pub credit: Decimal,
    pub is_transfer: bool,
    pub entry_type: EntryType,
    pub status: RowStatus,
}

/// Applies the debit/credit/transfer rules.
#[derive(Debug, Clone)]
pub struct Resolver {
    transfer_marker: String,
    credit_note_marker: String,
    credit_status: String,
}

impl Resolver {
    pub fn new(markers: &MarkerConfig) -> Self {
        Self {
            transfer_marker: markers.transfer.clone(),
            credit_note_marker: markers.credit_note.clone(),
            credit_status: markers.credit_status.to_uppercase(),
        }
    }

    fn is_credit_note(&self, status_text: &str, reference: &str) -> bool {
        has_marker_word(reference, &self.credit_note_marker)
            || (!self.credit_status.is_empty()
                && status_text.to_uppercase().contains(&self.credit_status))
    }

    /// Route `amount` to debit or credit, or exclude it as a transfer.
    ///
    /// Amounts are booked as absolute values.
    pub fn resolve(&self, amount: Decimal, status_text: &str, reference: &str) -> Resolution {
        let amount = amount.abs();
        let status = RowStatus::from_text(status_text);

        if starts_with_marker(reference.trim(), &self.transfer_marker) {
            return Resolution {
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
                is_transfer: true,
                entry_type: EntryType::Transfer,
                status,
            };
        }

        if self.is_credit_note(status_text, reference) {
            return Resolution {
                debit: Decimal::ZERO,
                credit: amount,
                is_transfer: false,
                entry_type: EntryType::CreditNote,
                status,
            };
        }

        let entry_type = EntryType::Status(status_text.trim().to_string());
        let (debit, credit) = if status.is_collected() {
            (Decimal::ZERO, amount)
        } else {
            (amount, Decimal::ZERO)
        };

        Resolution {
            debit,
            credit,
            is_transfer: false,
            entry_type,
            status,
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&MarkerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount() -> Decimal {
        Decimal::new(123456, 2)
    }

    #[test]
    fn test_status_scan_precedence() {
        assert_eq!(RowStatus::scan("x COBRADO PMENTE y"), RowStatus::CollectedPending);
        assert_eq!(RowStatus::scan("x cobrado y"), RowStatus::Collected);
        assert_eq!(RowStatus::scan("PENDIENTE INGRESADO"), RowStatus::Entered);
        assert_eq!(RowStatus::scan("01/03/2026 FV 1 10,00"), RowStatus::Pending);
    }

    #[test]
    fn test_status_from_text_keeps_unknown() {
        assert_eq!(
            RowStatus::from_text(" ANULADO "),
            RowStatus::Other("ANULADO".to_string())
        );
        assert_eq!(RowStatus::from_text("ANULADO").label(), "ANULADO");
    }

    #[test]
    fn test_transfer_is_excluded_regardless_of_status() {
        let resolver = Resolver::default();
        for status in ["INGRESADO", "COBRADO", "PENDIENTE", "NOTA CREDITO"] {
            let r = resolver.resolve(amount(), status, "TX 88");
            assert!(r.is_transfer);
            assert_eq!(r.debit, Decimal::ZERO);
            assert_eq!(r.credit, Decimal::ZERO);
            assert_eq!(r.entry_type, EntryType::Transfer);
        }
    }

    #[test]
    fn test_credit_note_beats_status() {
        let resolver = Resolver::default();

        let r = resolver.resolve(amount(), "INGRESADO", "NC 0001-00000045");
        assert_eq!(r.credit, amount());
        assert_eq!(r.debit, Decimal::ZERO);
        assert_eq!(r.entry_type, EntryType::CreditNote);

        let r = resolver.resolve(amount(), "NOTA DE CREDITO", "FV-1");
        assert_eq!(r.credit, amount());
        assert_eq!(r.entry_type, EntryType::CreditNote);
    }

    #[test]
    fn test_status_keywords() {
        let resolver = Resolver::default();

        let r = resolver.resolve(amount(), "INGRESADO", "FV 1");
        assert_eq!((r.debit, r.credit), (amount(), Decimal::ZERO));
        assert_eq!(r.entry_type, EntryType::Status("INGRESADO".to_string()));

        let r = resolver.resolve(amount(), "COBRADO PMENTE", "FV 1");
        assert_eq!((r.debit, r.credit), (Decimal::ZERO, amount()));

        let r = resolver.resolve(amount(), "PENDIENTE", "FV 1");
        assert_eq!((r.debit, r.credit), (amount(), Decimal::ZERO));

        let r = resolver.resolve(amount(), "ANULADO", "FV 1");
        assert_eq!((r.debit, r.credit), (amount(), Decimal::ZERO));
    }

    #[test]
    fn test_negative_amounts_are_booked_as_absolute() {
        let r = Resolver::default().resolve(-amount(), "COBRADO", "FV 1");
        assert_eq!(r.credit, amount());
    }

    #[test]
    fn test_exactly_one_side_for_non_transfers() {
        let resolver = Resolver::default();
        let statuses = ["INGRESADO", "COBRADO", "COBRADO PMENTE", "PENDIENTE", "OTRO", "CREDITO"];
        let references = ["FV 1", "NC 2", "S/N", ""];

        for status in statuses {
            for reference in references {
                let r = resolver.resolve(amount(), status, reference);
                assert!(!r.is_transfer);
                assert!(r.debit.is_zero() != r.credit.is_zero(), "{status} {reference}");
            }
        }
    }
}
