//! Ledger record assembly.

use crate::models::ledger::{EntityContext, LedgerRecord};

use super::StatementRow;

/// Builds records for one document, numbering them in scan order.
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    branch: String,
    next_ordinal: usize,
}

impl RecordAssembler {
    /// Create an assembler for a document of the given branch.
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            next_ordinal: 0,
        }
    }

    /// Number of records assembled so far.
    pub fn len(&self) -> usize {
        self.next_ordinal
    }

    pub fn is_empty(&self) -> bool {
        self.next_ordinal == 0
    }

    /// Attach entity, branch and id to a recognised row.
    pub fn assemble(&mut self, row: StatementRow, context: &EntityContext) -> LedgerRecord {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let id = format!(
            "{}-{}-{}-{}-{}",
            row.reference,
            row.date.as_deref().unwrap_or(""),
            row.amount,
            row.status,
            ordinal
        );

        LedgerRecord {
            id,
            entity: context.name.clone(),
            tax_id: context.tax_id.clone(),
            date: row.date,
            entry_type: row.resolution.entry_type,
            reference: row.reference,
            branch: self.branch.clone(),
            debit: row.resolution.debit,
            credit: row.resolution.credit,
            is_transfer: row.resolution.is_transfer,
            status: row.status,
            raw_line: row.raw_line,
            layout: row.layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ledger::StatementLayout;
    use crate::statement::rules::Resolver;
    use rust_decimal::Decimal;

    fn row() -> StatementRow {
        let amount = Decimal::new(50000, 2);
        StatementRow {
            date: Some("01/03/2026".to_string()),
            reference: "FV 1".to_string(),
            amount,
            status: "COBRADO".to_string(),
            resolution: Resolver::default().resolve(amount, "COBRADO", "FV 1"),
            raw_line: "01/03/2026 COBRADO FV 1 500,00".to_string(),
            layout: StatementLayout::Wide,
        }
    }

    #[test]
    fn test_identical_rows_get_distinct_ids() {
        let mut assembler = RecordAssembler::new("CENTRO");
        let ctx = EntityContext::new("GOMEZ, ANA", "27-12345678-0");

        let first = assembler.assemble(row(), &ctx);
        let second = assembler.assemble(row(), &ctx);

        assert_eq!(first.id, "FV 1-01/03/2026-500.00-COBRADO-0");
        assert_eq!(second.id, "FV 1-01/03/2026-500.00-COBRADO-1");
        assert_eq!(assembler.len(), 2);
    }

    #[test]
    fn test_copies_context_and_branch() {
        let mut assembler = RecordAssembler::new("CENTRO");
        let record = assembler.assemble(row(), &EntityContext::new("GOMEZ, ANA", "27-12345678-0"));

        assert_eq!(record.entity, "GOMEZ, ANA");
        assert_eq!(record.tax_id, "27-12345678-0");
        assert_eq!(record.branch, "CENTRO");
        assert_eq!(record.credit, Decimal::new(50000, 2));
        assert_eq!(record.debit, Decimal::ZERO);
    }
}
