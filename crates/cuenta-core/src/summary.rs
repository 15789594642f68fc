//! Per-entity totals over parsed records.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::ledger::LedgerRecord;
use crate::statement::rules::tax_id::validate_tax_id;

/// Totals for one account holder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityTotals {
    pub entity: String,
    pub tax_id: String,
    /// Check-digit validity of the tax id; `None` when there is none.
    pub tax_id_valid: Option<bool>,
    /// Records booked against the entity, transfers included.
    pub records: usize,
    pub transfers: usize,
    pub debit: Decimal,
    pub credit: Decimal,
    /// `debit - credit`.
    pub balance: Decimal,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl EntityTotals {
    fn new(entity: &str, tax_id: &str) -> Self {
        Self {
            entity: entity.to_string(),
            tax_id: tax_id.to_string(),
            tax_id_valid: (!tax_id.is_empty()).then(|| validate_tax_id(tax_id)),
            records: 0,
            transfers: 0,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            balance: Decimal::ZERO,
            first_date: None,
            last_date: None,
        }
    }

    fn add(&mut self, record: &LedgerRecord) {
        self.records += 1;
        if record.is_transfer {
            self.transfers += 1;
        }

        self.debit += record.debit;
        self.credit += record.credit;
        self.balance += record.net();

        if let Some(date) = record.issue_date() {
            self.first_date = Some(self.first_date.map_or(date, |d| d.min(date)));
            self.last_date = Some(self.last_date.map_or(date, |d| d.max(date)));
        }
    }
}

/// Group records by (entity, tax id) in order of first appearance.
///
/// Transfers are counted but add nothing to the sums, since their debit and
/// credit are both zero.
pub fn summarize(records: &[LedgerRecord]) -> Vec<EntityTotals> {
    let mut totals: Vec<EntityTotals> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for record in records {
        let key = (record.entity.as_str(), record.tax_id.as_str());
        let i = *index.entry(key).or_insert_with(|| {
            totals.push(EntityTotals::new(&record.entity, &record.tax_id));
            totals.len() - 1
        });
        totals[i].add(record);
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::StatementParser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summarize() {
        let lines = vec![vec![
            "GOMEZ, ANA 27-12345678-0",
            "05/03/2026 INGRESADO FV 1 100,00",
            "01/03/2026 COBRADO FV 2 40,00",
            "07/03/2026 COBRADO TX 9 999,00",
            "PEREZ, JUAN 20-12345678-6",
            "02/03/2026 PENDIENTE FV 3 10,00",
        ]];
        let records = StatementParser::default().parse_wide_lines(&lines, "CENTRO");

        let totals = summarize(&records);

        assert_eq!(totals.len(), 2);
        let ana = &totals[0];
        assert_eq!(ana.entity, "GOMEZ, ANA");
        assert_eq!(ana.records, 3);
        assert_eq!(ana.transfers, 1);
        assert_eq!(ana.debit, Decimal::new(10000, 2));
        assert_eq!(ana.credit, Decimal::new(4000, 2));
        assert_eq!(ana.balance, Decimal::new(6000, 2));
        assert_eq!(ana.first_date, NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(ana.last_date, NaiveDate::from_ymd_opt(2026, 3, 7));

        let juan = &totals[1];
        assert_eq!(juan.tax_id_valid, Some(true));
        assert_eq!(juan.balance, Decimal::new(1000, 2));
    }

    #[test]
    fn test_entity_without_tax_id() {
        let records = StatementParser::default()
            .parse_wide_lines(&[vec!["01/03/2026 INGRESADO FV 1 10,00"]], "A");

        let totals = summarize(&records);

        assert_eq!(totals[0].entity, "UNKNOWN");
        assert_eq!(totals[0].tax_id_valid, None);
    }

    #[test]
    fn test_returning_entity_keeps_first_position() {
        let lines = vec![vec![
            "GOMEZ, ANA 27-12345678-0",
            "01/03/2026 INGRESADO FV 1 10,00",
            "PEREZ, JUAN 20-12345678-6",
            "02/03/2026 INGRESADO FV 2 20,00",
            "GOMEZ, ANA 27-12345678-0",
            "03/03/2026 INGRESADO FV 3 30,00",
            "GOMEZ, ANA 20-12345678-6",
            "04/03/2026 INGRESADO FV 4 40,00",
        ]];
        let records = StatementParser::default().parse_wide_lines(&lines, "CENTRO");

        let totals = summarize(&records);

        let keys: Vec<(&str, &str, usize)> = totals
            .iter()
            .map(|t| (t.entity.as_str(), t.tax_id.as_str(), t.records))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("GOMEZ, ANA", "27-12345678-0", 2),
                ("PEREZ, JUAN", "20-12345678-6", 1),
                ("GOMEZ, ANA", "20-12345678-6", 1),
            ]
        );
        assert_eq!(totals[0].debit, Decimal::new(4000, 2));
    }

    #[test]
    fn test_empty() {
        assert!(summarize(&[]).is_empty());
    }
}
