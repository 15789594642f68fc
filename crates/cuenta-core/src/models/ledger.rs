//! Ledger record data model shared by both statement layouts.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statement::rules::dates::to_naive_date;

/// Name used for rows seen before any account header.
pub const UNKNOWN_ENTITY: &str = "UNKNOWN";

/// The account holder currently in effect while scanning a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityContext {
    /// Account holder name as printed in the header.
    pub name: String,

    /// Tax id (`NN-NNNNNNNN-N`), empty when the header carried none.
    pub tax_id: String,
}

impl EntityContext {
    pub fn new(name: impl Into<String>, tax_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tax_id: tax_id.into(),
        }
    }

    /// Context without a tax id.
    pub fn name_only(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    /// Sentinel context used at the start of every document.
    pub fn unknown() -> Self {
        Self::name_only(UNKNOWN_ENTITY)
    }

    pub fn has_tax_id(&self) -> bool {
        !self.tax_id.is_empty()
    }
}

impl Default for EntityContext {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Which classifier produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementLayout {
    /// One transaction per reconstructed visual line.
    Wide,
    /// One transaction spread over the lines following a type marker.
    Block,
}

impl fmt::Display for StatementLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementLayout::Wide => f.write_str("wide"),
            StatementLayout::Block => f.write_str("block"),
        }
    }
}

/// Record type: a closed vocabulary plus the raw status when none applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    /// Transfer, excluded from debit/credit totals.
    Transfer,
    /// Credit note.
    CreditNote,
    /// Any other row, labelled by its status text.
    Status(String),
}

impl EntryType {
    pub fn label(&self) -> &str {
        match self {
            EntryType::Transfer => "TRANSFERENCIA",
            EntryType::CreditNote => "NC",
            EntryType::Status(status) => status,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for EntryType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "TRANSFERENCIA" => EntryType::Transfer,
            "NC" => EntryType::CreditNote,
            _ => EntryType::Status(s),
        }
    }
}

impl From<EntryType> for String {
    fn from(entry_type: EntryType) -> Self {
        match entry_type {
            EntryType::Status(s) => s,
            other => other.label().to_string(),
        }
    }
}

/// One recognised statement transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Run-local id: reference, date, amount, status and ordinal.
    ///
    /// Unique within one document parse. Not stable across re-parses when
    /// row order changes.
    pub id: String,

    /// Account holder in effect when the row was scanned.
    pub entity: String,

    /// Account holder tax id, empty when unknown.
    pub tax_id: String,

    /// Issue date exactly as printed (`DD/MM/YYYY`).
    pub date: Option<String>,

    /// Canonical type or raw status.
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Voucher / credit note / transfer code, or a layout-specific fallback.
    pub reference: String,

    /// Branch label supplied by the caller.
    pub branch: String,

    /// Amount owed by the entity.
    pub debit: Decimal,

    /// Amount paid or credited to the entity.
    pub credit: Decimal,

    /// Transfers never affect totals.
    pub is_transfer: bool,

    /// Status text.
    pub status: String,

    /// Source text, kept for auditing only.
    pub raw_line: String,

    /// Classifier that produced the record.
    pub layout: StatementLayout,
}

impl LedgerRecord {
    /// Amount on whichever side the record was booked.
    pub fn amount(&self) -> Decimal {
        self.debit + self.credit
    }

    /// Debit minus credit.
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Issue date as a calendar date, if it is a valid one.
    pub fn issue_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(to_naive_date)
    }

    /// Check the record invariants and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.debit.is_sign_negative() || self.credit.is_sign_negative() {
            issues.push(format!("{}: negative amount", self.id));
        }

        if self.is_transfer {
            if !self.debit.is_zero() || !self.credit.is_zero() {
                issues.push(format!("{}: transfer with nonzero amount", self.id));
            }
        } else if !self.debit.is_zero() && !self.credit.is_zero() {
            issues.push(format!("{}: both debit and credit are set", self.id));
        }

        if self.date.is_none() {
            issues.push(format!("{}: missing issue date", self.id));
        }

        issues
    }
}
