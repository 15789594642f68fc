//! Statement row recognition for the wide and block layouts.

mod assembler;
mod block;
pub mod entity;
mod parser;
pub mod rules;
mod wide;

pub use assembler::RecordAssembler;
pub use block::BlockClassifier;
pub use parser::{ParsedDocument, StatementParser, detect_layout};
pub use wide::WideClassifier;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::ledger::{EntityContext, LedgerRecord, StatementLayout};
use rules::Resolution;

/// A recognised transaction, before entity and ordinal are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    /// Issue date as printed.
    pub date: Option<String>,
    /// Reference code or fallback.
    pub reference: String,
    /// Authoritative amount of the row.
    pub amount: Decimal,
    /// Status text stored on the record.
    pub status: String,
    /// Debit/credit routing.
    pub resolution: Resolution,
    /// Source text for auditing.
    pub raw_line: String,
    /// Layout that produced the row.
    pub layout: StatementLayout,
}

/// What a classifier made of the line at the scan position.
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass {
    /// An account header; replaces the current entity.
    Header(EntityContext),
    /// A transaction row.
    Transaction(StatementRow),
    /// Anything else. Not an error.
    Unrecognized,
}

/// Classification result plus the index where scanning resumes.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub class: LineClass,
    pub next: usize,
}

impl Classified {
    pub fn new(class: LineClass, next: usize) -> Self {
        Self { class, next }
    }
}

/// Trait for layout-specific row classifiers.
pub trait RowClassifier {
    /// Classify the line at `index`, possibly consuming following lines.
    fn classify(&self, lines: &[&str], index: usize) -> Classified;
}

/// Scan one page of lines in order.
///
/// The entity context is passed in and handed back so it can carry over to
/// the next page of the same document. A header only affects rows after it.
pub fn scan<C: RowClassifier>(
    classifier: &C,
    lines: &[&str],
    mut context: EntityContext,
    assembler: &mut RecordAssembler,
    records: &mut Vec<LedgerRecord>,
) -> EntityContext {
    let mut index = 0;

    while index < lines.len() {
        let Classified { class, next } = classifier.classify(lines, index);

        match class {
            LineClass::Header(entity) => {
                debug!("Entity header at line {}: {} {}", index, entity.name, entity.tax_id);
                context = entity;
            }
            LineClass::Transaction(row) => {
                records.push(assembler.assemble(row, &context));
            }
            LineClass::Unrecognized => {}
        }

        index = next.max(index + 1);
    }

    context
}
