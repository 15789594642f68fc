//! Core library for account-statement ledger extraction.
//!
//! This crate provides:
//! - Line reconstruction from positioned PDF text tokens
//! - Row classification for the wide (one line per row) and block
//!   (multi-line) statement layouts
//! - Debit/credit/transfer routing and ledger record assembly
//! - PDF, plain-text and token-dump document loaders
//! - Per-entity totals

pub mod document;
pub mod error;
pub mod layout;
pub mod models;
pub mod pdf;
pub mod statement;
pub mod summary;

pub use document::{DocumentPages, StatementDocument};
pub use error::{CuentaError, Result};
pub use layout::{reconstruct_lines, PositionedToken, ReconstructedLine};
pub use models::{CuentaConfig, EntityContext, EntryType, LedgerRecord, StatementLayout};
pub use pdf::{LineSource, PdfFile, PdfTextExtractor, PdfTokenExtractor, TokenSource};
pub use statement::{detect_layout, ParsedDocument, StatementParser};
pub use summary::{summarize, EntityTotals};
