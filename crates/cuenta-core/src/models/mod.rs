//! Data models and configuration.

pub mod config;
pub mod ledger;

pub use config::CuentaConfig;
pub use ledger::{EntityContext, EntryType, LedgerRecord, StatementLayout};
