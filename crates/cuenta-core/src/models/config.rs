//! Configuration structures for the statement parser.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CuentaError, Result};
use crate::statement::rules::dates::to_naive_date;

/// Main configuration for the cuenta pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuentaConfig {
    /// Line reconstruction configuration.
    pub layout: LayoutConfig,

    /// Marker strings recognised in statement rows.
    pub markers: MarkerConfig,

    /// Row extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Token-to-line reconstruction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum vertical distance between tokens on the same visual line.
    pub line_tolerance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { line_tolerance: 3.0 }
    }
}

/// Marker strings used by the classifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Voucher (invoice) reference prefix.
    pub voucher: String,

    /// Transfer reference prefix. Transfers are excluded from totals.
    pub transfer: String,

    /// Credit note reference prefix.
    pub credit_note: String,

    /// Word in a block status line that marks a credit.
    pub credit_status: String,

    /// Line marking the start of a block-layout transaction.
    pub block_trigger: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            voucher: "FV".to_string(),
            transfer: "TX".to_string(),
            credit_note: "NC".to_string(),
            credit_status: "CREDITO".to_string(),
            block_trigger: "CUENTA CORRIENTE".to_string(),
        }
    }
}

/// Row extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Entity name used before the first header of a document.
    pub unknown_entity: String,

    /// Lines after a block trigger that may belong to the block.
    pub block_window: usize,

    /// Maximum amounts collected per block.
    pub block_max_amounts: usize,

    /// Maximum dates collected per block.
    pub block_max_dates: usize,

    /// Issue date used when a block carries no date (none by default).
    pub fallback_issue_date: Option<String>,

    /// Reference used when a block carries no reference line.
    pub no_reference: String,

    /// Character range of a wide line used as reference when no marker matches.
    pub reference_slice: (usize, usize),
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            unknown_entity: crate::models::ledger::UNKNOWN_ENTITY.to_string(),
            block_window: 12,
            block_max_amounts: 3,
            block_max_dates: 2,
            fallback_issue_date: None,
            no_reference: "S/N".to_string(),
            reference_slice: (11, 30),
        }
    }
}

impl CuentaConfig {
    /// Load configuration from a JSON file.
    ///
    /// Missing keys take their defaults; the result is validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the classifiers cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.layout.line_tolerance > 0.0) {
            return Err(CuentaError::Config(format!(
                "layout.line_tolerance must be positive, got {}",
                self.layout.line_tolerance
            )));
        }

        let (start, end) = self.extraction.reference_slice;
        if start > end {
            return Err(CuentaError::Config(format!(
                "extraction.reference_slice start {} is after end {}",
                start, end
            )));
        }

        if self.extraction.block_window == 0 {
            return Err(CuentaError::Config(
                "extraction.block_window must be at least 1".to_string(),
            ));
        }

        if self.extraction.block_max_amounts == 0 {
            return Err(CuentaError::Config(
                "extraction.block_max_amounts must be at least 1".to_string(),
            ));
        }

        if let Some(date) = &self.extraction.fallback_issue_date {
            if to_naive_date(date).is_none() {
                return Err(CuentaError::Config(format!(
                    "extraction.fallback_issue_date is not a DD/MM/YYYY date: {}",
                    date
                )));
            }
        }

        Ok(())
    }
}
