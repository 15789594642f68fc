//! Per-document statement parsing.

use std::time::Instant;

use tracing::{debug, info};

use crate::document::{DocumentPages, StatementDocument};
use crate::layout::{reconstruct_lines, PositionedToken};
use crate::models::config::CuentaConfig;
use crate::models::ledger::{EntityContext, LedgerRecord, StatementLayout};
use crate::Result;

use super::{scan, BlockClassifier, RecordAssembler, RowClassifier, WideClassifier};

/// Records parsed from one document.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Branch label the records were booked under.
    pub branch: String,
    /// Layout used for the document.
    pub layout: StatementLayout,
    /// Records in scan order.
    pub records: Vec<LedgerRecord>,
    /// Lines scanned across all pages.
    pub lines_scanned: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Pick the layout of a document from its raw text.
///
/// Documents containing the block trigger marker use the block layout.
pub fn detect_layout<S: AsRef<str>>(pages: &[Vec<S>], block_trigger: &str) -> StatementLayout {
    let has_trigger = !block_trigger.is_empty()
        && pages
            .iter()
            .flatten()
            .any(|line| line.as_ref().contains(block_trigger));

    if has_trigger {
        StatementLayout::Block
    } else {
        StatementLayout::Wide
    }
}

/// Statement parser for both layouts.
///
/// Every parse starts from a fresh entity context and record counter, so
/// nothing leaks from one document into the next.
#[derive(Debug, Clone)]
pub struct StatementParser {
    config: CuentaConfig,
    wide: WideClassifier,
    block: BlockClassifier,
}

impl StatementParser {
    /// Create a parser with the given configuration.
    pub fn new(config: CuentaConfig) -> Self {
        Self {
            wide: WideClassifier::new(&config),
            block: BlockClassifier::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &CuentaConfig {
        &self.config
    }

    fn initial_context(&self) -> EntityContext {
        EntityContext::name_only(self.config.extraction.unknown_entity.clone())
    }

    fn scan_pages<C, S>(&self, classifier: &C, pages: &[Vec<S>], branch: &str) -> Vec<LedgerRecord>
    where
        C: RowClassifier,
        S: AsRef<str>,
    {
        let mut assembler = RecordAssembler::new(branch);
        let mut records = Vec::new();
        let mut context = self.initial_context();

        for (page_idx, page) in pages.iter().enumerate() {
            let lines: Vec<&str> = page.iter().map(|l| l.as_ref()).collect();
            let before = records.len();
            context = scan(classifier, &lines, context, &mut assembler, &mut records);
            debug!(
                "Page {}: {} lines, {} records",
                page_idx + 1,
                lines.len(),
                records.len() - before
            );
        }

        records
    }

    fn token_lines(&self, pages: &[Vec<PositionedToken>]) -> Vec<Vec<String>> {
        let tolerance = self.config.layout.line_tolerance;
        pages
            .iter()
            .map(|tokens| {
                reconstruct_lines(tokens, tolerance)
                    .into_iter()
                    .map(|line| line.text)
                    .collect()
            })
            .collect()
    }

    /// Parse wide-layout pages given as positioned tokens.
    pub fn parse_tokens(&self, pages: &[Vec<PositionedToken>], branch: &str) -> Vec<LedgerRecord> {
        self.parse_wide_lines(&self.token_lines(pages), branch)
    }

    /// Parse wide-layout pages given as already reconstructed lines.
    pub fn parse_wide_lines<S: AsRef<str>>(&self, pages: &[Vec<S>], branch: &str) -> Vec<LedgerRecord> {
        self.scan_pages(&self.wide, pages, branch)
    }

    /// Parse block-layout pages given as raw text lines.
    pub fn parse_block_lines<S: AsRef<str>>(&self, pages: &[Vec<S>], branch: &str) -> Vec<LedgerRecord> {
        self.scan_pages(&self.block, pages, branch)
    }

    /// Parse raw text lines with an explicit layout.
    pub fn parse_lines<S: AsRef<str>>(
        &self,
        layout: StatementLayout,
        pages: &[Vec<S>],
        branch: &str,
    ) -> Vec<LedgerRecord> {
        match layout {
            StatementLayout::Wide => self.parse_wide_lines(pages, branch),
            StatementLayout::Block => self.parse_block_lines(pages, branch),
        }
    }

    /// Parse a whole document.
    ///
    /// With `layout` unset the layout is detected from the document text.
    /// Fails only when the document itself cannot be read.
    pub fn parse_document(
        &self,
        document: &StatementDocument,
        layout: Option<StatementLayout>,
    ) -> Result<ParsedDocument> {
        let start = Instant::now();
        let branch = document.branch.as_str();

        let trigger = self.config.markers.block_trigger.as_str();

        // Wide statements need positions; block statements read the raw text.
        let (layout, lines) = match document.pages()? {
            DocumentPages::Tokens(tokens) => {
                let lines = self.token_lines(&tokens);
                (layout.unwrap_or_else(|| detect_layout(&lines, trigger)), lines)
            }
            DocumentPages::Lines(lines) => {
                (layout.unwrap_or_else(|| detect_layout(&lines, trigger)), lines)
            }
            DocumentPages::Both { tokens, lines } => {
                let layout = layout.unwrap_or_else(|| detect_layout(&lines, trigger));
                let has_tokens = tokens.iter().any(|page| !page.is_empty());
                if layout == StatementLayout::Wide && has_tokens {
                    (layout, self.token_lines(&tokens))
                } else {
                    (layout, lines)
                }
            }
        };

        let lines_scanned = lines.iter().map(Vec::len).sum();
        let records = self.parse_lines(layout, &lines, branch);

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Parsed {} ({} layout): {} records from {} lines in {}ms",
            document.path.display(),
            layout,
            records.len(),
            lines_scanned,
            processing_time_ms
        );

        Ok(ParsedDocument {
            branch: document.branch.clone(),
            layout,
            records,
            lines_scanned,
            processing_time_ms,
        })
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new(CuentaConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_detect_layout() {
        let block = vec![vec!["PEREZ, JUAN", "CUENTA CORRIENTE"]];
        let wide = vec![vec!["01/03/2026 INGRESADO FV 1 10,00"]];

        assert_eq!(detect_layout(&block, "CUENTA CORRIENTE"), StatementLayout::Block);
        assert_eq!(detect_layout(&wide, "CUENTA CORRIENTE"), StatementLayout::Wide);
    }

    #[test]
    fn test_parse_tokens() {
        let page = vec![
            PositionedToken::new("27-12345678-0", 10.0, 200.0),
            PositionedToken::new("RABINO, SOL", 10.0, 20.0),
            PositionedToken::new("1.234,56", 30.0, 500.0),
            PositionedToken::new("01/03/2026", 30.0, 20.0),
            PositionedToken::new("INGRESADO", 30.5, 100.0),
            PositionedToken::new("FV 1234", 29.5, 200.0),
        ];

        let records = StatementParser::default().parse_tokens(&[page], "CENTRO");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entity, "RABINO, SOL");
        assert_eq!(records[0].tax_id, "27-12345678-0");
        assert_eq!(records[0].reference, "FV 1234");
        assert_eq!(records[0].debit, Decimal::new(123456, 2));
        assert_eq!(records[0].raw_line, "01/03/2026 INGRESADO FV 1234 1.234,56");
    }

    #[test]
    fn test_entity_carries_across_pages_but_not_documents() {
        let parser = StatementParser::default();
        let pages = vec![
            vec!["GOMEZ, ANA 27-12345678-0"],
            vec!["01/03/2026 INGRESADO FV 1 10,00"],
        ];

        let first = parser.parse_wide_lines(&pages, "A");
        assert_eq!(first[0].entity, "GOMEZ, ANA");

        let second = parser.parse_wide_lines(&[vec!["02/03/2026 INGRESADO FV 2 20,00"]], "A");
        assert_eq!(second[0].entity, "UNKNOWN");
        assert!(second[0].id.ends_with("-0"));
    }

    #[test]
    fn test_configured_unknown_entity() {
        let mut config = CuentaConfig::default();
        config.extraction.unknown_entity = "DESCONOCIDO".to_string();

        let records = StatementParser::new(config)
            .parse_wide_lines(&[vec!["01/03/2026 INGRESADO FV 1 10,00"]], "A");

        assert_eq!(records[0].entity, "DESCONOCIDO");
    }

    #[test]
    fn test_parse_document_detects_block_layout() {
        let text = "PEREZ, JUAN\n20-12345678-6\nCUENTA CORRIENTE\nCOBRADO\n$ 500,00\nFV-1/2026\n01/03/2026\n";
        let document = StatementDocument::from_text("chacras.txt", "CHACRAS", text);

        let parsed = StatementParser::default().parse_document(&document, None).unwrap();

        assert_eq!(parsed.layout, StatementLayout::Block);
        assert_eq!(parsed.branch, "CHACRAS");
        assert_eq!(parsed.lines_scanned, 7);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].entity, "PEREZ, JUAN");
        assert_eq!(parsed.records[0].credit, Decimal::new(50000, 2));
    }

    #[test]
    fn test_parse_document_keeps_blank_status_line() {
        let text = "CUENTA CORRIENTE\n\n$ 500,00\nFV-1/2026\n01/03/2026\n";
        let document = StatementDocument::from_text("chacras.txt", "CHACRAS", text);

        let parsed = StatementParser::default().parse_document(&document, None).unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].status, "");
        assert_eq!(parsed.records[0].debit, Decimal::new(50000, 2));
        assert_eq!(parsed.records[0].reference, "FV-1");
    }

    #[test]
    fn test_parse_document_layout_override() {
        let document = StatementDocument::from_text(
            "a.txt",
            "A",
            "01/03/2026 INGRESADO FV 1 10,00\nCUENTA CORRIENTE",
        );
        let parser = StatementParser::default();

        let auto = parser.parse_document(&document, None).unwrap();
        let wide = parser.parse_document(&document, Some(StatementLayout::Wide)).unwrap();

        assert_eq!(auto.layout, StatementLayout::Block);
        assert!(auto.records.is_empty());
        assert_eq!(wide.records.len(), 1);
    }

    #[test]
    fn test_parse_document_from_tokens() {
        let pages = vec![vec![
            PositionedToken::new("10,00", 50.0, 400.0),
            PositionedToken::new("01/03/2026 INGRESADO", 50.0, 10.0),
            PositionedToken::new("FV 7", 51.0, 150.0),
        ]];
        let document = StatementDocument::from_tokens("dump.json", "A", pages);

        let parsed = StatementParser::default().parse_document(&document, None).unwrap();

        assert_eq!(parsed.layout, StatementLayout::Wide);
        assert_eq!(parsed.records[0].reference, "FV 7");
        assert_eq!(parsed.records[0].raw_line, "01/03/2026 INGRESADO FV 7 10,00");
    }
}
