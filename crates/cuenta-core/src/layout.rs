//! Reconstruction of visual lines from positioned text tokens.
//!
//! Text extraction yields fragments in content-stream order, which is not
//! necessarily the visual order. Tokens are grouped into rows by vertical
//! proximity and ordered left to right within a row.

use serde::{Deserialize, Serialize};

/// Default vertical tolerance between tokens of one visual line.
pub const DEFAULT_LINE_TOLERANCE: f32 = 3.0;

/// A text fragment with its position on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedToken {
    /// Text content.
    pub text: String,
    /// Distance from the top edge of the page.
    pub top: f32,
    /// Distance from the left edge of the page.
    pub x0: f32,
}

impl PositionedToken {
    pub fn new(text: impl Into<String>, top: f32, x0: f32) -> Self {
        Self {
            text: text.into(),
            top,
            x0,
        }
    }
}

/// Tokens judged to belong to the same visual row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedLine {
    /// Token texts joined left to right with single spaces.
    pub text: String,
    /// Tokens in left-to-right order.
    pub tokens: Vec<PositionedToken>,
}

impl ReconstructedLine {
    fn from_tokens(mut tokens: Vec<PositionedToken>) -> Self {
        // Jittered tops can put a right-hand token first in the global sort.
        tokens.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));

        let text = tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        Self { text, tokens }
    }

    /// Topmost token position, if the line was built from tokens.
    pub fn top(&self) -> Option<f32> {
        self.tokens.iter().map(|t| t.top).reduce(f32::min)
    }
}

/// Group the tokens of one page into visual lines.
///
/// Tokens are sorted by (`top`, `x0`). A token whose `top` differs from the
/// previous token's by `tolerance` or more starts a new line. Lines whose
/// text is empty are dropped.
pub fn reconstruct_lines(tokens: &[PositionedToken], tolerance: f32) -> Vec<ReconstructedLine> {
    let mut sorted: Vec<PositionedToken> = tokens.to_vec();
    sorted.sort_by(|a, b| {
        a.top
            .partial_cmp(&b.top)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<PositionedToken> = Vec::new();

    for token in sorted {
        if let Some(last) = current.last() {
            if (token.top - last.top).abs() >= tolerance {
                lines.push(ReconstructedLine::from_tokens(std::mem::take(&mut current)));
            }
        }
        current.push(token);
    }

    if !current.is_empty() {
        lines.push(ReconstructedLine::from_tokens(current));
    }

    lines.retain(|line| !line.text.is_empty());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_groups_by_top_and_orders_by_x() {
        let tokens = vec![
            PositionedToken::new("c", 10.0, 300.0),
            PositionedToken::new("next", 20.0, 5.0),
            PositionedToken::new("a", 10.0, 10.0),
            PositionedToken::new("b", 10.0, 120.0),
        ];

        let lines = reconstruct_lines(&tokens, DEFAULT_LINE_TOLERANCE);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "a b c");
        assert_eq!(lines[0].tokens.len(), 3);
        assert_eq!(lines[1].text, "next");
        assert_eq!(lines[1].top(), Some(20.0));
    }

    #[test]
    fn test_small_vertical_jitter_stays_on_line() {
        let tokens = vec![
            PositionedToken::new("01/03/2026", 100.0, 20.0),
            PositionedToken::new("INGRESADO", 101.5, 90.0),
            PositionedToken::new("1.234,56", 99.2, 400.0),
        ];

        let lines = reconstruct_lines(&tokens, DEFAULT_LINE_TOLERANCE);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "01/03/2026 INGRESADO 1.234,56");
    }

    #[test]
    fn test_empty_input() {
        assert!(reconstruct_lines(&[], DEFAULT_LINE_TOLERANCE).is_empty());
    }

    #[test]
    fn test_whitespace_lines_are_dropped() {
        let tokens = vec![
            PositionedToken::new("  ", 10.0, 0.0),
            PositionedToken::new(" ", 10.0, 5.0),
            PositionedToken::new("TOTAL", 30.0, 0.0),
        ];

        let lines = reconstruct_lines(&tokens, DEFAULT_LINE_TOLERANCE);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "TOTAL");
    }
}
