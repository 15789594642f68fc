//! Account holder header detection.
//!
//! Headers update the [`EntityContext`] that subsequent rows are booked
//! against. Each rule is a plain function so the cascade stays auditable;
//! the classifiers evaluate them in table order and the first match wins.

use crate::models::ledger::EntityContext;

use super::rules::dates::contains_day_month;
use super::rules::tax_id::{find_tax_id, is_tax_id};

/// A header rule evaluated against a single line.
pub struct HeaderRule {
    pub name: &'static str,
    pub detect: fn(&str) -> Option<EntityContext>,
}

/// Header rules for wide-layout lines, in precedence order.
pub const WIDE_HEADER_RULES: &[HeaderRule] = &[
    HeaderRule {
        name: "name_with_tax_id",
        detect: header_with_tax_id,
    },
    HeaderRule {
        name: "upper_case_name",
        detect: name_only_header,
    },
];

/// Upper-case in the sense of "has cased letters and none of them lower-case".
pub fn is_upper_case(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// `NAME 20-12345678-6 ...`: the text before the tax id is the name.
pub fn header_with_tax_id(line: &str) -> Option<EntityContext> {
    let found = find_tax_id(line)?;
    let (start, _) = found.position?;
    let name = line[..start].trim();

    if name.is_empty() {
        return None;
    }

    Some(EntityContext::new(name, found.value))
}

/// `GOMEZ, ANA`: an upper-case name with a comma and no dates.
pub fn name_only_header(line: &str) -> Option<EntityContext> {
    let line = line.trim();

    let qualifies = line.chars().count() > 3
        && is_upper_case(line)
        && line.contains(',')
        && !contains_day_month(line);

    qualifies.then(|| EntityContext::name_only(line))
}

/// Block layout: an upper-case name line followed by a tax-id line.
///
/// On a match the caller consumes both lines.
pub fn header_pair(line: &str, next: Option<&str>) -> Option<EntityContext> {
    let line = line.trim();
    let next = next?.trim();

    if line.contains(',') && is_upper_case(line) && is_tax_id(next) {
        Some(EntityContext::new(line, next))
    } else {
        None
    }
}

/// Run the wide-layout header rules against a line.
pub fn detect_wide_header(line: &str) -> Option<(&'static str, EntityContext)> {
    WIDE_HEADER_RULES
        .iter()
        .find_map(|rule| (rule.detect)(line).map(|ctx| (rule.name, ctx)))
}
