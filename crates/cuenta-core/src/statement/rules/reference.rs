//! Reference code extraction (vouchers, transfers, credit notes).

/// Find the first marker present in the line and return it with the token
/// that follows it, e.g. `FV 0001-00001234`.
///
/// Markers are tried in the given priority order, matched as whole words and
/// without regard to ASCII case. A marker with no following token yields the
/// bare marker.
pub fn extract_reference(line: &str, markers: &[&str]) -> Option<String> {
    let upper = line.to_ascii_uppercase();

    for marker in markers.iter().filter(|m| !m.is_empty()) {
        let marker = marker.to_ascii_uppercase();
        let Some(pos) = find_marker_word(&upper, &marker) else {
            continue;
        };

        // ASCII upper-casing keeps byte offsets, so `pos` indexes `line` too.
        let token = line[pos + marker.len()..]
            .strip_prefix(' ')
            .and_then(|rest| rest.split(' ').next())
            .map(str::trim)
            .unwrap_or("");

        return Some(if token.is_empty() {
            marker
        } else {
            format!("{} {}", marker, token)
        });
    }

    None
}

/// Byte offset of the first occurrence of `marker` not inside a longer word.
fn find_marker_word(text: &str, marker: &str) -> Option<usize> {
    text.match_indices(marker).map(|(pos, _)| pos).find(|&pos| {
        let before = text[..pos].chars().next_back();
        let after = text[pos + marker.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Characters `start..end` of the line, trimmed.
pub fn fallback_reference(line: &str, start: usize, end: usize) -> String {
    line.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Whether `marker` appears as a whole word in `text`.
pub fn has_marker_word(text: &str, marker: &str) -> bool {
    !marker.is_empty()
        && text
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word.eq_ignore_ascii_case(marker))
}

/// Whether `reference` begins with `marker`.
pub fn starts_with_marker(reference: &str, marker: &str) -> bool {
    !marker.is_empty()
        && reference
            .get(..marker.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKERS: [&str; 3] = ["FV", "TX", "NC"];

    #[test]
    fn test_marker_with_token() {
        assert_eq!(
            extract_reference("01/03/2026 INGRESADO FV 1234 1.234,56", &MARKERS),
            Some("FV 1234".to_string())
        );
        assert_eq!(
            extract_reference("02/03/2026 COBRADO TX 88 500,00", &MARKERS),
            Some("TX 88".to_string())
        );
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            extract_reference("NC 7 ANULA FV 12", &MARKERS),
            Some("FV 12".to_string())
        );
    }

    #[test]
    fn test_marker_without_token() {
        assert_eq!(
            extract_reference("01/03/2026 AJUSTE FV-99", &MARKERS),
            Some("FV".to_string())
        );
    }

    #[test]
    fn test_marker_inside_word_is_ignored() {
        assert_eq!(extract_reference("01/03/2026 INGRESADO DEP BANCO 1.000,00", &MARKERS), None);
        assert_eq!(
            extract_reference("02/03/2026 BALANCE NC 45 250,00", &MARKERS),
            Some("NC 45".to_string())
        );
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(extract_reference("01/03/2026 SALDO INICIAL", &MARKERS), None);
    }

    #[test]
    fn test_fallback_reference() {
        assert_eq!(
            fallback_reference("01/03/2026 SALDO ANTERIOR 100,00", 11, 30),
            "SALDO ANTERIOR 100,"
        );
        assert_eq!(fallback_reference("short", 11, 30), "");
    }

    #[test]
    fn test_has_marker_word() {
        assert!(has_marker_word("NC 0001-00000045", "NC"));
        assert!(has_marker_word("NC-12", "NC"));
        assert!(!has_marker_word("FINANCIERA", "NC"));
    }

    #[test]
    fn test_starts_with_marker() {
        assert!(starts_with_marker("TX 88", "TX"));
        assert!(starts_with_marker("tx 88", "TX"));
        assert!(!starts_with_marker("FV 1", "TX"));
        assert!(!starts_with_marker("T", "TX"));
    }
}
