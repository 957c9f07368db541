//! Availability list parsing
//!
//! Turns free-text lines ("1. Mario", "2) luca!") into canonical name keys
//! and resolves them against the roster.
//!
//! Contract:
//! - blank lines are ignored
//! - leading list numbering (digits followed by whitespace, `.` or `)`) is
//!   removed; digits glued to a name ("23Skidoo") are part of the name
//! - every character that is not a letter or digit (any script) is dropped
//! - lookup compares keys case-insensitively

use std::collections::HashSet;

use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::error::{AssignError, Result};
use crate::models::{PlayerId, Roster};

fn is_numbering_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '.' || c == ')'
}

/// Lowercased name with everything but letters and digits removed.
pub fn canonical_key(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}

/// Normalize one availability line. `None` for lines with nothing left.
pub fn normalize_line(raw: &str) -> Option<String> {
    let trimmed = raw.trim_start();
    let rest = match trimmed.find(|c: char| !c.is_ascii_digit()) {
        Some(end) if end > 0 && trimmed[end..].starts_with(is_numbering_delimiter) => {
            trimmed[end..].trim_start_matches(is_numbering_delimiter)
        }
        Some(_) => trimmed,
        // Only digits: a bare number, not a name
        None => "",
    };

    let name: String = rest.chars().filter(|c| c.is_alphanumeric()).collect();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Normalize a block of text, one entry per non-empty line.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines().filter_map(normalize_line).collect()
}

/// Resolve availability lines to roster players, keeping input order.
///
/// Fails on the first line that matches no player. A player listed twice is
/// kept once and reported as a warning.
pub fn resolve_available<S: AsRef<str>>(
    roster: &Roster,
    lines: &[S],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<PlayerId>> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for raw in lines {
        let raw = raw.as_ref();
        let Some(key) = normalize_line(raw) else {
            continue;
        };
        let Some(id) = roster.find(&key) else {
            return Err(diagnostics.fail(AssignError::UnresolvedPlayer { name: raw.to_string() }));
        };
        if seen.insert(id) {
            selected.push(id);
        } else {
            diagnostics.push(DiagnosticEvent::DuplicateSelection { name: roster.get(id).name.clone() });
        }
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, PlayerRatings, Role};

    fn roster(names: &[&str]) -> Roster {
        let players = names
            .iter()
            .map(|n| Player::new(*n, Role::new("C").unwrap(), PlayerRatings::default()))
            .collect();
        Roster::new(players).unwrap()
    }

    #[test]
    fn test_normalize_strips_numbering_and_punctuation() {
        assert_eq!(normalize_line("1. Mario").as_deref(), Some("Mario"));
        assert_eq!(normalize_line("  12) Luca!").as_deref(), Some("Luca"));
        assert_eq!(normalize_line("3 - Anna Maria").as_deref(), Some("AnnaMaria"));
        assert_eq!(normalize_line("4.) Bob").as_deref(), Some("Bob"));
    }

    #[test]
    fn test_normalize_keeps_digits_inside_names() {
        assert_eq!(normalize_line("Player23").as_deref(), Some("Player23"));
        assert_eq!(normalize_line("1. R2D2").as_deref(), Some("R2D2"));
    }

    #[test]
    fn test_normalize_keeps_leading_digits_without_delimiter() {
        assert_eq!(normalize_line("23Skidoo").as_deref(), Some("23Skidoo"));
        assert_eq!(normalize_line("1. 23Skidoo").as_deref(), Some("23Skidoo"));
        assert_eq!(normalize_line("1.23Skidoo").as_deref(), Some("23Skidoo"));
    }

    #[test]
    fn test_normalize_keeps_non_ascii_letters() {
        assert_eq!(normalize_line("2. 李雷").as_deref(), Some("李雷"));
        assert_eq!(normalize_line("3) Élodie!").as_deref(), Some("Élodie"));
        assert_eq!(canonical_key("Élodie"), "élodie");
    }

    #[test]
    fn test_resolve_non_ascii_and_digit_names() {
        let roster = roster(&["Ann", "李雷", "Élodie", "23Skidoo"]);
        let mut diagnostics = Diagnostics::new();
        let ids =
            resolve_available(&roster, &["1. 李雷", "ÉLODIE", "23skidoo", "4. 23Skidoo"], &mut diagnostics)
                .unwrap();
        assert_eq!(ids, vec![PlayerId(1), PlayerId(2), PlayerId(3)]);
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn test_normalize_drops_empty_lines() {
        assert_eq!(normalize_line(""), None);
        assert_eq!(normalize_line("   "), None);
        assert_eq!(normalize_line("7."), None);
        assert_eq!(normalize_line("!!"), None);
    }

    #[test]
    fn test_normalize_lines_block() {
        let keys = normalize_lines("1. Ann\n\n2. Bob\r\n   \n3) Carl");
        assert_eq!(keys, vec!["Ann", "Bob", "Carl"]);
    }

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("Mario Rossi-Jr."), "mariorossijr");
    }

    #[test]
    fn test_resolve_keeps_input_order() {
        let roster = roster(&["Ann", "Bob", "Carl"]);
        let mut diagnostics = Diagnostics::new();
        let ids = resolve_available(&roster, &["3. carl", "1. ANN"], &mut diagnostics).unwrap();
        assert_eq!(ids, vec![PlayerId(2), PlayerId(0)]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_resolve_unknown_name_reports_exact_input() {
        let roster = roster(&["Ann"]);
        let mut diagnostics = Diagnostics::new();
        let err = resolve_available(&roster, &["1. Ann", "2. Zed?"], &mut diagnostics).unwrap_err();
        assert!(matches!(err, AssignError::UnresolvedPlayer { ref name } if name == "2. Zed?"));
        assert!(diagnostics.has_fatal());
    }

    #[test]
    fn test_resolve_duplicate_is_warning() {
        let roster = roster(&["Ann", "Bob"]);
        let mut diagnostics = Diagnostics::new();
        let ids = resolve_available(&roster, &["Ann", "bob", "ann"], &mut diagnostics).unwrap();
        assert_eq!(ids, vec![PlayerId(0), PlayerId(1)]);
        assert_eq!(diagnostics.warnings().count(), 1);
    }
}
