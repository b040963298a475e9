use thiserror::Error;

use crate::keys::{lookup_key, KeyCombo, KeyLookupError};

/// Rejection reasons for a SortKeys configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortKeyError {
    #[error("malformed SortKeys entry, expected 'column:key' format")]
    Malformed,
    #[error("sortKeys column not found in Columns")]
    ColumnNotFound,
    #[error("invalid key name in SortKeys entry: {0}")]
    InvalidKeyName(#[from] KeyLookupError),
}

/// Parse one `"COLUMN:KEYNAME"` entry against a view's column list.
///
/// Validation runs format, then column membership, then key name, and
/// stops at the first failure. The format check demands exactly two
/// non-empty parts around the colon. Pure; registry state is the
/// caller's.
pub fn parse_custom_sort_key(
    entry: &str,
    columns: &[String],
) -> Result<(String, KeyCombo), SortKeyError> {
    let mut parts = entry.split(':');
    let (column, key_name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(column), Some(key_name), None) if !column.is_empty() && !key_name.is_empty() => {
            (column, key_name)
        }
        _ => return Err(SortKeyError::Malformed),
    };

    if !columns.iter().any(|c| c == column) {
        return Err(SortKeyError::ColumnNotFound);
    }

    let combo = lookup_key(key_name)?;
    Ok((column.to_string(), combo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    fn columns() -> Vec<String> {
        ["ACTIVE", "AGE", "SLOTS"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_valid_entry_with_shift() {
        let (col, combo) = parse_custom_sort_key("ACTIVE:Shift-0", &columns()).unwrap();
        assert_eq!(col, "ACTIVE");
        assert_eq!(combo, KeyCombo::plain(KeyCode::Char(')')));
    }

    #[test]
    fn test_valid_entry_with_ctrl() {
        let (col, combo) = parse_custom_sort_key("AGE:Ctrl-S", &columns()).unwrap();
        assert_eq!(col, "AGE");
        assert_eq!(combo, KeyCombo::ctrl(KeyCode::Char('s')));
    }

    #[test]
    fn test_missing_colon_is_malformed() {
        let err = parse_custom_sort_key("AGEShift-1", &columns()).unwrap_err();
        assert_eq!(err, SortKeyError::Malformed);
        assert_eq!(
            err.to_string(),
            "malformed SortKeys entry, expected 'column:key' format"
        );
    }

    #[test]
    fn test_extra_colon_is_malformed() {
        let err = parse_custom_sort_key("AGE:Ctrl:S", &columns()).unwrap_err();
        assert_eq!(err, SortKeyError::Malformed);
    }

    #[test]
    fn test_unknown_column() {
        let err = parse_custom_sort_key("BLEE:Shift-2", &columns()).unwrap_err();
        assert_eq!(err, SortKeyError::ColumnNotFound);
        assert_eq!(err.to_string(), "sortKeys column not found in Columns");
    }

    #[test]
    fn test_unknown_key_name() {
        let err = parse_custom_sort_key("SLOTS:NotAKey", &columns()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid key name in SortKeys entry: invalid key specified: \"NotAKey\""
        );
    }

    #[test]
    fn test_column_checked_before_key() {
        let err = parse_custom_sort_key("BLEE:NotAKey", &columns()).unwrap_err();
        assert_eq!(err, SortKeyError::ColumnNotFound);
    }

    #[test]
    fn test_empty_parts_are_malformed() {
        // Splitting on the colon is not enough; both halves must be
        // non-empty before column or key validation even runs.
        assert_eq!(
            parse_custom_sort_key(":Shift-0", &columns()).unwrap_err(),
            SortKeyError::Malformed,
            "empty column"
        );
        assert_eq!(
            parse_custom_sort_key("AGE:", &columns()).unwrap_err(),
            SortKeyError::Malformed,
            "empty key name"
        );
        assert_eq!(
            parse_custom_sort_key(":", &columns()).unwrap_err(),
            SortKeyError::Malformed
        );
    }
}
