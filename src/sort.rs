use std::cmp::Ordering;

use crate::data::{CellKind, Header};
use crate::diff::{RowEvents, RowKind};
use crate::keys::KeyCombo;

/// Active sort choice for a table.
///
/// Holds the column name, not an index; the index is resolved against
/// each snapshot's header since shapes can change between refreshes.
#[derive(Debug, Clone)]
pub struct SortState {
    /// Sorted column name. None means the default, the first column.
    pub column: Option<String>,
    pub ascending: bool,
    /// Key combo that triggered this sort, when user-configured.
    pub key: Option<KeyCombo>,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: None,
            ascending: true,
            key: None,
        }
    }
}

impl SortState {
    /// Select a column to sort by. Re-selecting the active column
    /// toggles direction; a new column starts ascending.
    pub fn set_column(&mut self, name: &str) {
        match self.column.as_deref() {
            Some(current) if current == name => self.ascending = !self.ascending,
            _ => {
                self.column = Some(name.to_string());
                self.ascending = true;
            }
        }
    }
}

/// Stable in-place sort of events by one column.
///
/// The comparator follows the column's declared kind; ties keep their
/// previous relative order, so repeated sorts do not jitter. Fade-out
/// rows stay behind every live row no matter the direction.
pub fn sort_events(events: &mut RowEvents, header: &Header, column: usize, ascending: bool) {
    let kind = header.column(column).map(|c| c.kind).unwrap_or_default();
    events.sort_by(|a, b| {
        let gone = (a.kind == RowKind::Deleted).cmp(&(b.kind == RowKind::Deleted));
        if gone != Ordering::Equal {
            return gone;
        }
        let left = a.row.field(column).unwrap_or("");
        let right = b.row.field(column).unwrap_or("");
        let ord = compare_values(kind, left, right);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

/// Compare two cell values under a column kind's policy.
///
/// Typed kinds order parseable values by magnitude and put everything
/// unparseable after them, compared lexically among themselves. Mixing
/// the two classes lexically would break transitivity, and `sort_by`
/// requires a total order.
pub fn compare_values(kind: CellKind, a: &str, b: &str) -> Ordering {
    match kind {
        CellKind::Text => a.cmp(b),
        CellKind::Numeric => match (parse_numeric(a), parse_numeric(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        },
        CellKind::Duration => match (parse_duration_secs(a), parse_duration_secs(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        },
    }
}

fn parse_numeric(value: &str) -> Option<f64> {
    let v = value.trim().trim_end_matches('%');
    if v.is_empty() {
        return None;
    }
    v.parse::<f64>().ok()
}

/// Parse compound durations like "90s", "5m", "2h3m", "3d". A bare
/// trailing number counts as seconds. Anything else, including a total
/// past u64 range, is unparseable and sorts with the lexical class.
fn parse_duration_secs(value: &str) -> Option<u64> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    let mut total: u64 = 0;
    let mut num: u64 = 0;
    let mut saw_digit = false;
    let mut saw_unit = false;

    for ch in v.chars() {
        if let Some(d) = ch.to_digit(10) {
            num = num.checked_mul(10)?.checked_add(u64::from(d))?;
            saw_digit = true;
        } else {
            let mult = match ch {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return None,
            };
            if !saw_digit {
                return None;
            }
            total = total.checked_add(num.checked_mul(mult)?)?;
            num = 0;
            saw_digit = false;
            saw_unit = true;
        }
    }

    if saw_digit {
        total = total.checked_add(num)?;
    }
    if saw_digit || saw_unit {
        Some(total)
    } else {
        None
    }
}
