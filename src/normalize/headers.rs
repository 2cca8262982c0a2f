//! Header union across normalized rows

use indexmap::IndexSet;

use super::schema::PREFERRED_ORDER;
use crate::NormalizedRow;

/// Column order for a set of rows
///
/// Preferred columns that appear in any row come first, in preferred order.
/// Every other observed column follows in first-seen order.
pub fn union_headers(rows: &[NormalizedRow]) -> Vec<String> {
    let observed: IndexSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let preferred = PREFERRED_ORDER
        .iter()
        .copied()
        .filter(|column| observed.contains(column));
    let extras = observed
        .iter()
        .copied()
        .filter(|column| !PREFERRED_ORDER.contains(column));

    preferred.chain(extras).map(str::to_string).collect()
}
