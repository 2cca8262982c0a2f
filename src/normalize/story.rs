//! Story CSV row → union row

use super::schema::*;
use crate::{CellValue, CsvRow, NormalizedRow};

/// Alternate headers seen in story exports, tried after the canonical name
const POST_ID_ALIASES: [&str; 1] = ["PostID"];

/// Columns copied verbatim from a story export
const STORY_COLUMNS: [&str; 19] = [
    ACCOUNT_ID,
    ACCOUNT_USERNAME,
    ACCOUNT_NAME,
    DESCRIPTION,
    DURATION,
    PUBLISH_TIME,
    PERMALINK,
    POST_TYPE,
    DATA_COMMENT,
    DATE,
    VIEWS,
    REACH,
    LIKES,
    SHARES,
    REPLIES,
    NAVIGATION,
    PROFILE_VISITS,
    LINK_CLICKS,
    STICKER_TAPS,
];

/// Normalize one story CSV row into the union schema
///
/// Columns are looked up by exact header; missing headers become blank.
/// API-only metrics and media URLs are always blank.
pub fn normalize_story_row(row: &CsvRow) -> NormalizedRow {
    let lookup = |column: &str| CellValue::text(row.get(column));

    let post_id = std::iter::once(POST_ID)
        .chain(POST_ID_ALIASES)
        .find_map(|column| row.get(column))
        .map_or(CellValue::Empty, |v| CellValue::from(v.as_str()));

    let mut normalized = NormalizedRow::with_capacity(PREFERRED_ORDER.len());
    for column in PREFERRED_ORDER {
        let value = match column {
            SOURCE => CellValue::from(SOURCE_STORIES_CSV),
            POST_ID => post_id.clone(),
            c if STORY_COLUMNS.contains(&c) => lookup(c),
            _ => CellValue::Empty,
        };
        normalized.insert(column.to_string(), value);
    }
    normalized
}
