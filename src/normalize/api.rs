//! Graph API media → union row

use std::collections::HashMap;

use super::schema::*;
use crate::{CellValue, MediaItem, NormalizedRow};

/// Lifetime marker written into the date columns of API rows
const LIFETIME: &str = "Lifetime";

/// Flatten insights into `metric name → first value`
///
/// Metrics without a name are skipped. A metric whose first value is missing
/// or not numeric maps to a blank cell. Later duplicates win.
pub fn flatten_insights(item: &MediaItem) -> HashMap<&str, CellValue> {
    item.insights
        .iter()
        .flat_map(|block| block.data.iter())
        .filter(|metric| !metric.name.is_empty())
        .map(|metric| (metric.name.as_str(), CellValue::number(metric.first_value())))
        .collect()
}

/// Normalize one media item into the union schema
///
/// `Views` is read from the `plays` insight and `Saves` from `saves`; the
/// `views` and `saved` insights are requested but not mapped. Story-only
/// columns are blank.
///
/// # Arguments
/// * `item` - Media item with its insights
/// * `account_id` - Configured account ID
/// * `username` - Account handle from the account node
/// * `account_name` - Display name from the account node
pub fn normalize_api_row(
    item: &MediaItem,
    account_id: &str,
    username: &str,
    account_name: &str,
) -> NormalizedRow {
    let metrics = flatten_insights(item);
    let metric = |name: &str| metrics.get(name).cloned().unwrap_or_default();
    let field = |value: &Option<String>| CellValue::text(value.as_deref());

    NormalizedRow::from([
        (SOURCE.to_string(), CellValue::from(SOURCE_API)),
        (POST_ID.to_string(), CellValue::from(item.id.as_str())),
        (ACCOUNT_ID.to_string(), CellValue::from(account_id)),
        (ACCOUNT_USERNAME.to_string(), CellValue::from(username)),
        (ACCOUNT_NAME.to_string(), CellValue::from(account_name)),
        (DESCRIPTION.to_string(), field(&item.caption)),
        (DURATION.to_string(), CellValue::Empty),
        (PUBLISH_TIME.to_string(), field(&item.timestamp)),
        (PERMALINK.to_string(), field(&item.permalink)),
        (POST_TYPE.to_string(), field(&item.media_type)),
        (DATA_COMMENT.to_string(), CellValue::from(LIFETIME)),
        (DATE.to_string(), CellValue::from(LIFETIME)),
        (VIEWS.to_string(), metric("plays")),
        (REACH.to_string(), metric("reach")),
        (LIKES.to_string(), metric("likes")),
        (SHARES.to_string(), metric("shares")),
        (REPLIES.to_string(), CellValue::Empty),
        (NAVIGATION.to_string(), CellValue::Empty),
        (PROFILE_VISITS.to_string(), CellValue::Empty),
        (LINK_CLICKS.to_string(), CellValue::Empty),
        (STICKER_TAPS.to_string(), CellValue::Empty),
        (IMPRESSIONS.to_string(), metric("impressions")),
        (COMMENTS.to_string(), metric("comments")),
        (SAVES.to_string(), metric("saves")),
        (TOTAL_INTERACTIONS.to_string(), metric("total_interactions")),
        (MEDIA_URL.to_string(), field(&item.media_url)),
        (THUMBNAIL_URL.to_string(), field(&item.thumbnail_url)),
    ])
}
