//! Output column vocabulary

/// Provenance column
pub const SOURCE: &str = "Source";
/// Provenance value for Graph API rows
pub const SOURCE_API: &str = "API";
/// Provenance value for story CSV rows
pub const SOURCE_STORIES_CSV: &str = "Stories CSV";

/// Post ID column
pub const POST_ID: &str = "Post ID";
/// Account ID column
pub const ACCOUNT_ID: &str = "Account ID";
/// Account username column
pub const ACCOUNT_USERNAME: &str = "Account username";
/// Account display name column
pub const ACCOUNT_NAME: &str = "Account name";
/// Caption column
pub const DESCRIPTION: &str = "Description";
/// Story duration column
pub const DURATION: &str = "Duration (sec)";
/// Publish time column
pub const PUBLISH_TIME: &str = "Publish time";
/// Permalink column
pub const PERMALINK: &str = "Permalink";
/// Media type column
pub const POST_TYPE: &str = "Post type";
/// Data comment column
pub const DATA_COMMENT: &str = "Data comment";
/// Date column
pub const DATE: &str = "Date";
/// Views column
pub const VIEWS: &str = "Views";
/// Reach column
pub const REACH: &str = "Reach";
/// Likes column
pub const LIKES: &str = "Likes";
/// Shares column
pub const SHARES: &str = "Shares";
/// Story replies column
pub const REPLIES: &str = "Replies";
/// Story navigation column
pub const NAVIGATION: &str = "Navigation";
/// Profile visits column
pub const PROFILE_VISITS: &str = "Profile visits";
/// Link clicks column
pub const LINK_CLICKS: &str = "Link clicks";
/// Sticker taps column
pub const STICKER_TAPS: &str = "Sticker taps";
/// Impressions column
pub const IMPRESSIONS: &str = "Impressions";
/// Comments column
pub const COMMENTS: &str = "Comments";
/// Saves column
pub const SAVES: &str = "Saves";
/// Total interactions column
pub const TOTAL_INTERACTIONS: &str = "Total Interactions";
/// Media URL column
pub const MEDIA_URL: &str = "Media URL";
/// Thumbnail URL column
pub const THUMBNAIL_URL: &str = "Thumbnail URL";

/// Canonical column order of the merged report
pub const PREFERRED_ORDER: [&str; 27] = [
    SOURCE,
    POST_ID,
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
    IMPRESSIONS,
    COMMENTS,
    SAVES,
    TOTAL_INTERACTIONS,
    MEDIA_URL,
    THUMBNAIL_URL,
];
