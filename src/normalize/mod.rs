//! Row normalization into the union schema
//!
//! API media and story CSV rows have unrelated shapes. Both normalizers emit
//! every column of [`schema::PREFERRED_ORDER`], blank where a source has no
//! equivalent, so merged rows always share one key set.

pub mod api;
pub mod headers;
pub mod schema;
pub mod story;

pub use api::{flatten_insights, normalize_api_row};
pub use headers::union_headers;
pub use schema::PREFERRED_ORDER;
pub use story::normalize_story_row;
