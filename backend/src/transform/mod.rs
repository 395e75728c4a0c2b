//! Transformation module.
//!
//! Turns parsed CSV records into typed feed entries:
//! - Resolve: field lookup by ordered header aliases
//! - Normalize: image URL rewriting (protocol-relative, Google Drive)
//! - Mapper: record mapping, validation, ordering and date filtering

pub mod mapper;
pub mod normalize;
pub mod resolve;

pub use mapper::{
    clean_photos, clean_shows, map_photos, map_shows, parse_show_date, upcoming_shows, MapResult,
    ShowDate, SkippedRow,
};
pub use normalize::{drive_file_id, normalize_src};
pub use resolve::{has_column, resolve, resolve_optional};
