//! REST API types for the website.
//!
//! `/api/shows` answers with the same `{ upcoming: [...] }` shape as the
//! bundled `shows/index.json`, and `/api/photos` with the same shape as
//! `instagram/index.json`, so the page templates read either one.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::{Member, ShowsDocument};

/// Response of `/api/members`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersResponse {
    pub members: Vec<Member>,
}

/// Response of `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Whether a remote shows sheet is configured
    pub shows_sheet: bool,
    /// Whether a remote photos sheet is configured
    pub photos_sheet: bool,
}

/// Wrap upcoming shows in the bundled-file shape.
pub fn shows_response(upcoming: Vec<crate::models::Show>) -> ShowsDocument {
    ShowsDocument { upcoming }
}

/// Create an error response body
pub fn error_response(message: &str) -> Value {
    json!({
        "status": "error",
        "error": message
    })
}
