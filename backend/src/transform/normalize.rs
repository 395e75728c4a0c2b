//! Image source normalization.
//!
//! Spreadsheet cells hold whatever the operator pasted: protocol-relative
//! CDN links, Google Drive "view" links, bare `drive.google.com/...` text, or
//! paths into the site's own `data/` folder. Drive share pages are not images,
//! so any Drive link with a recognizable file id is rewritten to the Drive
//! thumbnail endpoint, which serves raw image bytes for publicly shared files.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

/// Width requested from the Drive thumbnail endpoint.
pub const DRIVE_THUMBNAIL_WIDTH: u32 = 1200;

const DRIVE_HOSTS: [&str; 2] = ["drive.google.com", "docs.google.com"];

static DRIVE_FILE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/file/d/([A-Za-z0-9_-]+)").expect("valid drive path pattern"));

/// Rewrite an image source into a directly embeddable URL.
///
/// Never fails; anything unrecognized passes through unchanged.
///
/// ```
/// use cascades::normalize_src;
///
/// assert_eq!(
///     normalize_src("https://drive.google.com/file/d/ABC123/view?usp=sharing"),
///     "https://drive.google.com/thumbnail?id=ABC123&sz=w1200",
/// );
/// assert_eq!(normalize_src("//cdn.example.com/x.png"), "https://cdn.example.com/x.png");
/// assert_eq!(normalize_src("data/assets/a.svg"), "data/assets/a.svg");
/// ```
pub fn normalize_src(raw: &str) -> String {
    let src = raw.trim();
    if src.is_empty() {
        return String::new();
    }

    let src = match src.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => src.to_string(),
    };

    if is_absolute_http(&src) {
        return drive_thumbnail(&src).unwrap_or(src);
    }

    let lower = src.to_ascii_lowercase();
    if DRIVE_HOSTS.iter().any(|host| lower.starts_with(host)) {
        let prefixed = format!("https://{}", src);
        return drive_thumbnail(&prefixed).unwrap_or(prefixed);
    }

    src
}

/// Drive file id of a share link, if `url` is one.
///
/// Recognizes `/file/d/{id}/...` paths and `?id={id}` query parameters on
/// Drive hosts.
pub fn drive_file_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    if !DRIVE_HOSTS.contains(&host.as_str()) {
        return None;
    }

    if let Some(caps) = DRIVE_FILE_PATH.captures(parsed.path()) {
        return Some(caps[1].to_string());
    }

    parsed
        .query_pairs()
        .find(|(key, value)| key == "id" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

fn drive_thumbnail(url: &str) -> Option<String> {
    drive_file_id(url).map(|id| {
        format!(
            "https://drive.google.com/thumbnail?id={}&sz=w{}",
            id, DRIVE_THUMBNAIL_WIDTH
        )
    })
}

fn is_absolute_http(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
