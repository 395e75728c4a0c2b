//! Feed configuration.
//!
//! The site's data directory holds a small `feeds.json` naming the optional
//! spreadsheet exports:
//!
//! ```json
//! {
//!   "showsCsv": "https://docs.google.com/spreadsheets/d/e/.../pub?output=csv",
//!   "photosCsv": "",
//!   "photosSource": "https://instagram.com/cascadesimprov"
//! }
//! ```
//!
//! It is read once at startup and handed to [`crate::Feed`] as an immutable
//! value. Environment variables (the CLI also reads `.env`) override the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::logs::log_warning;
use crate::error::{ConfigError, ConfigResult};

/// Data directory used when none is given.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Feed configuration file, relative to the data directory.
pub const FEED_CONFIG_FILE: &str = "feeds.json";

/// Bundled shows fallback, relative to the data directory.
pub const SHOWS_FALLBACK: &str = "shows/index.json";

/// Bundled photos fallback, relative to the data directory.
pub const PHOTOS_FALLBACK: &str = "instagram/index.json";

/// Member index, relative to the data directory.
pub const MEMBERS_INDEX: &str = "members/members.json";

/// Directory holding one `{slug}/info.json` per member, relative to the data directory.
pub const MEMBERS_DIR: &str = "members";

pub const ENV_SHOWS_CSV: &str = "CASCADES_SHOWS_CSV";
pub const ENV_PHOTOS_CSV: &str = "CASCADES_PHOTOS_CSV";
pub const ENV_DATA_DIR: &str = "CASCADES_DATA_DIR";

/// External endpoints for the feeds. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedConfig {
    /// Published CSV export of the shows sheet
    pub shows_csv: Option<String>,
    /// Published CSV export of the photos sheet
    pub photos_csv: Option<String>,
    /// Gallery the photos come from (e.g. an Instagram profile)
    pub photos_source: Option<String>,
    /// Per-request timeout for remote sources; none by default
    pub fetch_timeout_secs: Option<u64>,
}

impl FeedConfig {
    /// Read `feeds.json` from `data_dir`. A missing file is an empty config.
    pub fn load(data_dir: &Path) -> ConfigResult<Self> {
        let path = data_dir.join(FEED_CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::IoError(e)),
        };

        let config: FeedConfig = serde_json::from_str(&content)?;
        Ok(config.cleaned())
    }

    /// Load the config for startup: file, then environment overrides.
    ///
    /// The environment is read as is; `main` loads `.env` before calling this.
    /// An unreadable file is logged and treated as empty, so the site still
    /// serves its bundled data.
    pub fn load_or_default(data_dir: &Path) -> Self {
        let config = Self::load(data_dir).unwrap_or_else(|e| {
            log_warning(format!("Ignoring {}: {}", FEED_CONFIG_FILE, e));
            Self::default()
        });

        config.with_overrides(
            std::env::var(ENV_SHOWS_CSV).ok(),
            std::env::var(ENV_PHOTOS_CSV).ok(),
        )
    }

    /// Replace the configured URLs with any non-blank overrides.
    pub fn with_overrides(mut self, shows_csv: Option<String>, photos_csv: Option<String>) -> Self {
        if let Some(url) = blank_to_none(shows_csv) {
            self.shows_csv = Some(url);
        }
        if let Some(url) = blank_to_none(photos_csv) {
            self.photos_csv = Some(url);
        }
        self
    }

    // Operators leave "" in the file rather than deleting the key.
    fn cleaned(self) -> Self {
        Self {
            shows_csv: blank_to_none(self.shows_csv),
            photos_csv: blank_to_none(self.photos_csv),
            photos_source: blank_to_none(self.photos_source),
            fetch_timeout_secs: self.fetch_timeout_secs,
        }
    }
}

/// Resolve the data directory: explicit argument, then environment, then
/// `data` under `site_root`.
pub fn resolve_data_dir(explicit: Option<PathBuf>, site_root: &Path) -> PathBuf {
    explicit
        .or_else(|| {
            std::env::var(ENV_DATA_DIR)
                .ok()
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| site_root.join(DEFAULT_DATA_DIR))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
