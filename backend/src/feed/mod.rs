//! Feed orchestration: the entry points the website reads.
//!
//! [`Feed`] owns the startup configuration and an HTTP client, and builds a
//! fresh result on every call:
//!
//! 1. Build the source chain (configured sheet, then bundled JSON)
//! 2. Load and decode the first source that works
//! 3. Map, validate, and (for shows) sort and drop past dates
//!
//! Callers always get a typed result. When nothing can be loaded the result
//! is empty, which the site shows as "no shows booked yet".
//!
//! # Example
//!
//! ```rust,ignore
//! use cascades::{Feed, FeedConfig};
//!
//! let feed = Feed::new(FeedConfig::load_or_default("data".as_ref()), "data");
//! for show in feed.get_shows().await {
//!     println!("{} at {}", show.title, show.venue);
//! }
//! ```

use chrono::{Local, NaiveDateTime};
use futures::future::join_all;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::logs::{log_info, log_warning};
use crate::config::{FeedConfig, MEMBERS_DIR, MEMBERS_INDEX, PHOTOS_FALLBACK, SHOWS_FALLBACK};
use crate::error::{SourceError, SourceResult};
use crate::models::{Member, MembersIndex, PhotoFeed, Show, ShowsDocument};
use crate::parser::{parse_records, CsvRecord};
use crate::source::{load, Payload, PayloadFormat, Source, SourceChain};
use crate::transform::resolve::{PHOTO_SRC, SHOW_DATE, SHOW_TITLE};
use crate::transform::{
    clean_photos, clean_shows, has_column, map_photos, map_shows, upcoming_shows, MapResult,
};

/// Read-only feed service, shared by every request.
#[derive(Debug, Clone)]
pub struct Feed {
    config: FeedConfig,
    data_dir: PathBuf,
    client: Client,
}

impl Feed {
    /// Create a feed over `data_dir` with the given configuration.
    pub fn new(config: FeedConfig, data_dir: impl Into<PathBuf>) -> Self {
        let mut builder = Client::builder();
        if let Some(secs) = config.fetch_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|e| {
            log_warning(format!("Falling back to default HTTP client: {}", e));
            Client::new()
        });

        Self::with_client(config, data_dir, client)
    }

    /// Create a feed with a caller-supplied HTTP client.
    pub fn with_client(config: FeedConfig, data_dir: impl Into<PathBuf>, client: Client) -> Self {
        Self {
            config,
            data_dir: data_dir.into(),
            client,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Source chain for shows: configured sheet, then bundled JSON.
    pub fn shows_chain(&self) -> SourceChain {
        SourceChain::new()
            .with_remote(self.config.shows_csv.as_deref())
            .with_bundled(self.data_dir.join(SHOWS_FALLBACK))
    }

    /// Source chain for photos: configured sheet, then bundled JSON.
    pub fn photos_chain(&self) -> SourceChain {
        SourceChain::new()
            .with_remote(self.config.photos_csv.as_deref())
            .with_bundled(self.data_dir.join(PHOTOS_FALLBACK))
    }

    // =========================================================================
    // Shows
    // =========================================================================

    /// Upcoming shows, soonest first, as of the local wall clock.
    pub async fn get_shows(&self) -> Vec<Show> {
        self.get_shows_at(Local::now().naive_local()).await
    }

    /// Upcoming shows as of `now`.
    pub async fn get_shows_at(&self, now: NaiveDateTime) -> Vec<Show> {
        let shows = self
            .shows_chain()
            .first_success(&self.client, "shows", decode_shows)
            .await
            .unwrap_or_default();

        let upcoming = upcoming_shows(shows, now);
        log_info(format!("shows: {} upcoming", upcoming.len()));
        upcoming
    }

    // =========================================================================
    // Photos
    // =========================================================================

    /// Gallery photos in sheet order.
    pub async fn get_photo_feed(&self) -> PhotoFeed {
        let configured_source = self.config.photos_source.clone();

        let feed = self
            .photos_chain()
            .first_success(&self.client, "photos", |payload| {
                decode_photo_feed(payload, configured_source.as_deref())
            })
            .await
            .unwrap_or_else(|| PhotoFeed {
                source: configured_source.clone(),
                photos: Vec::new(),
            });

        log_info(format!("photos: {} photos", feed.photos.len()));
        feed
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Troupe members from the bundled member files, or the built-in roster.
    pub async fn get_members(&self) -> Vec<Member> {
        match self.load_members().await {
            Ok(members) if !members.is_empty() => members,
            Ok(_) => {
                log_warning("members: member index is empty, using built-in roster");
                Member::fallback_roster()
            }
            Err(e) => {
                log_warning(format!("members: {} (using built-in roster)", e));
                Member::fallback_roster()
            }
        }
    }

    async fn load_members(&self) -> SourceResult<Vec<Member>> {
        let index_source = Source::bundled(self.data_dir.join(MEMBERS_INDEX));
        let payload = load(&self.client, &index_source).await?;
        let index: MembersIndex = decode_json(&payload)?;

        let loads = index.members.iter().map(|slug| self.load_member(slug));
        join_all(loads).await.into_iter().collect()
    }

    async fn load_member(&self, slug: &str) -> SourceResult<Member> {
        let source = Source::bundled(self.data_dir.join(MEMBERS_DIR).join(slug).join("info.json"));
        let payload = load(&self.client, &source).await?;
        let member: Member = decode_json(&payload)?;

        Ok(Member {
            slug: slug.to_string(),
            ..member
        })
    }
}

// =============================================================================
// Decoders
// =============================================================================

/// Decode a shows payload (sheet CSV or `{ upcoming: [...] }` JSON).
///
/// Returns every valid show; date ordering and filtering happen afterwards.
pub fn decode_shows(payload: Payload) -> SourceResult<Vec<Show>> {
    let mapped = match payload.format {
        PayloadFormat::Csv => {
            let records = parse_records(&payload.body);
            if records.is_empty() {
                return Err(SourceError::Empty(payload.origin));
            }
            require_columns(&payload, &records, &[("title", SHOW_TITLE), ("date", SHOW_DATE)])?;
            map_shows(&records)
        }
        PayloadFormat::Json => {
            let doc: ShowsDocument = decode_json(&payload)?;
            clean_shows(doc.upcoming)
        }
    };

    report_skipped("shows", &payload.origin, &mapped);
    Ok(mapped.items)
}

/// Decode a photos payload (sheet CSV or `{ source?, photos: [...] }` JSON).
///
/// `configured_source` fills in the gallery link when the payload has none.
pub fn decode_photo_feed(payload: Payload, configured_source: Option<&str>) -> SourceResult<PhotoFeed> {
    let (source, mapped) = match payload.format {
        PayloadFormat::Csv => {
            let records = parse_records(&payload.body);
            if records.is_empty() {
                return Err(SourceError::Empty(payload.origin));
            }
            require_columns(&payload, &records, &[("src", PHOTO_SRC)])?;
            (None, map_photos(&records))
        }
        PayloadFormat::Json => {
            let doc: PhotoFeed = decode_json(&payload)?;
            (doc.source, clean_photos(doc.photos))
        }
    };

    report_skipped("photos", &payload.origin, &mapped);
    Ok(PhotoFeed {
        source: source
            .filter(|s| !s.trim().is_empty())
            .or_else(|| configured_source.map(str::to_string)),
        photos: mapped.items,
    })
}

// A sheet without the required columns is the wrong document, not a sheet of
// incomplete rows.
fn require_columns(payload: &Payload, records: &[CsvRecord], required: &[(&str, &[&str])]) -> SourceResult<()> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, aliases)| !has_column(records, aliases))
        .map(|(field, _)| *field)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SourceError::parse(
            &payload.origin,
            format!("no column for {}", missing.join(", ")),
        ))
    }
}

fn decode_json<T: serde::de::DeserializeOwned>(payload: &Payload) -> SourceResult<T> {
    serde_json::from_str(&payload.body).map_err(|e| SourceError::parse(&payload.origin, e.to_string()))
}

fn report_skipped<T>(feed: &str, origin: &str, mapped: &MapResult<T>) {
    if mapped.skipped.is_empty() {
        return;
    }
    log_warning(format!(
        "{}: {} rows skipped in {}",
        feed,
        mapped.skipped.len(),
        origin
    ));
    for skip in mapped.skipped.iter().take(5) {
        log_warning(format!(
            "• row {}: missing {}",
            skip.row + 1,
            skip.missing_fields.join(", ")
        ));
    }
}
