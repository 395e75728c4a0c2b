//! Record mapping, validation, and ordering.
//!
//! Maps parsed CSV records (or bundled JSON entries) into [`Show`] and
//! [`Photo`] values. The mapper never fails: rows missing a required field
//! are dropped and reported as [`SkippedRow`]s.
//!
//! ```text
//! CsvRecord ──resolve──▶ Show ──clean──▶ MapResult<Show> ──upcoming_shows(now)──▶ Vec<Show>
//! CsvRecord ──resolve──▶ Photo ──clean──▶ MapResult<Photo>
//! ```

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

use super::normalize::normalize_src;
use super::resolve::{self, resolve, resolve_optional};
use crate::models::{Photo, Show};
use crate::parser::CsvRecord;

/// Outcome of mapping a batch of rows.
#[derive(Debug, Clone)]
pub struct MapResult<T> {
    /// Rows that passed validation, in input order
    pub items: Vec<T>,
    /// Rows dropped for missing required fields
    pub skipped: Vec<SkippedRow>,
}

/// A row that was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Zero-based index in the input batch
    pub row: usize,
    pub reason: String,
    pub missing_fields: Vec<String>,
}

impl<T> MapResult<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn summary(&self) -> String {
        format!("Mapped: {} rows, {} skipped", self.items.len(), self.skipped.len())
    }
}

// =============================================================================
// Shows
// =============================================================================

/// Map one CSV record onto a show, without validation.
pub fn show_from_record(record: &CsvRecord) -> Show {
    Show {
        title: resolve(record, resolve::SHOW_TITLE),
        date: resolve(record, resolve::SHOW_DATE),
        venue: resolve(record, resolve::SHOW_VENUE),
        city: resolve_optional(record, resolve::SHOW_CITY),
        description: resolve_optional(record, resolve::SHOW_DESCRIPTION),
        ticket_url: resolve_optional(record, resolve::SHOW_TICKET_URL),
        poster: resolve_optional(record, resolve::SHOW_POSTER),
        thumbnail: resolve_optional(record, resolve::SHOW_THUMBNAIL),
    }
}

/// Map CSV records to shows, dropping rows without a title or date.
pub fn map_shows(records: &[CsvRecord]) -> MapResult<Show> {
    clean_shows(records.iter().map(show_from_record).collect())
}

/// Trim, normalize image URLs, and drop shows without a title or date.
///
/// Used for both CSV-mapped shows and bundled JSON entries.
pub fn clean_shows(shows: Vec<Show>) -> MapResult<Show> {
    let mut result = MapResult::new();

    for (row, show) in shows.into_iter().enumerate() {
        let show = clean_show(show);

        let mut missing = Vec::new();
        if show.title.is_empty() {
            missing.push("title".to_string());
        }
        if show.date.is_empty() {
            missing.push("date".to_string());
        }

        if missing.is_empty() {
            result.items.push(show);
        } else {
            result.skipped.push(SkippedRow {
                row,
                reason: "Show is missing required fields".to_string(),
                missing_fields: missing,
            });
        }
    }

    result
}

fn clean_show(show: Show) -> Show {
    Show {
        title: show.title.trim().to_string(),
        date: show.date.trim().to_string(),
        venue: show.venue.trim().to_string(),
        city: non_empty(show.city),
        description: non_empty(show.description),
        ticket_url: non_empty(show.ticket_url),
        poster: normalized(show.poster),
        thumbnail: normalized(show.thumbnail),
    }
}

/// Sort shows by date and keep those not strictly before `now`.
///
/// The sort is stable, so shows on the same date keep their input order.
/// Shows whose date cannot be parsed are dropped, since they cannot be placed
/// in time. A date without a time of day stays upcoming for that whole day.
pub fn upcoming_shows(shows: Vec<Show>, now: NaiveDateTime) -> Vec<Show> {
    let mut dated: Vec<(ShowDate, Show)> = shows
        .into_iter()
        .filter_map(|show| parse_show_date(&show.date).map(|date| (date, show)))
        .collect();

    dated.sort_by_key(|(date, _)| date.sort_key());

    dated
        .into_iter()
        .filter(|(date, _)| !date.is_before(now))
        .map(|(_, show)| show)
        .collect()
}

/// Parsed form of a show's `date` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowDate {
    /// Calendar day only
    Day(NaiveDate),
    /// Day and time, in local wall-clock time
    At(NaiveDateTime),
}

impl ShowDate {
    fn sort_key(&self) -> NaiveDateTime {
        match self {
            ShowDate::Day(day) => day.and_time(NaiveTime::MIN),
            ShowDate::At(at) => *at,
        }
    }

    /// Whether this show is over at `now`.
    pub fn is_before(&self, now: NaiveDateTime) -> bool {
        match self {
            ShowDate::Day(day) => *day < now.date(),
            ShowDate::At(at) => *at < now,
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse a show date as spreadsheets and hand-written JSON tend to write it.
///
/// Dates with a UTC offset are converted to local time.
pub fn parse_show_date(value: &str) -> Option<ShowDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(ShowDate::At(with_offset.with_timezone(&Local).naive_local()));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(ShowDate::At)
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(ShowDate::Day)
        })
}

// =============================================================================
// Photos
// =============================================================================

/// Map one CSV record onto a photo, without validation.
pub fn photo_from_record(record: &CsvRecord) -> Photo {
    Photo {
        src: resolve(record, resolve::PHOTO_SRC),
        alt: resolve_optional(record, resolve::PHOTO_ALT),
    }
}

/// Map CSV records to photos, dropping rows without a usable source.
pub fn map_photos(records: &[CsvRecord]) -> MapResult<Photo> {
    clean_photos(records.iter().map(photo_from_record).collect())
}

/// Normalize sources and drop photos whose source ends up empty.
/// Input order is preserved.
pub fn clean_photos(photos: Vec<Photo>) -> MapResult<Photo> {
    let mut result = MapResult::new();

    for (row, photo) in photos.into_iter().enumerate() {
        let src = normalize_src(&photo.src);
        if src.is_empty() {
            result.skipped.push(SkippedRow {
                row,
                reason: "Photo has no source".to_string(),
                missing_fields: vec!["src".to_string()],
            });
            continue;
        }
        result.items.push(Photo {
            src,
            alt: non_empty(photo.alt),
        });
    }

    result
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|v| normalize_src(&v))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(title: &str, date: &str) -> Show {
        Show {
            title: title.to_string(),
            date: date.to_string(),
            venue: "The Annex".to_string(),
            ..Show::default()
        }
    }

    fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_map_show_aliases() {
        let record = CsvRecord::from_pairs([
            ("Show", "Harold Night"),
            ("When", "2099-01-01"),
            ("Where", "The Annex"),
            ("City", "Portland"),
            ("Desc", "Long form"),
            ("Tickets", "https://t.example/1"),
            ("Image URL", "https://drive.google.com/file/d/P1/view"),
            ("Thumb", "//cdn.example.com/t.png"),
        ]);

        let shows = map_shows(&[record]).items;

        assert_eq!(shows.len(), 1);
        let s = &shows[0];
        assert_eq!(s.title, "Harold Night");
        assert_eq!(s.date, "2099-01-01");
        assert_eq!(s.venue, "The Annex");
        assert_eq!(s.city.as_deref(), Some("Portland"));
        assert_eq!(s.description.as_deref(), Some("Long form"));
        assert_eq!(s.ticket_url.as_deref(), Some("https://t.example/1"));
        assert_eq!(
            s.poster.as_deref(),
            Some("https://drive.google.com/thumbnail?id=P1&sz=w1200")
        );
        assert_eq!(s.thumbnail.as_deref(), Some("https://cdn.example.com/t.png"));
    }

    #[test]
    fn test_map_shows_drops_missing_required() {
        let records = vec![
            CsvRecord::from_pairs([("title", "Ok"), ("date", "2099-01-01")]),
            CsvRecord::from_pairs([("title", ""), ("date", "2099-01-01")]),
            CsvRecord::from_pairs([("title", "No date"), ("date", "")]),
        ];

        let result = map_shows(&records);

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.skipped.len(), 2);
        assert_eq!(result.skipped[0].row, 1);
        assert_eq!(result.skipped[0].missing_fields, vec!["title"]);
        assert_eq!(result.skipped[1].missing_fields, vec!["date"]);
    }

    #[test]
    fn test_empty_optionals_become_none() {
        let record = CsvRecord::from_pairs([("title", "A"), ("date", "2099-01-01"), ("city", "")]);
        let shows = map_shows(&[record]).items;
        assert_eq!(shows[0].city, None);
        assert_eq!(shows[0].poster, None);
    }

    #[test]
    fn test_upcoming_filters_and_sorts() {
        let shows = vec![
            show("Late", "2099-06-01"),
            show("Past", "2001-01-01"),
            show("Early", "2099-01-01"),
        ];

        let upcoming = upcoming_shows(shows, at("2026-10-16 12:00"));

        let titles: Vec<_> = upcoming.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Late"]);
    }

    #[test]
    fn test_upcoming_stable_on_ties() {
        let shows = vec![
            show("First", "2099-01-01"),
            show("Second", "2099-01-01"),
            show("Earlier", "2098-12-31"),
            show("Third", "2099-01-01"),
        ];

        let upcoming = upcoming_shows(shows, at("2026-10-16 12:00"));

        let titles: Vec<_> = upcoming.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Earlier", "First", "Second", "Third"]);
    }

    #[test]
    fn test_upcoming_same_day_kept() {
        let now = at("2026-10-16 21:00");
        let shows = vec![
            show("Today", "2026-10-16"),
            show("Earlier tonight", "2026-10-16T19:30"),
            show("Later tonight", "2026-10-16 22:00"),
        ];

        let titles: Vec<_> = upcoming_shows(shows, now)
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Today", "Later tonight"]);
    }

    #[test]
    fn test_upcoming_drops_unparseable_dates() {
        let shows = vec![show("Soon", "sometime"), show("Real", "2099-01-01")];
        let upcoming = upcoming_shows(shows, at("2026-10-16 12:00"));
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].title, "Real");
    }

    #[test]
    fn test_parse_show_date_formats() {
        let day = NaiveDate::from_ymd_opt(2099, 1, 5).unwrap();

        assert_eq!(parse_show_date("2099-01-05"), Some(ShowDate::Day(day)));
        assert_eq!(parse_show_date("1/5/2099"), Some(ShowDate::Day(day)));
        assert_eq!(parse_show_date("2099/01/05"), Some(ShowDate::Day(day)));
        assert_eq!(
            parse_show_date("2099-01-05T19:30"),
            Some(ShowDate::At(at("2099-01-05 19:30")))
        );
        assert_eq!(
            parse_show_date("1/5/2099 19:30:00"),
            Some(ShowDate::At(at("2099-01-05 19:30")))
        );
        assert!(matches!(
            parse_show_date("2099-01-05T19:30:00Z"),
            Some(ShowDate::At(_))
        ));
        assert_eq!(parse_show_date("next tuesday"), None);
        assert_eq!(parse_show_date(""), None);
    }

    #[test]
    fn test_map_photos() {
        let records = vec![
            CsvRecord::from_pairs([("Photo", "//cdn.example.com/1.jpg"), ("Caption", "Bow")]),
            CsvRecord::from_pairs([("Photo", ""), ("Caption", "Missing")]),
            CsvRecord::from_pairs([("Link", "https://drive.google.com/open?id=D2")]),
        ];

        let result = map_photos(&records);

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].src, "https://cdn.example.com/1.jpg");
        assert_eq!(result.items[0].alt.as_deref(), Some("Bow"));
        assert_eq!(result.items[1].src, "https://drive.google.com/thumbnail?id=D2&sz=w1200");
        assert_eq!(result.items[1].alt, None);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].row, 1);
    }

    #[test]
    fn test_photo_alt_falls_back_to_title() {
        let record = CsvRecord::from_pairs([("src", "data/assets/a.svg"), ("title", "Backstage")]);
        let photos = map_photos(&[record]).items;
        assert_eq!(photos[0].alt.as_deref(), Some("Backstage"));
    }

    #[test]
    fn test_summary() {
        let result = clean_photos(vec![Photo::default()]);
        assert_eq!(result.summary(), "Mapped: 0 rows, 1 skipped");
    }
}
