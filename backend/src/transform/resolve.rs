//! Field resolution by ordered header aliases.
//!
//! Operators name their spreadsheet columns however they like ("Show",
//! "Title", "Name"). Each model field has a fixed alias list, most canonical
//! name first; the first alias with a non-empty value wins.

use crate::parser::{normalize_header, CsvRecord};

// Show fields
pub const SHOW_TITLE: &[&str] = &["title", "name", "show"];
pub const SHOW_DATE: &[&str] = &["date", "datetime", "when"];
pub const SHOW_VENUE: &[&str] = &["venue", "where"];
pub const SHOW_CITY: &[&str] = &["city"];
pub const SHOW_DESCRIPTION: &[&str] = &["description", "desc"];
pub const SHOW_TICKET_URL: &[&str] = &["ticketurl", "ticket_url", "ticket", "tickets"];
pub const SHOW_POSTER: &[&str] = &["poster", "image", "imageurl", "image_url", "full", "fullposter"];
pub const SHOW_THUMBNAIL: &[&str] = &["thumbnail", "thumb", "thumburl", "thumb_url"];

// Photo fields
pub const PHOTO_SRC: &[&str] = &["src", "url", "image", "photo", "link"];
pub const PHOTO_ALT: &[&str] = &["alt", "caption", "title"];

/// Value of the first alias present in `record` with a non-empty value.
///
/// Aliases go through the same normalization as CSV headers, so
/// `"ticketUrl"`, `"ticket_url"` and `"ticketurl"` are interchangeable.
/// Returns `""` when no alias matches.
pub fn resolve(record: &CsvRecord, aliases: &[&str]) -> String {
    aliases
        .iter()
        .map(|alias| normalize_header(alias))
        .find_map(|key| record.get(&key).filter(|value| !value.is_empty()))
        .unwrap_or_default()
        .to_string()
}

/// Like [`resolve`], but `None` instead of `""`.
pub fn resolve_optional(record: &CsvRecord, aliases: &[&str]) -> Option<String> {
    Some(resolve(record, aliases)).filter(|value| !value.is_empty())
}

/// Whether any record carries a column for one of `aliases`, even an empty one.
pub fn has_column(records: &[CsvRecord], aliases: &[&str]) -> bool {
    let keys: Vec<String> = aliases.iter().map(|alias| normalize_header(alias)).collect();
    records
        .iter()
        .any(|record| keys.iter().any(|key| record.get(key).is_some()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_normalizes_aliases() {
        let record = CsvRecord::from_pairs([("ticketurl", "x")]);
        assert_eq!(resolve(&record, &["ticketUrl", "ticket_url", "ticket"]), "x");
    }

    #[test]
    fn test_resolve_no_match() {
        let record = CsvRecord::from_pairs([("venue", "The Annex")]);
        assert_eq!(resolve(&record, &["ticketUrl", "ticket_url", "ticket"]), "");
        assert_eq!(resolve_optional(&record, SHOW_CITY), None);
    }

    #[test]
    fn test_resolve_alias_order() {
        let record = CsvRecord::from_pairs([("Show", "Second"), ("Title", "First")]);
        assert_eq!(resolve(&record, SHOW_TITLE), "First");
    }

    #[test]
    fn test_resolve_skips_empty_values() {
        let record = CsvRecord::from_pairs([("Title", ""), ("Name", "Fallback Name")]);
        assert_eq!(resolve(&record, SHOW_TITLE), "Fallback Name");
    }

    #[test]
    fn test_has_column() {
        let records = vec![CsvRecord::from_pairs([("Show Date", ""), ("Where", "Annex")])];

        assert!(!has_column(&records, SHOW_DATE));
        assert!(has_column(&records, SHOW_VENUE));
        assert!(has_column(&[CsvRecord::from_pairs([("When", "")])], SHOW_DATE));
        assert!(!has_column(&[], SHOW_TITLE));
    }

    #[test]
    fn test_resolve_header_variants() {
        for header in ["Ticket URL", "ticket_url", "TicketUrl"] {
            let record = CsvRecord::from_pairs([(header, "https://t.example/1")]);
            assert_eq!(resolve(&record, SHOW_TICKET_URL), "https://t.example/1");
        }
    }
}
