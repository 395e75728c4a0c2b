//! CSV tokenizer for spreadsheet exports.
//!
//! Turns the text of a "publish to web" CSV export into header-keyed
//! [`CsvRecord`]s. Headers are normalized so that `Ticket URL`, `ticket_url`
//! and `TicketUrl` all land on the same key (`ticketurl`).
//!
//! The tokenizer is total: any text produces some (possibly empty) sequence
//! of records. Shape validation happens later, in the mapper.

use serde::Serialize;
use std::collections::BTreeMap;
use std::mem::take;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// One data row of a CSV export, keyed by normalized header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CsvRecord {
    fields: BTreeMap<String, String>,
}

impl CsvRecord {
    /// Build a record from `(header, value)` pairs. Headers are normalized
    /// and values trimmed, exactly as the parser would.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut record = Self::default();
        for (key, value) in pairs {
            record.insert(&normalize_header(key.as_ref()), value.as_ref().trim());
        }
        record
    }

    /// Value stored under an already-normalized key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    // Duplicate headers: the first non-empty cell wins.
    fn insert(&mut self, key: &str, value: &str) {
        if key.is_empty() {
            return;
        }
        match self.fields.get_mut(key) {
            Some(existing) if existing.is_empty() => *existing = value.to_string(),
            Some(_) => {}
            None => {
                self.fields.insert(key.to_string(), value.to_string());
            }
        }
    }
}

/// Lowercase a header and drop every character outside `[a-z0-9]`.
///
/// ```
/// use cascades::parser::normalize_header;
///
/// assert_eq!(normalize_header("Ticket URL"), "ticketurl");
/// assert_eq!(normalize_header("ticket_url"), "ticketurl");
/// ```
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Split CSV text into rows of trimmed cells.
///
/// Quotes only change how delimiters are read: `""` inside a quoted section
/// is a literal quote, and CR, LF and CRLF all end a row. Blank lines are
/// dropped. Unterminated quotes and a missing final newline still flush the
/// last row.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => row.push(take(&mut field).trim().to_string()),
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                flush_row(&mut rows, &mut row, &mut field);
            }
            _ => field.push(ch),
        }
    }

    flush_row(&mut rows, &mut row, &mut field);
    rows
}

fn flush_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, field: &mut String) {
    if field.is_empty() && row.is_empty() {
        return;
    }
    row.push(take(field).trim().to_string());
    rows.push(take(row));
}

/// Parse CSV text into records keyed by the normalized first row.
///
/// Missing trailing cells map to `""`; extra cells are ignored; rows made of
/// empty cells only are skipped.
///
/// # Example
/// ```
/// use cascades::parse_records;
///
/// let records = parse_records("Title,Ticket URL\nHarold Night,https://t.example/1\n");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].get("ticketurl"), Some("https://t.example/1"));
/// ```
pub fn parse_records(text: &str) -> Vec<CsvRecord> {
    let mut rows = tokenize(text).into_iter();

    // Leading blank lines (or lines of empty cells) are not the header.
    let headers: Vec<String> = match rows.find(|row| row.iter().any(|cell| !cell.is_empty())) {
        Some(header_row) => header_row.iter().map(|h| normalize_header(h)).collect(),
        None => return Vec::new(),
    };

    rows.filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| {
            let mut record = CsvRecord::default();
            for (i, key) in headers.iter().enumerate() {
                record.insert(key, row.get(i).map(String::as_str).unwrap_or(""));
            }
            record
        })
        .collect()
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode a fetched body to text.
///
/// Valid UTF-8 is used as is. Anything else is run through charset
/// detection, with windows-1252 as the last resort since that is what
/// spreadsheet tools emit when they are not emitting UTF-8.
/// A leading byte order mark is dropped either way.
pub fn decode_body(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let encoding = detect_encoding(bytes);
            let decoder = encoding_rs::Encoding::for_label(encoding.as_bytes())
                .unwrap_or(encoding_rs::WINDOWS_1252);
            decoder.decode(bytes).0.into_owned()
        }
    };

    match text.strip_prefix(BYTE_ORDER_MARK) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
