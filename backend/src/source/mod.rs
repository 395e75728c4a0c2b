//! Data sources and the fallback chain.
//!
//! A feed is read from an ordered list of [`Source`]s. Each source is tried
//! in turn and the first one that loads *and* decodes wins:
//!
//! ```text
//! ┌──────────────────┐  fail  ┌──────────────────┐  fail
//! │ Remote sheet CSV │───────▶│ Bundled JSON     │───────▶ None (caller uses empty feed)
//! └──────────────────┘        └──────────────────┘
//!          │ ok                         │ ok
//!          ▼                            ▼
//!       decoded                      decoded
//! ```
//!
//! Every failure is logged as a warning and never surfaces to the caller.

pub mod fetch;

use reqwest::Client;
use std::path::PathBuf;

use crate::api::logs::{log_info, log_warning};
use crate::error::SourceResult;

pub use fetch::{load, Payload, PayloadFormat};

/// One place a feed can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Operator-supplied spreadsheet export (or JSON) over HTTP.
    Remote { url: String },
    /// File shipped with the site.
    Bundled { path: PathBuf },
}

impl Source {
    pub fn remote(url: impl Into<String>) -> Self {
        Source::Remote { url: url.into() }
    }

    pub fn bundled(path: impl Into<PathBuf>) -> Self {
        Source::Bundled { path: path.into() }
    }

    /// Human-readable location, used in logs and errors.
    pub fn describe(&self) -> String {
        match self {
            Source::Remote { url } => url.clone(),
            Source::Bundled { path } => path.display().to_string(),
        }
    }
}

/// Ordered degradation chain of sources.
#[derive(Debug, Clone, Default)]
pub struct SourceChain {
    sources: Vec<Source>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a remote source if a non-blank URL is configured.
    pub fn with_remote(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            self.sources.push(Source::remote(url));
        }
        self
    }

    pub fn with_bundled(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::bundled(path));
        self
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Try each source in order and return the first decoded value.
    ///
    /// `decode` turns a loaded payload into the feed's value; a decode error
    /// moves on to the next source just like a load error does.
    pub async fn first_success<T, F>(&self, client: &Client, feed: &str, decode: F) -> Option<T>
    where
        F: Fn(Payload) -> SourceResult<T>,
    {
        for (i, source) in self.sources.iter().enumerate() {
            let attempt = match load(client, source).await {
                Ok(payload) => decode(payload),
                Err(e) => Err(e),
            };

            match attempt {
                Ok(value) => {
                    if i > 0 {
                        log_info(format!("{}: using fallback {}", feed, source.describe()));
                    }
                    return Some(value);
                }
                Err(e) => {
                    let next = if i + 1 < self.sources.len() {
                        "trying next source"
                    } else {
                        "no sources left"
                    };
                    log_warning(format!("{}: {} ({})", feed, e, next));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_chain_skips_blank_remote() {
        let chain = SourceChain::new()
            .with_remote(Some("   "))
            .with_remote(None)
            .with_bundled("data/shows/index.json");

        assert_eq!(chain.sources(), &[Source::bundled("data/shows/index.json")]);
    }

    #[test]
    fn test_chain_order() {
        let chain = SourceChain::new()
            .with_remote(Some("https://sheets.example.com/shows.csv"))
            .with_bundled("data/shows/index.json");

        assert_eq!(
            chain.sources()[0],
            Source::remote("https://sheets.example.com/shows.csv")
        );
        assert!(matches!(chain.sources()[1], Source::Bundled { .. }));
    }

    #[tokio::test]
    async fn test_first_success_falls_through() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.json");
        fs::write(&good, r#"{"upcoming": []}"#).unwrap();

        let chain = SourceChain::new()
            .with_bundled(dir.path().join("missing.json"))
            .with_bundled(&good);

        let result = chain
            .first_success(&Client::new(), "test", |payload| Ok(payload.origin))
            .await;

        assert_eq!(result, Some(good.display().to_string()));
    }

    #[tokio::test]
    async fn test_decode_failure_moves_on() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        fs::write(&first, "{}").unwrap();
        fs::write(&second, "{}").unwrap();

        let chain = SourceChain::new().with_bundled(&first).with_bundled(&second);

        let result = chain
            .first_success(&Client::new(), "test", |payload| {
                if payload.origin.ends_with("first.json") {
                    Err(SourceError::parse(payload.origin, "rejected"))
                } else {
                    Ok(2)
                }
            })
            .await;

        assert_eq!(result, Some(2));
    }

    #[tokio::test]
    async fn test_all_sources_fail() {
        let dir = tempdir().unwrap();
        let chain = SourceChain::new().with_bundled(dir.path().join("nope.json"));

        let result: Option<()> = chain
            .first_success(&Client::new(), "test", |_| Ok(()))
            .await;

        assert!(result.is_none());
    }
}
