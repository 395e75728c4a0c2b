//! Loading raw payloads from remote URLs and bundled files.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::Path;

use super::Source;
use crate::error::{SourceError, SourceResult};
use crate::parser::decode_body;

/// How a payload should be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Csv,
    Json,
}

/// Raw text of a source, with where it came from.
#[derive(Debug, Clone)]
pub struct Payload {
    pub origin: String,
    pub body: String,
    pub format: PayloadFormat,
}

/// Load a source's text. Blank bodies count as failures.
pub async fn load(client: &Client, source: &Source) -> SourceResult<Payload> {
    let payload = match source {
        Source::Remote { url } => fetch_remote(client, url).await?,
        Source::Bundled { path } => read_bundled(path).await?,
    };

    if payload.body.trim().is_empty() {
        return Err(SourceError::Empty(payload.origin));
    }

    Ok(payload)
}

async fn fetch_remote(client: &Client, url: &str) -> SourceResult<Payload> {
    let http_err = |e: reqwest::Error| SourceError::Http {
        url: url.to_string(),
        message: e.to_string(),
    };

    let response = client
        .get(url)
        .header("Cache-Control", "no-store")
        .send()
        .await
        .map_err(http_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Fetch {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let declared_json = content_type.contains("json");

    let bytes = response.bytes().await.map_err(http_err)?;
    let body = decode_body(&bytes);

    // Unpublished sheets redirect to a sign-in page.
    if content_type.contains("html") || body.trim_start().starts_with('<') {
        return Err(SourceError::parse(url, "expected CSV or JSON, got an HTML page"));
    }

    let format = if declared_json || body.trim_start().starts_with('{') {
        PayloadFormat::Json
    } else {
        PayloadFormat::Csv
    };

    Ok(Payload {
        origin: url.to_string(),
        body,
        format,
    })
}

async fn read_bundled(path: &Path) -> SourceResult<Payload> {
    let bytes = tokio::fs::read(path).await.map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let format = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
        PayloadFormat::Csv
    } else {
        PayloadFormat::Json
    };

    Ok(Payload {
        origin: path.display().to_string(),
        body: decode_body(&bytes),
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_bundled_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, r#"{"upcoming": []}"#).unwrap();

        let payload = load(&Client::new(), &Source::bundled(&path)).await.unwrap();

        assert_eq!(payload.format, PayloadFormat::Json);
        assert!(payload.body.contains("upcoming"));
    }

    #[tokio::test]
    async fn test_bundled_csv_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shows.CSV");
        fs::write(&path, "title,date\nA,2099-01-01\n").unwrap();

        let payload = load(&Client::new(), &Source::bundled(&path)).await.unwrap();
        assert_eq!(payload.format, PayloadFormat::Csv);
    }

    #[tokio::test]
    async fn test_bundled_missing() {
        let dir = tempdir().unwrap();
        let err = load(&Client::new(), &Source::bundled(dir.path().join("gone.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn test_blank_body_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.json");
        fs::write(&path, "  \n").unwrap();

        let err = load(&Client::new(), &Source::bundled(&path)).await.unwrap_err();
        assert!(matches!(err, SourceError::Empty(_)));
    }
}
