//! # Cascades - show and photo feeds for the troupe website
//!
//! Reads the troupe's shows and photos from published spreadsheet exports,
//! falling back to JSON files bundled with the site, and hands the website
//! typed, cleaned, ordered lists.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Sheet CSV / │────▶│   Parser    │────▶│  Resolve +  │────▶│ Shows/Photo │
//! │ bundled JSON│     │ (tokenizer) │     │  Normalize  │     │  (sorted)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!        ▲ fallback chain (source)                                    │
//!        └──────────────────────── Feed ◀────────── HTTP API ◀────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cascades::{Feed, FeedConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = FeedConfig::load_or_default("data".as_ref());
//!     let feed = Feed::new(config, "data");
//!     println!("{} upcoming shows", feed.get_shows().await.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Show, Photo, PhotoFeed, Member
//! - [`parser`] - CSV tokenizer and header normalization
//! - [`transform`] - Alias resolution, URL normalization, mapping and ordering
//! - [`source`] - Remote/bundled sources and the fallback chain
//! - [`config`] - Feed configuration
//! - [`feed`] - Orchestrator used by the website
//! - [`api`] - HTTP API server and logs

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Sources
pub mod source;

// Configuration
pub mod config;

// Orchestration
pub mod feed;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, ServerError, SourceError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Member, Photo, PhotoFeed, Show, ShowsDocument};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{decode_body, normalize_header, parse_records, tokenize, CsvRecord};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    map_photos, map_shows, normalize_src, parse_show_date, resolve, upcoming_shows, MapResult,
    SkippedRow,
};

// =============================================================================
// Re-exports - Sources, configuration, feed
// =============================================================================

pub use config::FeedConfig;
pub use feed::Feed;
pub use source::{Source, SourceChain};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
