//! HTTP server for the Cascades website.
//!
//! Serves the typed feeds as JSON next to the static site files.
//!
//! # API Endpoints
//!
//! | Method | Path            | Description                              |
//! |--------|-----------------|------------------------------------------|
//! | GET    | `/health`       | Health check                             |
//! | GET    | `/api/shows`    | Upcoming shows, soonest first            |
//! | GET    | `/api/photos`   | Photo feed                               |
//! | GET    | `/api/members`  | Troupe members                           |
//! | GET    | `/api/logs`     | SSE stream of feed logs                  |
//! | GET    | everything else | Static files from the site root          |

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use serde_json::Value;
use std::{convert::Infallible, net::SocketAddr, path::Path, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::logs::{log_success, LOG_BROADCASTER};
use super::types::{error_response, shows_response, HealthResponse, MembersResponse};
use crate::error::{ServerError, ServerResult};
use crate::feed::Feed;
use crate::models::{PhotoFeed, ShowsDocument};

type SharedFeed = Arc<Feed>;

/// Build the application router.
pub fn router(feed: Feed, site_root: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/api/shows", get(shows))
        .route("/api/photos", get(photos))
        .route("/api/members", get(members))
        .route("/api/logs", get(sse_logs))
        .route("/api/{*rest}", get(unknown_api))
        .fallback_service(ServeDir::new(site_root))
        .layer(cors)
        .with_state(Arc::new(feed))
}

/// Start the HTTP server
pub async fn start_server(feed: Feed, port: u16, site_root: &Path) -> ServerResult<()> {
    if !site_root.is_dir() {
        return Err(ServerError::MissingSiteRoot(site_root.display().to_string()));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(feed, site_root);

    log_success(format!("Cascades site running on http://localhost:{}", port));
    log_success(format!("Serving files from {}", site_root.display()));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health(State(feed): State<SharedFeed>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "cascades".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        shows_sheet: feed.config().shows_csv.is_some(),
        photos_sheet: feed.config().photos_csv.is_some(),
    })
}

async fn shows(State(feed): State<SharedFeed>) -> Json<ShowsDocument> {
    Json(shows_response(feed.get_shows().await))
}

async fn photos(State(feed): State<SharedFeed>) -> Json<PhotoFeed> {
    Json(feed.get_photo_feed().await)
}

async fn members(State(feed): State<SharedFeed>) -> Json<MembersResponse> {
    Json(MembersResponse {
        members: feed.get_members().await,
    })
}

async fn unknown_api() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(error_response("Unknown API endpoint")))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
