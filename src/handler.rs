//! Request handlers for the URL shortener
//!
//! [`ShortenHandler`] and [`RedirectHandler`] hold the request/response
//! contract and are independent of axum; the `*_url` functions at the bottom
//! adapt them to HTTP routes.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::HandlerError;
use crate::model::{ShortenRequest, ShortenResponse};
use crate::route::AppState;
use crate::store::Store;

/// Length of a generated short ID
pub const SHORT_ID_LEN: usize = 6;

/// Draws a fresh short ID: the first 6 hex digits of a random v4 UUID
///
/// The ID space is only 16^6, so collisions are possible. No check is made
/// against the store.
pub fn generate_short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}

/// Prefix-only URL check. Control characters are refused since they cannot
/// be sent back in a `Location` header; anything else is accepted as-is.
pub fn is_valid_url(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://"))
        && !url.chars().any(char::is_control)
}

/// Creates short links
///
/// Steps, in order:
/// 1. Require a non-blank body that parses as `{"long_url": ...}`
/// 2. Require the `long_url` field
/// 3. Require an `http://` or `https://` prefix
/// 4. Draw a short ID and write the mapping
/// 5. Return `base_url + short_id`
pub struct ShortenHandler {
    store: Arc<dyn Store>,
    base_url: String,
}

impl ShortenHandler {
    /// `base_url` is used verbatim as the prefix of every short link, so it
    /// should already end with `/`
    pub fn new(store: Arc<dyn Store>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into(),
        }
    }

    pub async fn handle(&self, body: Option<&str>) -> Result<ShortenResponse, HandlerError> {
        debug!(?body, "Received shorten request");

        let body = body
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| HandlerError::bad_request("Missing body"))?;

        let request: ShortenRequest = serde_json::from_str(body)
            .map_err(|e| HandlerError::bad_request(format!("JSON Parsing Error: {e}")))?;

        let long_url = request
            .long_url
            .ok_or_else(|| HandlerError::bad_request("Missing 'long_url' field"))?;

        if !is_valid_url(&long_url) {
            debug!(%long_url, "Rejected invalid URL");
            return Err(HandlerError::bad_request("Invalid URL format"));
        }

        let short_id = generate_short_id();

        self.store.put(&short_id, &long_url).await.map_err(|e| {
            error!(%short_id, error = %e, "Failed to save mapping");
            HandlerError::internal(format!("Error saving to database: {e}"))
        })?;

        info!(%short_id, %long_url, "Created short link");

        Ok(ShortenResponse {
            short_url: format!("{}{}", self.base_url, short_id),
        })
    }
}

/// Resolves short IDs back to their long URL
pub struct RedirectHandler {
    store: Arc<dyn Store>,
}

impl RedirectHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Returns the stored long URL for `short_id`
    pub async fn handle(&self, short_id: Option<&str>) -> Result<String, HandlerError> {
        let short_id = short_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| HandlerError::bad_request("Missing short_id"))?;

        debug!(%short_id, "Looking up short link");

        match self.store.get(short_id).await {
            Ok(Some(long_url)) => Ok(long_url),
            Ok(None) => {
                debug!(%short_id, "Short link not found");
                Err(HandlerError::not_found("URL not found"))
            }
            Err(e) => {
                error!(%short_id, error = %e, "Failed to read mapping");
                Err(HandlerError::internal(format!(
                    "Error reading from database: {e}"
                )))
            }
        }
    }
}

/// 302 Found with the given `Location` and an empty body
fn found(location: &str) -> Result<Response, HandlerError> {
    // from_bytes also accepts obs-text (0x80-0xFF), i.e. raw UTF-8 URLs
    let location = HeaderValue::from_bytes(location.as_bytes())
        .map_err(|_| HandlerError::internal("Stored URL is not a valid Location header"))?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// `POST /shorten`
///
/// The raw body is taken so that an empty body and malformed JSON can be told
/// apart and reported with their own messages.
///
/// # Response
///
/// - **200 OK** - `{"short_url": "..."}`
/// - **400 Bad Request** - missing body or field, bad JSON, non-http(s) URL,
///   unreadable or oversized body
/// - **500 Internal Server Error** - the store write failed
pub async fn create_short_url(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ShortenResponse>, HandlerError> {
    let body = body.map_err(|rejection| {
        debug!(status = %rejection.status(), "Rejected shorten body");
        HandlerError::bad_request(format!("JSON Parsing Error: {}", rejection.body_text()))
    })?;

    let text = std::str::from_utf8(&body)
        .map_err(|e| HandlerError::bad_request(format!("JSON Parsing Error: {e}")))?;

    state.shorten.handle(Some(text)).await.map(Json)
}

/// `GET /{short_id}`
///
/// # Response
///
/// - **302 Found** - `Location` set to the original URL
/// - **400 Bad Request** - the short ID is not valid percent-encoded UTF-8
/// - **404 Not Found** - unknown short ID
/// - **500 Internal Server Error** - the store read failed
pub async fn redirect_url(
    short_id: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Response, HandlerError> {
    let Path(short_id) = short_id.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected short_id path");
        HandlerError::bad_request(format!("Invalid short_id: {}", rejection.body_text()))
    })?;
    let long_url = state.redirect.handle(Some(short_id.as_str())).await?;
    found(&long_url)
}

/// `GET /` - a redirect request with no short ID
pub async fn redirect_missing_id(State(state): State<AppState>) -> Result<Response, HandlerError> {
    let long_url = state.redirect.handle(None).await?;
    found(&long_url)
}

/// Any path no route matches
pub async fn route_not_found() -> HandlerError {
    HandlerError::not_found("Not found")
}
