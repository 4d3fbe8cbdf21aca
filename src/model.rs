//! Data models for the URL shortener
//!
//! Request/response bodies and the persisted record layout.

use serde::{Deserialize, Serialize};

/// A persisted short ID to long URL mapping
///
/// Stored as JSON under its `short_id` key in the `url_shortener` table.
///
/// Example value:
/// `{"short_id":"3f9a1c","long_url":"https://example.com/page"}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    /// 6-character identifier, primary key
    pub short_id: String,

    /// The original URL, stored verbatim
    pub long_url: String,
}

/// Request payload for shortening a URL
///
/// # Example
/// ```json
/// { "long_url": "https://example.com/very/long/url" }
/// ```
#[derive(Deserialize, Debug)]
pub struct ShortenRequest {
    /// Optional at the serde level so a missing field can be reported by name
    pub long_url: Option<String>,
}

/// Response returned after successfully shortening a URL
///
/// # Example
/// ```json
/// { "short_url": "https://short.ly/3f9a1c" }
/// ```
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ShortenResponse {
    pub short_url: String,
}
