use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::DateTime;
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::PlaylistSummary;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Formats a track length as `m:ss`, or an empty string when unknown.
pub fn format_duration(duration_ms: Option<u64>) -> String {
    match duration_ms {
        Some(ms) => {
            let seconds = ms / 1000;
            format!("{}:{:02}", seconds / 60, seconds % 60)
        }
        None => String::new(),
    }
}

/// Shortens an RFC 3339 timestamp to its `YYYY-MM-DD` date. Unparseable
/// values are returned unchanged.
pub fn format_added_at(added_at: Option<&str>) -> String {
    match added_at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => String::new(),
    }
}

/// Keeps playlists whose name contains `query`, ignoring case. A blank
/// query keeps everything.
pub fn filter_playlists(playlists: &mut Vec<PlaylistSummary>, query: Option<&str>) {
    let query = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    if query.is_empty() {
        return;
    }
    playlists.retain(|p| p.name.to_lowercase().contains(&query));
}

/// Sorts playlists A–Z by name, ignoring case.
pub fn sort_playlists(playlists: &mut [PlaylistSummary]) {
    playlists.sort_by_key(|p| p.name.to_lowercase());
}

/// Splits `items` into batches of at most `size`, as required by endpoints
/// that cap the number of entries per request.
pub fn batches<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(|c| c.to_vec()).collect()
}
