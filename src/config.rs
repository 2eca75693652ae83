//! Configuration management for Orpheus.
//!
//! This module loads configuration values from environment variables and a
//! `.env` file in the local data directory. It provides one accessor per
//! setting: Spotify API endpoints and credentials, the local OAuth callback
//! server address, and the USB Pod conversion service.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::error::{OrpheusError, Result};

const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Scopes needed to read playlists, rewrite owned ones and read the
/// recently played history.
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-read-collaborative playlist-modify-private playlist-modify-public user-read-recently-played";

/// Returns the directory holding Orpheus' `.env`, token cache and state.
///
/// - Linux: `~/.local/share/orpheus`
/// - macOS: `~/Library/Application Support/orpheus`
/// - Windows: `%LOCALAPPDATA%/orpheus`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("orpheus");
    path
}

/// Loads environment variables from `.env` in the local data directory.
///
/// Creates the directory if it doesn't exist yet. Variables that are
/// already set in the process environment are not overridden.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the `.env` file
/// is missing or cannot be parsed.
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    dotenv::from_path(&path)
        .map_err(|e| OrpheusError::Config(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

fn required(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(OrpheusError::Config(format!("{} must be set", key))),
    }
}

fn with_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Address the local OAuth callback server binds to, e.g. `127.0.0.1:8888`.
///
/// Read from `SERVER_ADDRESS`.
pub fn server_addr() -> Result<String> {
    required("SERVER_ADDRESS")
}

/// Client id of the Spotify application (`SPOTIFY_API_AUTH_CLIENT_ID`).
///
/// Orpheus authenticates with PKCE, so no client secret is needed.
pub fn spotify_client_id() -> Result<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Redirect URI registered with the Spotify application
/// (`SPOTIFY_API_REDIRECT_URI`), e.g. `http://127.0.0.1:8888/callback`.
pub fn spotify_redirect_uri() -> Result<String> {
    required("SPOTIFY_API_REDIRECT_URI")
}

/// Space separated OAuth scopes (`SPOTIFY_API_AUTH_SCOPE`), defaulting to
/// [`DEFAULT_SCOPE`].
pub fn spotify_scope() -> String {
    with_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

/// Spotify authorization endpoint (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    with_default("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

/// Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    with_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

/// Spotify token endpoint used for code exchange and refresh
/// (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    with_default("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

/// Base URL of the USB Pod conversion service (`ORPHEUS_USBPOD_URL`), e.g.
/// `http://127.0.0.1:5000`. A trailing slash is stripped.
pub fn usbpod_url() -> Result<String> {
    required("ORPHEUS_USBPOD_URL").map(|url| url.trim_end_matches('/').to_string())
}
