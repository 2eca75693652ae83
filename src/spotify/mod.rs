//! # Spotify Integration Module
//!
//! This module is the integration layer between Orpheus and the Spotify Web
//! API. It handles authentication, paginated reads and the playlist
//! mutations that duplicate removal and Filter Sweep need.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! Playlist logic (identity, duplicates, sweep)   ← pure, no I/O
//!     ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     ├── Client (token refresh, 429/502 handling)
//!     └── Playlists (list, fetch, ownership, removal)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - PKCE flow: verifier/challenge, local callback server,
//!   browser launch, code exchange and token refresh.
//! - [`client`] - [`SpotifyClient`](client::SpotifyClient), the
//!   authenticated request helper. Tokens are refreshed four minutes before
//!   expiry; `Retry-After` on 429 is honoured up to two minutes; 502 is
//!   retried after ten seconds.
//! - [`playlists`] - playlist listing with ownership flags, full track
//!   fetches following `next` links, the recently played pseudo-playlist,
//!   and removal of specific positions or of all occurrences in batches of
//!   100.
//!
//! ## API Coverage
//!
//! - `GET /me`
//! - `GET /me/playlists`
//! - `GET /me/player/recently-played`
//! - `GET /playlists/{id}`
//! - `GET /playlists/{id}/tracks`
//! - `DELETE /playlists/{id}/tracks`
//! - `POST /api/token` (accounts service)
//!
//! ## Error Types
//!
//! All functions return [`crate::error::Result`]. Transport failures map to
//! `OrpheusError::Request`, non-2xx answers to `OrpheusError::Api` carrying
//! Spotify's error message.

pub mod auth;
pub mod client;
pub mod playlists;

pub use client::SpotifyClient;
