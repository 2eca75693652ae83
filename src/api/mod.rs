//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that runs while
//! `orpheus auth` waits for Spotify to redirect back.
//!
//! - [`callback`] - receives the authorization code and exchanges it, with
//!   the stored PKCE verifier, for an access token.
//! - [`health`] - reports status and version; handy to check that the
//!   redirect URI points at the right address.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use orpheus::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
