//! # CLI Module
//!
//! User-facing commands of Orpheus. Each command loads what it needs,
//! delegates the actual work to the library layers and renders the outcome
//! as tables, progress bars and coloured status lines.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth (PKCE) login
//! - [`list_playlists`] - playlists in the library, optionally owned only
//! - [`view_tracks`] - every track of one playlist
//! - [`duplicates`] - check a playlist for duplicates and optionally remove
//!   all but the first copy of each
//! - [`sweep`] - Filter Sweep: remove from playlist A everything found in
//!   any reference playlist
//! - [`download`] - export a playlist through USB Pod and follow its
//!   progress
//!
//! ## Layering
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Playlist logic / Download session (pure state)
//!     ↓
//! Spotify + USB Pod clients
//!     ↓
//! Network Layer (HTTP Requests)
//! ```
//!
//! ## Error Presentation
//!
//! Library calls return typed errors; this layer decides what is fatal.
//! Domain outcomes such as "no overlapping tracks" or "playlist is clean"
//! are reported as information, not failures. Fatal problems go through
//! `error!`, which prints and exits with status 1.
//!
//! ## Usage Patterns
//!
//! ```bash
//! orpheus auth
//! orpheus playlists --owned
//! orpheus duplicates 37i9dQZF1DXcBWIGoYBM5M --remove
//! orpheus sweep --from <A> --reference <B1> --reference __recent__
//! orpheus download <id> --output ~/Music/usb --dj-mode
//! ```

mod auth;
mod download;
mod duplicates;
mod playlists;
mod sweep;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{error, spotify::SpotifyClient};

pub use auth::auth;
pub use download::download;
pub use duplicates::duplicates;
pub use playlists::list_playlists;
pub use playlists::view_tracks;
pub use sweep::sweep;

async fn connect() -> SpotifyClient {
    match SpotifyClient::connect().await {
        Ok(client) => client,
        Err(e) => error!("Failed to load token. Please run orpheus auth\n Error: {}", e),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
