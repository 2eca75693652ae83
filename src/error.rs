//! Error types shared by the Orpheus library and CLI.

use thiserror::Error;

pub const CODE_NOT_AUTHENTICATED: &str = "not_authenticated";
pub const CODE_PLAYLIST_NOT_OWNED: &str = "playlist_not_owned";
pub const CODE_NO_OVERLAP: &str = "no_overlap";
pub const CODE_INVALID_SELECTION: &str = "invalid_selection";
pub const CODE_MISSING_SELECTION: &str = "missing_selection";

/// Errors that can occur while talking to Spotify, the USB Pod service or
/// while validating user input.
#[derive(Error, Debug)]
pub enum OrpheusError {
    /// Transport failure (connection refused, TLS, body decoding)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Remote service answered with a non-2xx status
    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No usable token on disk
    #[error("Not authenticated. Run `orpheus auth` first: {0}")]
    NotAuthenticated(String),

    /// Destructive operation on a playlist the user does not own
    #[error("Playlist {0} is not owned by you")]
    PlaylistNotOwned(String),

    /// Filter Sweep found nothing to remove
    #[error("No overlapping tracks found in {0}")]
    NoOverlap(String),

    /// Playlist A is also listed as a reference
    #[error("Playlist A cannot also be in the reference list")]
    InvalidSelection,

    /// Playlist A or the references are missing
    #[error("Select Playlist A (owned) and at least one reference playlist")]
    MissingSelection,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl OrpheusError {
    /// Stable machine-readable code for domain errors.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            OrpheusError::NotAuthenticated(_) => Some(CODE_NOT_AUTHENTICATED),
            OrpheusError::PlaylistNotOwned(_) => Some(CODE_PLAYLIST_NOT_OWNED),
            OrpheusError::NoOverlap(_) => Some(CODE_NO_OVERLAP),
            OrpheusError::InvalidSelection => Some(CODE_INVALID_SELECTION),
            OrpheusError::MissingSelection => Some(CODE_MISSING_SELECTION),
            _ => None,
        }
    }

    /// Informational outcomes that should not be reported as failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, OrpheusError::NoOverlap(_))
    }
}

/// Result type for Orpheus operations.
pub type Result<T> = std::result::Result<T, OrpheusError>;
