use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Reserved playlist id for the user's recently played tracks.
pub const RECENT_ID: &str = "__recent__";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

// ---------------------------------------------------------------------------
// Domain model
// ---------------------------------------------------------------------------

/// A playlist entry flattened into display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    /// Artist names joined with ", "
    pub artists: String,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
    /// RFC 3339 timestamp; `played_at` for recently played tracks
    pub added_at: Option<String>,
    pub uri: String,
    /// Slot in the playlist as Spotify counts it, unavailable items
    /// included. `None` for tracks that do not come from a playlist.
    #[serde(default)]
    pub position: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub total: u64,
    pub tracks: Vec<Track>,
}

/// Playlist as listed by `/me/playlists`, without its tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub owner_id: String,
    pub total: u64,
    pub owned_by_current_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub identity_key: String,
    pub track_name: String,
    pub artists: String,
    pub total_occurrences: usize,
    pub duplicates_to_remove: usize,
}

/// Positions of one URI that should be deleted from a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalEntry {
    pub uri: String,
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalPlan {
    pub entries: Vec<RemovalEntry>,
    pub removed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedTrack {
    pub name: String,
    pub artists: String,
    pub occurrences: usize,
    /// Every distinct URI the matched copies use. Local files sharing a
    /// name can still differ in album or duration.
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResult {
    pub removed_count: usize,
    pub removed_tracks: Vec<RemovedTrack>,
}

// ---------------------------------------------------------------------------
// USB Pod download stream
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    Standard,
    Extended,
}

/// Per-track payload shared by `done`, `skip` and `error` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackOutcome {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub mode: Option<DownloadMode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DownloadEvent {
    Total { total: u64 },
    Done(TrackOutcome),
    Skip(TrackOutcome),
    Error(TrackOutcome),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Done,
    Skip,
    Error,
}

/// One line of the per-track audit log kept by a download session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub kind: OutcomeKind,
    pub track: TrackOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub playlist_id: String,
    pub output_folder: String,
    pub dj_mode: bool,
}

// ---------------------------------------------------------------------------
// Spotify Web API payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub display_name: Option<String>,
}

impl PlaylistOwner {
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.id.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub tracks: PlaylistTracksRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullPlaylist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub tracks: PlaylistTracksRef,
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub album: Option<SpotifyAlbum>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub added_at: Option<String>,
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistoryItem {
    pub played_at: Option<String>,
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentlyPlayedResponse {
    #[serde(default)]
    pub items: Vec<PlayHistoryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTrackItem {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<RemoveTrackItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub owner: String,
    pub tracks: u64,
    pub id: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub artists: String,
    pub album: String,
    pub length: String,
    pub added: String,
}

#[derive(Tabled)]
pub struct DuplicateTableRow {
    pub name: String,
    pub artists: String,
    pub copies: usize,
    pub remove: usize,
}

#[derive(Tabled)]
pub struct RemovedTrackTableRow {
    pub name: String,
    pub artists: String,
    pub occurrences: usize,
}

#[derive(Tabled)]
pub struct DownloadResultTableRow {
    pub status: String,
    pub name: String,
    pub artist: String,
    pub note: String,
}
