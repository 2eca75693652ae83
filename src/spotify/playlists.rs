use reqwest::Method;

use crate::{
    error::Result,
    spotify::client::SpotifyClient,
    types::{
        CurrentUser, FullPlaylist, Paging, PlayHistoryItem, Playlist, PlaylistItem,
        PlaylistSummary, RECENT_ID, RecentlyPlayedResponse, RemovalPlan, RemoveTrackItem,
        RemoveTracksRequest, SimplifiedPlaylist, SnapshotResponse, SpotifyTrack, Track,
    },
    utils,
};

const PLAYLIST_PAGE_LIMIT: u32 = 50;
const TRACK_PAGE_LIMIT: u32 = 100;
const RECENT_LIMIT: u32 = 50;
/// Spotify accepts at most 100 entries per removal request.
const REMOVE_BATCH: usize = 100;

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Converts an API track into the flattened display form.
pub fn to_track(track: SpotifyTrack, added_at: Option<String>) -> Track {
    Track {
        id: track.id,
        name: track.name,
        artists: track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        album: track.album.and_then(|a| a.name),
        duration_ms: track.duration_ms,
        added_at,
        uri: track.uri.unwrap_or_default(),
        position: None,
    }
}

/// Flattens one page of playlist items.
///
/// `offset` is the playlist position of the first item on the page. Empty
/// slots (removed or unavailable items) yield no track but still take up a
/// position, so every returned track carries the index Spotify expects
/// when deleting by position.
pub fn tracks_from_items(items: Vec<PlaylistItem>, offset: usize) -> Vec<Track> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            item.track.map(|t| Track {
                position: Some(offset + index),
                ..to_track(t, item.added_at)
            })
        })
        .collect()
}

/// Fetches the profile of the signed-in user.
///
/// # Arguments
///
/// * `client` - Authenticated Spotify client
///
/// # Returns
///
/// The user's id and display name, used for ownership checks.
pub async fn current_user(client: &mut SpotifyClient) -> Result<CurrentUser> {
    client.get_json::<CurrentUser>("me").await
}

/// Fetches every playlist in the user's library, sorted A–Z.
pub async fn list_playlists(client: &mut SpotifyClient) -> Result<Vec<PlaylistSummary>> {
    let me = current_user(client).await?;
    let me_id = normalize(&me.id);

    let mut playlists: Vec<PlaylistSummary> = Vec::new();
    let mut next = Some(format!("me/playlists?limit={}", PLAYLIST_PAGE_LIMIT));

    while let Some(url) = next {
        let page = client.get_json::<Paging<SimplifiedPlaylist>>(&url).await?;
        playlists.extend(page.items.into_iter().map(|p| PlaylistSummary {
            owned_by_current_user: normalize(&p.owner.id) == me_id,
            owner: p.owner.label(),
            owner_id: p.owner.id,
            total: p.tracks.total,
            id: p.id,
            name: p.name,
        }));
        next = page.next;
    }

    utils::sort_playlists(&mut playlists);
    Ok(playlists)
}

/// The synthetic "Recently Played" entry offered next to real playlists.
pub fn recently_played_summary(me: &CurrentUser) -> PlaylistSummary {
    PlaylistSummary {
        id: RECENT_ID.to_string(),
        name: "Recently Played".to_string(),
        owner: me
            .display_name
            .clone()
            .unwrap_or_else(|| "You".to_string()),
        owner_id: me.id.clone(),
        total: RECENT_LIMIT as u64,
        owned_by_current_user: false,
    }
}

/// Fetches playlist metadata (name, owner, snapshot id, track count)
/// without its items.
///
/// # Arguments
///
/// * `client` - Authenticated Spotify client
/// * `playlist_id` - Spotify playlist id
pub async fn get_playlist(client: &mut SpotifyClient, playlist_id: &str) -> Result<FullPlaylist> {
    client
        .get_json::<FullPlaylist>(&format!("playlists/{}", playlist_id))
        .await
}

/// Fetches all tracks of a playlist, following pagination.
///
/// Empty slots (removed or unavailable items) are skipped, but the
/// returned tracks keep their real playlist position.
pub async fn playlist_tracks(client: &mut SpotifyClient, playlist_id: &str) -> Result<Vec<Track>> {
    let mut tracks = Vec::new();
    let mut offset = 0;
    let mut next = Some(format!(
        "playlists/{}/tracks?limit={}",
        playlist_id, TRACK_PAGE_LIMIT
    ));

    while let Some(url) = next {
        let page = client.get_json::<Paging<PlaylistItem>>(&url).await?;
        let count = page.items.len();
        tracks.extend(tracks_from_items(page.items, offset));
        offset += count;
        next = page.next;
    }

    Ok(tracks)
}

/// The user's last 50 plays, newest first.
pub async fn recently_played(client: &mut SpotifyClient) -> Result<Vec<Track>> {
    let response = client
        .get_json::<RecentlyPlayedResponse>(&format!(
            "me/player/recently-played?limit={}",
            RECENT_LIMIT
        ))
        .await?;

    Ok(response
        .items
        .into_iter()
        .filter_map(|PlayHistoryItem { played_at, track }| track.map(|t| to_track(t, played_at)))
        .collect())
}

/// Loads a playlist with all of its tracks. [`RECENT_ID`] yields the
/// recently played pseudo-playlist.
pub async fn fetch_playlist(client: &mut SpotifyClient, playlist_id: &str) -> Result<Playlist> {
    if playlist_id == RECENT_ID {
        let me = current_user(client).await?;
        let tracks = recently_played(client).await?;
        return Ok(Playlist {
            id: RECENT_ID.to_string(),
            name: "Recently Played".to_string(),
            owner: me.display_name.unwrap_or(me.id),
            total: tracks.len() as u64,
            tracks,
        });
    }

    let playlist = get_playlist(client, playlist_id).await?;
    let tracks = playlist_tracks(client, playlist_id).await?;
    Ok(Playlist {
        id: playlist.id,
        name: playlist.name,
        owner: playlist.owner.label(),
        total: playlist.tracks.total,
        tracks,
    })
}

/// Tracks of a Filter Sweep reference.
pub async fn reference_tracks(client: &mut SpotifyClient, playlist_id: &str) -> Result<Vec<Track>> {
    if playlist_id == RECENT_ID {
        return recently_played(client).await;
    }
    playlist_tracks(client, playlist_id).await
}

/// Checks whether the signed-in user owns `playlist_id`.
///
/// Owner ids are compared case-insensitively. The recently played
/// pseudo-playlist is never owned, so it can be read but not modified.
///
/// # Arguments
///
/// * `client` - Authenticated Spotify client
/// * `playlist_id` - Spotify playlist id or [`RECENT_ID`]
pub async fn owns_playlist(client: &mut SpotifyClient, playlist_id: &str) -> Result<bool> {
    if playlist_id == RECENT_ID {
        return Ok(false);
    }
    let playlist = get_playlist(client, playlist_id).await?;
    let me = current_user(client).await?;
    Ok(normalize(&playlist.owner.id) == normalize(&me.id))
}

/// Deletes the exact positions listed in `plan`.
///
/// Positions refer to the playlist as of `snapshot_id`, so every batch is
/// sent against that same snapshot.
pub async fn remove_occurrences(
    client: &mut SpotifyClient,
    playlist_id: &str,
    plan: &RemovalPlan,
    snapshot_id: Option<String>,
) -> Result<usize> {
    let mut removed = 0;

    for batch in utils::batches(&plan.entries, REMOVE_BATCH) {
        let request = RemoveTracksRequest {
            tracks: batch
                .iter()
                .map(|entry| RemoveTrackItem {
                    uri: entry.uri.clone(),
                    positions: Some(entry.positions.clone()),
                })
                .collect(),
            snapshot_id: snapshot_id.clone(),
        };

        client
            .send_json::<_, SnapshotResponse>(
                Method::DELETE,
                &format!("playlists/{}/tracks", playlist_id),
                &request,
            )
            .await?;
        removed += batch.iter().map(|e| e.positions.len()).sum::<usize>();
    }

    Ok(removed)
}

/// Deletes every occurrence of each URI, without a snapshot.
///
/// Returns the number of URIs sent.
pub async fn remove_all_occurrences(
    client: &mut SpotifyClient,
    playlist_id: &str,
    uris: &[String],
) -> Result<usize> {
    let mut removed = 0;

    for batch in utils::batches(uris, REMOVE_BATCH) {
        let request = RemoveTracksRequest {
            tracks: batch
                .iter()
                .map(|uri| RemoveTrackItem {
                    uri: uri.clone(),
                    positions: None,
                })
                .collect(),
            snapshot_id: None,
        };

        client
            .send_json::<_, SnapshotResponse>(
                Method::DELETE,
                &format!("playlists/{}/tracks", playlist_id),
                &request,
            )
            .await?;
        removed += batch.len();
    }

    Ok(removed)
}
