use tabled::Table;

use crate::{
    error,
    error::OrpheusError,
    info,
    playlist::{self, validate_selection},
    spotify::playlists,
    success,
    types::{RemovedTrackTableRow, Track},
    warning,
};

pub async fn sweep(playlist_a: String, references: Vec<String>) {
    // reject bad selections before touching the network
    if let Err(e) = validate_selection(&playlist_a, &references) {
        error!("{}", e);
    }

    let mut client = super::connect().await;

    match playlists::owns_playlist(&mut client, &playlist_a).await {
        Ok(true) => {}
        Ok(false) => error!("{}", OrpheusError::PlaylistNotOwned(playlist_a.clone())),
        Err(e) => error!("Ownership check failed: {}", e),
    }

    let pb = super::spinner("Gathering tracks...");
    let source = match playlists::fetch_playlist(&mut client, &playlist_a).await {
        Ok(source) => source,
        Err(e) => {
            pb.finish_and_clear();
            error!("Filter Sweep failed: {}", e);
        }
    };

    let mut reference_lists: Vec<Vec<Track>> = Vec::with_capacity(references.len());
    for reference in &references {
        match playlists::reference_tracks(&mut client, reference).await {
            Ok(tracks) => reference_lists.push(tracks),
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to load reference {}: {}", reference, e);
            }
        }
    }
    pb.finish_and_clear();

    if source.tracks.is_empty() {
        info!("\"{}\" has no tracks.", source.name);
        return;
    }

    let result = playlist::sweep(&source.tracks, &reference_lists);
    if result.removed_count == 0 {
        info!("{}", OrpheusError::NoOverlap(source.name));
        return;
    }

    let uris: Vec<String> = result
        .removed_tracks
        .iter()
        .flat_map(|t| t.uris.iter().cloned())
        .collect();
    if result.removed_tracks.iter().any(|t| t.uris.is_empty()) {
        warning!("Some matching tracks have no URI and stay in the playlist.");
    }

    let pb = super::spinner("Removing tracks...");
    let removed = playlists::remove_all_occurrences(&mut client, &playlist_a, &uris).await;
    pb.finish_and_clear();

    if let Err(e) = removed {
        error!("Filter Sweep failed: {}", e);
    }

    let rows: Vec<RemovedTrackTableRow> = result
        .removed_tracks
        .into_iter()
        .map(|t| RemovedTrackTableRow {
            name: t.name,
            artists: t.artists,
            occurrences: t.occurrences,
        })
        .collect();

    println!("{}", Table::new(rows));
    success!(
        "Filter Sweep complete, removed {} track(s) from \"{}\".",
        result.removed_count,
        source.name
    );
}
