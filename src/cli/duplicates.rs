use tabled::Table;

use crate::{
    error,
    error::OrpheusError,
    info,
    playlist::{detect_duplicates, removal_plan},
    spotify::playlists,
    success,
    types::DuplicateTableRow,
};

pub async fn duplicates(playlist_id: String, remove: bool) {
    let mut client = super::connect().await;

    match playlists::owns_playlist(&mut client, &playlist_id).await {
        Ok(true) => {}
        Ok(false) => error!("{}", OrpheusError::PlaylistNotOwned(playlist_id.clone())),
        Err(e) => error!("Ownership check failed: {}", e),
    }

    let pb = super::spinner("Checking for duplicates...");
    let playlist = playlists::get_playlist(&mut client, &playlist_id).await;
    let tracks = playlists::playlist_tracks(&mut client, &playlist_id).await;
    pb.finish_and_clear();

    let (playlist, tracks) = match (playlist, tracks) {
        (Ok(playlist), Ok(tracks)) => (playlist, tracks),
        (Err(e), _) | (_, Err(e)) => error!("Check failed: {}", e),
    };

    let groups = detect_duplicates(&tracks);
    if groups.is_empty() {
        success!("No duplicates in \"{}\". The playlist is clean.", playlist.name);
        return;
    }

    let duplicate_count: usize = groups.iter().map(|g| g.duplicates_to_remove).sum();
    let rows: Vec<DuplicateTableRow> = groups
        .into_iter()
        .map(|g| DuplicateTableRow {
            name: g.track_name,
            artists: g.artists,
            copies: g.total_occurrences,
            remove: g.duplicates_to_remove,
        })
        .collect();

    println!("{}", Table::new(rows));
    info!(
        "Found {} duplicate track(s) in \"{}\".",
        duplicate_count, playlist.name
    );

    if !remove {
        info!("Run again with --remove to keep the first copy of each track and remove the rest.");
        return;
    }

    let plan = removal_plan(&tracks);
    let pb = super::spinner("Removing duplicates...");
    let result =
        playlists::remove_occurrences(&mut client, &playlist_id, &plan, playlist.snapshot_id).await;
    pb.finish_and_clear();

    match result {
        Ok(removed) => success!(
            "Successfully removed {} duplicate track(s) from \"{}\".",
            removed,
            playlist.name
        ),
        Err(e) => error!("Remove failed: {}", e),
    }
}
