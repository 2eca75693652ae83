use tabled::Table;

use crate::{
    error, info,
    spotify::playlists,
    types::{PlaylistTableRow, TrackTableRow},
    utils,
};

pub async fn list_playlists(owned: bool, search: Option<String>) {
    let mut client = super::connect().await;

    let pb = super::spinner("Fetching playlists...");
    let result = playlists::list_playlists(&mut client).await;
    pb.finish_and_clear();

    let mut all = match result {
        Ok(all) => all,
        Err(e) => error!("Failed to fetch playlists: {}", e),
    };

    if owned {
        all.retain(|p| p.owned_by_current_user);
    } else if let Ok(me) = playlists::current_user(&mut client).await {
        all.push(playlists::recently_played_summary(&me));
        utils::sort_playlists(&mut all);
    }

    utils::filter_playlists(&mut all, search.as_deref());

    if all.is_empty() {
        info!("No playlists found.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = all
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            owner: p.owner,
            tracks: p.total,
            id: p.id,
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub async fn view_tracks(playlist_id: String) {
    let mut client = super::connect().await;

    let pb = super::spinner("Fetching tracks...");
    let result = playlists::fetch_playlist(&mut client, &playlist_id).await;
    pb.finish_and_clear();

    let playlist = match result {
        Ok(playlist) => playlist,
        Err(e) => error!("Failed to load playlist: {}", e),
    };

    let rows: Vec<TrackTableRow> = playlist
        .tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            name: t.name.clone(),
            artists: t.artists.clone(),
            album: t.album.clone().unwrap_or_default(),
            length: utils::format_duration(t.duration_ms),
            added: utils::format_added_at(t.added_at.as_deref()),
        })
        .collect();

    println!(
        "Playlist: {name}\tOwner: {owner}\tTracks: {total}\n{table}\n",
        name = playlist.name,
        owner = playlist.owner,
        total = playlist.total,
        table = Table::new(rows)
    );
}
