use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    download::{DownloadManager, DownloadSession, SessionStatus},
    error,
    error::OrpheusError,
    info,
    spotify::{SpotifyClient, playlists},
    success,
    types::{DownloadEvent, DownloadMode, DownloadRequest, DownloadResultTableRow, OutcomeKind},
    usbpod::UsbPodClient,
    warning,
};

pub async fn download(playlist_id: String, output_folder: String, dj_mode: bool) {
    let output_folder = output_folder.trim().to_string();
    if output_folder.is_empty() {
        error!("Choose an output folder with --output.");
    }

    let usbpod = match UsbPodClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let playlist_name = resolve_name(&playlist_id).await;

    let mut manager = DownloadManager::new();
    let Some(cancel) = manager.begin(&playlist_name) else {
        warning!("A download is already running.");
        return;
    };

    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    info!(
        "Exporting \"{}\" to {}{}",
        playlist_name,
        output_folder,
        if dj_mode { " (DJ mode)" } else { "" }
    );

    let request = DownloadRequest {
        playlist_id,
        output_folder,
        dj_mode,
    };

    match usbpod.start_download(&request).await {
        Ok(response) => {
            let pb = progress_bar();
            manager
                .consume(response, |session, event| match event {
                    DownloadEvent::Total { total } => pb.set_length(*total),
                    DownloadEvent::Done(track)
                    | DownloadEvent::Skip(track)
                    | DownloadEvent::Error(track) => {
                        pb.set_position(session.processed() as u64);
                        pb.set_message(format!("{} - {}", track.artist, track.name));
                    }
                    DownloadEvent::Complete => {}
                })
                .await;
            pb.finish_and_clear();
        }
        Err(OrpheusError::Api { message, .. }) => manager.fail(message),
        Err(e) => manager.fail(e.to_string()),
    }

    ctrl_c.abort();

    if let Some(session) = manager.session() {
        report(session);
    }
}

/// Looks up the playlist's display name; falls back to the id when Spotify
/// is not reachable or the user is not logged in.
async fn resolve_name(playlist_id: &str) -> String {
    let Ok(mut client) = SpotifyClient::connect().await else {
        return playlist_id.to_string();
    };

    playlists::get_playlist(&mut client, playlist_id)
        .await
        .map(|p| p.name)
        .unwrap_or_else(|_| playlist_id.to_string())
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.green/white} {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

fn report(session: &DownloadSession) {
    if !session.results().is_empty() {
        let rows: Vec<DownloadResultTableRow> = session
            .results()
            .iter()
            .map(|r| DownloadResultTableRow {
                status: match r.kind {
                    OutcomeKind::Done => "done",
                    OutcomeKind::Skip => "skip",
                    OutcomeKind::Error => "error",
                }
                .to_string(),
                name: r.track.name.clone(),
                artist: r.track.artist.clone(),
                note: match (&r.track.error, r.track.mode) {
                    (Some(err), _) => err.clone(),
                    (None, Some(DownloadMode::Extended)) => "extended".to_string(),
                    _ => String::new(),
                },
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    let summary = format!(
        "{} downloaded, {} skipped, {} failed ({}/{} processed, {}%)",
        session.count(OutcomeKind::Done),
        session.count(OutcomeKind::Skip),
        session.count(OutcomeKind::Error),
        session.processed(),
        session.total(),
        session.percent()
    );

    match session.status() {
        SessionStatus::Complete => success!(
            "Export of \"{}\" complete: {}",
            session.playlist_name(),
            summary
        ),
        SessionStatus::Cancelled => warning!("Download cancelled: {}", summary),
        SessionStatus::Errored => error!(
            "Download failed: {}",
            session.error().unwrap_or("Download failed")
        ),
        SessionStatus::Idle | SessionStatus::Active => info!("{}", summary),
    }
}
