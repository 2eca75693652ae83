use std::collections::{HashMap, HashSet};

use crate::{
    error::{OrpheusError, Result},
    playlist::identity::identity_key,
    types::{RemovedTrack, SweepResult, Track},
};

/// Checks a Filter Sweep selection before anything is fetched.
///
/// Playlist A must be set, at least one reference must be chosen, and A
/// may not double as its own reference.
pub fn validate_selection(playlist_a: &str, references: &[String]) -> Result<()> {
    if playlist_a.trim().is_empty() || references.is_empty() {
        return Err(OrpheusError::MissingSelection);
    }

    if references.iter().any(|id| id == playlist_a) {
        return Err(OrpheusError::InvalidSelection);
    }

    Ok(())
}

/// Computes which tracks of `playlist_a` appear in any of `references`.
///
/// A track is removed when it occurs in at least one reference list (union,
/// not intersection). Repeated copies inside A are all removed and reported
/// once with their count in `occurrences`; `uris` lists every distinct URI
/// those copies use. Reported tracks keep the order of their first
/// appearance in A.
pub fn sweep(playlist_a: &[Track], references: &[Vec<Track>]) -> SweepResult {
    let reference_keys: HashSet<String> = references
        .iter()
        .flat_map(|list| list.iter().map(identity_key))
        .collect();

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut removed_tracks: Vec<RemovedTrack> = Vec::new();

    for track in playlist_a {
        let key = identity_key(track);
        if !reference_keys.contains(&key) {
            continue;
        }

        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key, removed_tracks.len());
                removed_tracks.push(RemovedTrack {
                    name: track.name.clone(),
                    artists: track.artists.clone(),
                    occurrences: 0,
                    uris: Vec::new(),
                });
                removed_tracks.len() - 1
            }
        };

        let removed = &mut removed_tracks[slot];
        removed.occurrences += 1;
        if !track.uri.is_empty() && !removed.uris.contains(&track.uri) {
            removed.uris.push(track.uri.clone());
        }
    }

    let removed_count = removed_tracks.iter().map(|t| t.occurrences).sum();
    SweepResult {
        removed_count,
        removed_tracks,
    }
}
