use std::collections::{HashMap, HashSet};

use crate::{
    playlist::identity::identity_key,
    types::{DuplicateGroup, RemovalEntry, RemovalPlan, Track},
};

struct Occurrences<'a> {
    key: String,
    first: &'a Track,
    positions: Vec<usize>,
}

/// Groups tracks by identity key, keeping groups in first-occurrence order.
fn group_positions(tracks: &[Track]) -> Vec<Occurrences<'_>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Occurrences> = Vec::new();

    for (position, track) in tracks.iter().enumerate() {
        let key = identity_key(track);
        match index.get(&key) {
            Some(&slot) => groups[slot].positions.push(position),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Occurrences {
                    key,
                    first: track,
                    positions: vec![position],
                });
            }
        }
    }

    groups
}

/// Finds every track that occurs more than once.
///
/// Groups are ordered by descending occurrence count; groups with the same
/// count keep the order in which their first copy appears. An empty result
/// means the playlist is clean.
pub fn detect_duplicates(tracks: &[Track]) -> Vec<DuplicateGroup> {
    let mut duplicates: Vec<DuplicateGroup> = group_positions(tracks)
        .into_iter()
        .filter(|group| group.positions.len() > 1)
        .map(|group| DuplicateGroup {
            identity_key: group.key,
            track_name: group.first.name.clone(),
            artists: group.first.artists.clone(),
            total_occurrences: group.positions.len(),
            duplicates_to_remove: group.positions.len() - 1,
        })
        .collect();

    // stable: ties stay in first-occurrence order
    duplicates.sort_by(|a, b| b.total_occurrences.cmp(&a.total_occurrences));
    duplicates
}

/// Plans the removal of every copy except the first one of each track.
///
/// Positions are grouped per URI and sorted ascending, matching the shape
/// Spotify expects when deleting specific occurrences. A track's own
/// `position` is used when set; otherwise its index in `tracks` is taken
/// as the position. Entries without a URI cannot be addressed and are left
/// in place.
pub fn removal_plan(tracks: &[Track]) -> RemovalPlan {
    let mut by_uri: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<RemovalEntry> = Vec::new();

    for group in group_positions(tracks) {
        for &index in group.positions.iter().skip(1) {
            let track = &tracks[index];
            let uri = track.uri.as_str();
            if uri.is_empty() {
                continue;
            }
            let position = track.position.unwrap_or(index);

            match by_uri.get(uri) {
                Some(&slot) => entries[slot].positions.push(position),
                None => {
                    by_uri.insert(uri, entries.len());
                    entries.push(RemovalEntry {
                        uri: uri.to_string(),
                        positions: vec![position],
                    });
                }
            }
        }
    }

    for entry in entries.iter_mut() {
        entry.positions.sort_unstable();
    }

    let removed_count = entries.iter().map(|e| e.positions.len()).sum();
    RemovalPlan {
        entries,
        removed_count,
    }
}

/// Returns the playlist as it looks after duplicate removal: the first copy
/// of each track in original order.
pub fn keep_first(tracks: &[Track]) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .iter()
        .filter(|track| seen.insert(identity_key(track)))
        .cloned()
        .collect()
}
