use crate::types::Track;

/// Joins name and artists in a fallback key. Neither field is expected to
/// contain the ASCII unit separator.
pub const KEY_SEPARATOR: char = '\u{1f}';

/// Returns the key used to decide whether two tracks are the same.
///
/// A non-blank Spotify id is used verbatim. Tracks without an id (local
/// files, unavailable items) fall back to the lowercased, trimmed name and
/// artists. Two tracks with different ids are never merged, even when
/// their metadata is identical.
pub fn identity_key(track: &Track) -> String {
    match track.id.as_deref() {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => format!(
            "{}{}{}",
            normalize(&track.name),
            KEY_SEPARATOR,
            normalize(&track.artists)
        ),
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
