//! # Playlist Logic
//!
//! Pure computations over fully fetched track lists. Nothing in here talks
//! to the network; callers gather every page of a playlist first and then
//! hand the complete `Vec<Track>` to these functions.
//!
//! - [`identity`] - comparison key for a track
//! - [`duplicates`] - grouping repeated tracks and planning their removal
//! - [`sweep`] - Filter Sweep: tracks of playlist A found in any reference

pub mod duplicates;
pub mod identity;
pub mod sweep;

pub use duplicates::{detect_duplicates, keep_first, removal_plan};
pub use identity::identity_key;
pub use sweep::{sweep, validate_selection};
