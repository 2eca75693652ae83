//! Orpheus playlist companion library
//!
//! This library provides the pieces behind the `orpheus` command-line tool:
//! inspecting Spotify playlists, finding and removing duplicate tracks,
//! sweeping tracks out of one playlist when they appear in others, and
//! following a USB Pod export through its progress stream.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `download` - Download progress stream parsing and session state
//! - `error` - Error type and domain error codes
//! - `management` - Token persistence and refresh
//! - `playlist` - Track identity, duplicate grouping and Filter Sweep
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `usbpod` - Client for the USB Pod conversion service
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod management;
pub mod playlist;
pub mod server;
pub mod spotify;
pub mod types;
pub mod usbpod;
pub mod utils;

/// A convenient Result type alias for top-level glue code.
///
/// Library operations return [`error::Result`]; this boxed form is used
/// where errors of several kinds are funnelled together, such as the
/// binary's startup path.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching tracks for {}", playlist_name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the CLI layer uses this; library code returns errors instead.
///
/// # Example
///
/// ```
/// error!("Failed to load token: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
