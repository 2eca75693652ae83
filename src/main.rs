use std::sync::Arc;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use orpheus::{cli, config, types::PkceToken, warning};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List playlists in your library
    Playlists(PlaylistsOptions),

    /// Show every track of a playlist
    Tracks(TracksOptions),

    /// Check a playlist for duplicate tracks
    Duplicates(DuplicatesOptions),

    #[clap(about = "Remove from playlist A every track found in the reference playlists")]
    Sweep(SweepOptions),

    /// Export a playlist to MP3 through USB Pod
    Download(DownloadOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Only playlists you own
    #[clap(long)]
    pub owned: bool,

    /// Case-insensitive name filter
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    /// Playlist id, or __recent__ for recently played
    pub playlist_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DuplicatesOptions {
    /// Playlist id (must be owned by you)
    pub playlist_id: String,

    /// Keep the first copy of each track and remove the rest
    #[clap(long)]
    pub remove: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SweepOptions {
    /// Playlist A: the owned playlist to clean up
    #[clap(long = "from")]
    pub playlist_a: String,

    /// Reference playlist B; can be repeated (__recent__ for recently played)
    #[clap(
        long = "reference",
        required = true,
        action = ArgAction::Append,
        num_args = 1
    )]
    pub references: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DownloadOptions {
    /// Playlist id
    pub playlist_id: String,

    /// Folder the MP3 files are written to
    #[clap(long)]
    pub output: String,

    /// Prefer extended and remix sources
    #[clap(long)]
    pub dj_mode: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Playlists(opt) => cli::list_playlists(opt.owned, opt.search).await,
        Command::Tracks(opt) => cli::view_tracks(opt.playlist_id).await,
        Command::Duplicates(opt) => cli::duplicates(opt.playlist_id, opt.remove).await,
        Command::Sweep(opt) => cli::sweep(opt.playlist_a, opt.references).await,
        Command::Download(opt) => {
            cli::download(opt.playlist_id, opt.output, opt.dj_mode).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
