//! # USB Pod Download Progress
//!
//! The conversion service answers a download request with a body of
//! newline-delimited `data: <json>` lines. This module turns those bytes
//! into [`DownloadEvent`](crate::types::DownloadEvent)s and folds them into
//! a [`DownloadSession`].
//!
//! ```text
//! reqwest::Response ──chunks──▶ LineBuffer ──lines──▶ parse_line
//!                                                       │
//!                         DownloadManager ◀──events─────┘
//!                         (owns one DownloadSession)
//! ```
//!
//! - [`stream`] - framing across chunk boundaries and event parsing
//! - [`session`] - the per-download state machine
//! - [`consumer`] - async read loop with cancellation

pub mod consumer;
pub mod session;
pub mod stream;

pub use consumer::{CancelHandle, ChunkSource, DownloadManager};
pub use session::{DownloadSession, SessionStatus};
pub use stream::{LineBuffer, parse_line};
