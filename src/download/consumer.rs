use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::{
    download::session::DownloadSession,
    error::Result,
    types::DownloadEvent,
};

/// A body that can be read chunk by chunk.
///
/// `Ok(None)` marks the end of the stream.
#[async_trait]
pub trait ChunkSource: Send {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>>;
}

#[async_trait]
impl ChunkSource for reqwest::Response {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.chunk().await?.map(|bytes| bytes.to_vec()))
    }
}

/// Cancels the download it was issued for. Cheap to clone and safe to use
/// from another task, e.g. a Ctrl-C listener.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Requests cancellation. A pending read is abandoned and the session
    /// ends as `Cancelled`; results gathered so far are kept. Calling it
    /// again, or after the session ended, has no effect.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Owns the single download session of the application.
///
/// Only one download runs at a time: [`begin`](Self::begin) while a session
/// is active does nothing. A finished session stays inspectable until it is
/// dismissed or replaced by the next download.
#[derive(Debug, Default)]
pub struct DownloadManager {
    session: Option<DownloadSession>,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl DownloadManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session for `playlist_name`.
    ///
    /// Returns `None` without touching the current session when a download
    /// is already active.
    pub fn begin(&mut self, playlist_name: &str) -> Option<CancelHandle> {
        if self.is_active() {
            return None;
        }

        let mut session = DownloadSession::new(playlist_name);
        session.begin();

        let (tx, rx) = watch::channel(false);
        self.session = Some(session);
        self.cancel_rx = Some(rx);

        Some(CancelHandle { tx: Arc::new(tx) })
    }

    /// Reads `source` to the end, applying events in arrival order.
    ///
    /// `on_event` is called right after each event is applied, so it sees the
    /// session exactly as that event left it. The loop stops when the
    /// body ends, a `complete` event arrives, the transport fails or the
    /// session's [`CancelHandle`] fires; an in-flight read is abandoned on
    /// cancellation. The source is dropped before returning.
    pub async fn consume<S, F>(&mut self, mut source: S, mut on_event: F)
    where
        S: ChunkSource,
        F: FnMut(&DownloadSession, &DownloadEvent),
    {
        let (Some(session), Some(cancel_rx)) = (self.session.as_mut(), self.cancel_rx.as_mut())
        else {
            return;
        };

        let mut cancellable = true;

        while session.is_active() {
            if *cancel_rx.borrow_and_update() {
                session.cancel();
                break;
            }

            tokio::select! {
                biased;

                changed = cancel_rx.changed(), if cancellable => {
                    // every handle dropped: nobody can cancel any more
                    if changed.is_err() {
                        cancellable = false;
                    }
                }

                chunk = source.next_chunk() => match chunk {
                    Ok(Some(bytes)) => session.feed_with(&bytes, &mut on_event),
                    Ok(None) => session.finish(),
                    Err(e) => session.fail(e.to_string()),
                },
            }
        }

        drop(source);
        self.cancel_rx = None;
    }

    /// Records a failure to start or continue the download.
    pub fn fail(&mut self, message: impl Into<String>) {
        if let Some(session) = self.session.as_mut() {
            session.fail(message);
        }
        self.cancel_rx = None;
    }

    /// Cancels the active session when no read loop is running.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cancel();
        }
        self.cancel_rx = None;
    }

    /// Drops a finished session. Refused while the download is active.
    pub fn dismiss(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.session = None;
        true
    }

    /// Flips the minimized flag of the current session, if any.
    pub fn toggle_minimized(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_minimized();
        }
    }

    /// The current or last finished session.
    pub fn session(&self) -> Option<&DownloadSession> {
        self.session.as_ref()
    }

    /// True while a session is reading its stream.
    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_active())
    }
}
