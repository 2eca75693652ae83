use crate::{
    download::stream::{LineBuffer, parse_line},
    types::{DownloadEvent, DownloadResult, OutcomeKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Active,
    Complete,
    Errored,
    Cancelled,
}

impl SessionStatus {
    /// Complete, errored and cancelled sessions never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Complete | SessionStatus::Errored | SessionStatus::Cancelled
        )
    }
}

/// Progress of one playlist export.
///
/// A session moves `Idle → Active → {Complete | Errored | Cancelled}` and
/// never returns to `Active`; a new download gets a fresh session. Events
/// are only applied while the session is active.
#[derive(Debug)]
pub struct DownloadSession {
    playlist_name: String,
    total: u64,
    results: Vec<DownloadResult>,
    error: Option<String>,
    status: SessionStatus,
    minimized: bool,
    buffer: LineBuffer,
}

impl DownloadSession {
    /// A fresh, idle session for `playlist_name`.
    pub fn new(playlist_name: impl Into<String>) -> Self {
        Self {
            playlist_name: playlist_name.into(),
            total: 0,
            results: Vec::new(),
            error: None,
            status: SessionStatus::Idle,
            minimized: false,
            buffer: LineBuffer::new(),
        }
    }

    /// Moves an idle session to `Active`. Returns `false` for any other
    /// state.
    pub fn begin(&mut self) -> bool {
        if self.status != SessionStatus::Idle {
            return false;
        }
        self.status = SessionStatus::Active;
        true
    }

    /// Feeds a raw body chunk and applies every complete line in order.
    ///
    /// Returns the events that were applied.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<DownloadEvent> {
        let mut applied = Vec::new();
        self.feed_with(chunk, |_, event| applied.push(event.clone()));
        applied
    }

    /// Like [`feed`](Self::feed), but calls `on_event` after each event is
    /// applied instead of collecting them. The callback sees the session as
    /// that event left it, before any later line of the chunk is applied.
    pub fn feed_with<F>(&mut self, chunk: &[u8], mut on_event: F)
    where
        F: FnMut(&DownloadSession, &DownloadEvent),
    {
        if !self.is_active() {
            return;
        }

        for line in self.buffer.push(chunk) {
            if !self.is_active() {
                break;
            }
            if let Some(event) = parse_line(&line) {
                self.apply(event.clone());
                on_event(self, &event);
            }
        }
    }

    /// Applies a single event. Ignored unless the session is active.
    pub fn apply(&mut self, event: DownloadEvent) {
        if !self.is_active() {
            return;
        }

        match event {
            DownloadEvent::Total { total } => self.total = total,
            DownloadEvent::Done(track) => self.results.push(DownloadResult {
                kind: OutcomeKind::Done,
                track,
            }),
            DownloadEvent::Skip(track) => self.results.push(DownloadResult {
                kind: OutcomeKind::Skip,
                track,
            }),
            DownloadEvent::Error(track) => self.results.push(DownloadResult {
                kind: OutcomeKind::Error,
                track,
            }),
            DownloadEvent::Complete => self.settle(SessionStatus::Complete),
        }
    }

    /// The body ended. Without a `complete` event the session still counts
    /// as complete, since no error was reported.
    pub fn finish(&mut self) {
        self.settle(SessionStatus::Complete);
    }

    /// Ends the session as `Errored` with `message`. Ignored once the
    /// session is terminal.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.error = Some(message.into());
        self.status = SessionStatus::Errored;
        self.buffer.clear();
    }

    /// Ends the session as `Cancelled`, keeping the results so far.
    pub fn cancel(&mut self) {
        self.settle(SessionStatus::Cancelled);
    }

    fn settle(&mut self, status: SessionStatus) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.buffer.clear();
    }

    /// Flips between the compact and the expanded progress view.
    pub fn toggle_minimized(&mut self) {
        self.minimized = !self.minimized;
    }

    pub fn playlist_name(&self) -> &str {
        &self.playlist_name
    }

    /// Announced number of tracks; the last `total` event wins.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Per-track outcomes in arrival order.
    pub fn results(&self) -> &[DownloadResult] {
        &self.results
    }

    /// Failure message of an errored session.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// Number of tracks reported so far, whatever their outcome.
    pub fn processed(&self) -> usize {
        self.results.len()
    }

    /// Share of processed tracks, rounded to whole percent. Zero until a
    /// `total` event arrived.
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        ((self.processed() as f64 / self.total as f64) * 100.0).round() as u64
    }

    /// Number of results with outcome `kind`.
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.results.iter().filter(|r| r.kind == kind).count()
    }
}
