use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use orpheus::download::*;
use orpheus::error::{OrpheusError, Result};
use orpheus::types::{DownloadEvent, DownloadMode, OutcomeKind};
use tokio::sync::mpsc;

// Chunk source replaying a fixed list of chunks
struct ScriptedSource {
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedSource {
    fn new(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.as_bytes().to_vec()).collect(),
        }
    }
}

#[async_trait]
impl ChunkSource for ScriptedSource {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.chunks.pop_front())
    }
}

// Chunk source fed from a channel; reads block until the test sends
struct ChannelSource {
    rx: mpsc::Receiver<Vec<u8>>,
}

#[async_trait]
impl ChunkSource for ChannelSource {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.rx.recv().await)
    }
}

// Chunk source failing after its chunks run out
struct FailingSource {
    chunks: VecDeque<Vec<u8>>,
}

#[async_trait]
impl ChunkSource for FailingSource {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        match self.chunks.pop_front() {
            Some(chunk) => Ok(Some(chunk)),
            None => Err(OrpheusError::Config("connection reset".to_string())),
        }
    }
}

#[test]
fn test_line_buffer_keeps_partial_tail() {
    let mut buffer = LineBuffer::new();

    assert!(buffer.push(b"data: {\"type\":\"co").is_empty());
    assert_eq!(buffer.pending(), b"data: {\"type\":\"co");

    let lines = buffer.push(b"mplete\"}\nda");
    assert_eq!(lines, vec!["data: {\"type\":\"complete\"}".to_string()]);
    assert_eq!(buffer.pending(), b"da");

    let lines = buffer.push(b"ta: 1\n\ndata: 2\n");
    assert_eq!(lines, vec!["data: 1", "", "data: 2"]);
    assert!(buffer.pending().is_empty());
}

#[test]
fn test_line_buffer_reassembles_split_utf8() {
    let mut buffer = LineBuffer::new();
    let line = "data: {\"type\":\"done\",\"name\":\"Café\",\"artist\":\"Björk\"}\n";
    let bytes = line.as_bytes();
    // split inside the two-byte 'é'
    let split = line.find('é').unwrap() + 1;

    assert!(buffer.push(&bytes[..split]).is_empty());
    let lines = buffer.push(&bytes[split..]);

    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("Café"));
}

#[test]
fn test_parse_line() {
    assert_eq!(
        parse_line(r#"data: {"type":"total","total":12}"#),
        Some(DownloadEvent::Total { total: 12 })
    );
    assert_eq!(
        parse_line(r#"data: {"type":"complete"}"#),
        Some(DownloadEvent::Complete)
    );

    match parse_line(r#"data: {"type":"error","name":"Song","artist":"Band","error":"not found","mode":"extended"}"#) {
        Some(DownloadEvent::Error(track)) => {
            assert_eq!(track.name, "Song");
            assert_eq!(track.artist, "Band");
            assert_eq!(track.error.as_deref(), Some("not found"));
            assert_eq!(track.mode, Some(DownloadMode::Extended));
        }
        other => panic!("unexpected event: {:?}", other),
    }

    // Missing prefix, malformed JSON and unknown types are dropped
    assert_eq!(parse_line(r#"{"type":"complete"}"#), None);
    assert_eq!(parse_line("data: {not json"), None);
    assert_eq!(parse_line(r#"data: {"type":"progress"}"#), None);
    assert_eq!(parse_line(""), None);
}

#[test]
fn test_session_folds_split_chunks() {
    let mut session = DownloadSession::new("Road Trip");
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(session.begin());

    session.feed(b"data: {\"type\":\"total\",\"total\":3}\n");
    session.feed(b"data: {\"type\":\"done\",\"name\":\"A\",\"artist\":\"X\"}\n");
    session.feed(b"data: {\"type\":\"co");
    assert!(session.is_active());
    session.feed(b"mplete\"}\n");

    assert_eq!(session.total(), 3);
    assert_eq!(session.count(OutcomeKind::Done), 1);
    assert_eq!(session.status(), SessionStatus::Complete);
    assert!(!session.is_active());
}

#[test]
fn test_session_skips_malformed_and_last_total_wins() {
    let mut session = DownloadSession::new("Mix");
    session.begin();

    let applied = session.feed(
        b"data: {\"type\":\"total\",\"total\":5}\n\
          data: {oops}\n\
          : keep-alive\n\
          data: {\"type\":\"skip\",\"name\":\"B\",\"artist\":\"Y\"}\n\
          data: {\"type\":\"total\",\"total\":4}\n",
    );

    assert_eq!(applied.len(), 3);
    assert_eq!(session.total(), 4);
    assert_eq!(session.processed(), 1);
    assert_eq!(session.percent(), 25);
    assert!(session.is_active());
}

#[test]
fn test_session_preserves_arrival_order() {
    let mut session = DownloadSession::new("Mix");
    session.begin();

    session.feed(
        b"data: {\"type\":\"error\",\"name\":\"1\",\"artist\":\"a\",\"error\":\"x\"}\n\
          data: {\"type\":\"done\",\"name\":\"2\",\"artist\":\"b\"}\n\
          data: {\"type\":\"skip\",\"name\":\"3\",\"artist\":\"c\"}\n",
    );

    let kinds: Vec<OutcomeKind> = session.results().iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![OutcomeKind::Error, OutcomeKind::Done, OutcomeKind::Skip]
    );
    let names: Vec<&str> = session
        .results()
        .iter()
        .map(|r| r.track.name.as_str())
        .collect();
    assert_eq!(names, vec!["1", "2", "3"]);
}

#[test]
fn test_session_ignores_events_after_terminal_state() {
    let mut session = DownloadSession::new("Mix");

    // Not started yet
    session.feed(b"data: {\"type\":\"total\",\"total\":2}\n");
    assert_eq!(session.total(), 0);

    session.begin();
    session.feed(
        b"data: {\"type\":\"complete\"}\n\
          data: {\"type\":\"done\",\"name\":\"late\",\"artist\":\"z\"}\n",
    );
    assert_eq!(session.status(), SessionStatus::Complete);
    assert_eq!(session.processed(), 0);

    // No way back to active
    assert!(!session.begin());
    session.cancel();
    session.fail("boom");
    assert_eq!(session.status(), SessionStatus::Complete);
    assert_eq!(session.error(), None);
}

#[test]
fn test_session_percent() {
    let mut session = DownloadSession::new("Mix");
    session.begin();
    assert_eq!(session.percent(), 0);

    session.feed(b"data: {\"type\":\"done\",\"name\":\"a\",\"artist\":\"b\"}\n");
    // results without a total stay at zero percent
    assert_eq!(session.percent(), 0);

    session.feed(b"data: {\"type\":\"total\",\"total\":3}\n");
    assert_eq!(session.percent(), 33);

    session.feed(b"data: {\"type\":\"skip\",\"name\":\"c\",\"artist\":\"d\"}\n");
    assert_eq!(session.percent(), 67);
}

#[test]
fn test_session_toggle_minimized() {
    let mut session = DownloadSession::new("Mix");
    assert!(!session.is_minimized());
    session.toggle_minimized();
    assert!(session.is_minimized());
    session.toggle_minimized();
    assert!(!session.is_minimized());
}

#[tokio::test]
async fn test_manager_consumes_stream_across_chunk_boundaries() {
    let mut manager = DownloadManager::new();
    assert!(manager.begin("Road Trip").is_some());

    let source = ScriptedSource::new(&[
        "data: {\"type\":\"total\",\"total\":3}\n",
        "data: {\"type\":\"done\",\"name\":\"A\",\"artist\":\"X\",\"mode\":\"standard\"}\n",
        "data: {\"type\":\"co",
        "mplete\"}\n",
    ]);

    let mut seen = Vec::new();
    manager
        .consume(source, |_, event| seen.push(event.clone()))
        .await;

    let session = manager.session().unwrap();
    assert_eq!(session.total(), 3);
    assert_eq!(session.count(OutcomeKind::Done), 1);
    assert_eq!(session.status(), SessionStatus::Complete);
    assert!(!manager.is_active());
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[2], DownloadEvent::Complete);
}

#[tokio::test]
async fn test_manager_notifies_each_event_with_its_own_state() {
    let mut manager = DownloadManager::new();
    manager.begin("Road Trip");

    // the whole run arrives as a single chunk
    let source = ScriptedSource::new(&[concat!(
        "data: {\"type\":\"total\",\"total\":3}\n",
        "data: {\"type\":\"done\",\"name\":\"A\",\"artist\":\"X\"}\n",
        "data: {\"type\":\"skip\",\"name\":\"B\",\"artist\":\"Y\"}\n",
        "data: {\"type\":\"error\",\"name\":\"C\",\"artist\":\"Z\",\"error\":\"no match\"}\n",
        "data: {\"type\":\"complete\"}\n",
    )]);

    let mut progress = Vec::new();
    manager
        .consume(source, |session, _| {
            progress.push((session.processed(), session.is_active()))
        })
        .await;

    assert_eq!(
        progress,
        vec![(0, true), (1, true), (2, true), (3, true), (3, false)]
    );
}

#[tokio::test]
async fn test_manager_stream_end_without_complete_finishes() {
    let mut manager = DownloadManager::new();
    manager.begin("Mix");

    let source = ScriptedSource::new(&[
        "data: {\"type\":\"total\",\"total\":2}\n",
        "data: {\"type\":\"skip\",\"name\":\"A\",\"artist\":\"X\"}\ndata: {\"type\":\"do",
    ]);
    manager.consume(source, |_, _| {}).await;

    let session = manager.session().unwrap();
    assert_eq!(session.status(), SessionStatus::Complete);
    assert_eq!(session.processed(), 1);
    assert_eq!(session.error(), None);
}

#[tokio::test]
async fn test_manager_transport_failure_errors_session() {
    let mut manager = DownloadManager::new();
    manager.begin("Mix");

    let source = FailingSource {
        chunks: VecDeque::from(vec![
            b"data: {\"type\":\"total\",\"total\":2}\n".to_vec(),
        ]),
    };
    manager.consume(source, |_, _| {}).await;

    let session = manager.session().unwrap();
    assert_eq!(session.status(), SessionStatus::Errored);
    assert!(session.error().unwrap().contains("connection reset"));
    assert_eq!(session.total(), 2);
}

#[tokio::test]
async fn test_manager_cancel_mid_stream_keeps_results() {
    let mut manager = DownloadManager::new();
    let cancel = manager.begin("Mix").unwrap();

    let (tx, rx) = mpsc::channel(8);
    tx.send(b"data: {\"type\":\"total\",\"total\":10}\n".to_vec())
        .await
        .unwrap();
    tx.send(b"data: {\"type\":\"done\",\"name\":\"A\",\"artist\":\"X\"}\n".to_vec())
        .await
        .unwrap();

    let canceller = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
            // kept open so the read stays blocked until cancellation
            tokio::time::sleep(Duration::from_millis(200)).await;
            drop(tx);
        }
    });

    tokio::time::timeout(
        Duration::from_secs(5),
        manager.consume(ChannelSource { rx }, |_, _| {}),
    )
    .await
    .expect("cancellation should unblock the pending read");

    let session = manager.session().unwrap();
    assert_eq!(session.status(), SessionStatus::Cancelled);
    assert!(!session.is_active());
    assert_eq!(session.total(), 10);
    assert_eq!(session.processed(), 1);

    canceller.await.unwrap();
}

#[tokio::test]
async fn test_manager_cancel_before_reading() {
    let mut manager = DownloadManager::new();
    let cancel = manager.begin("Mix").unwrap();
    cancel.cancel();

    let source = ScriptedSource::new(&["data: {\"type\":\"total\",\"total\":1}\n"]);
    manager.consume(source, |_, _| {}).await;

    let session = manager.session().unwrap();
    assert_eq!(session.status(), SessionStatus::Cancelled);
    assert_eq!(session.total(), 0);
}

#[tokio::test]
async fn test_manager_guards_reentrancy() {
    let mut manager = DownloadManager::new();
    assert!(manager.begin("First").is_some());

    // Second start while active is a no-op
    assert!(manager.begin("Second").is_none());
    assert_eq!(manager.session().unwrap().playlist_name(), "First");

    // Dismiss is refused while active
    assert!(!manager.dismiss());

    manager.consume(ScriptedSource::new(&[]), |_, _| {}).await;
    assert!(!manager.is_active());

    // A finished session can be replaced by a fresh one
    assert!(manager.begin("Second").is_some());
    let session = manager.session().unwrap();
    assert_eq!(session.playlist_name(), "Second");
    assert_eq!(session.processed(), 0);
    assert!(session.is_active());
}

#[test]
fn test_manager_fail_and_dismiss() {
    let mut manager = DownloadManager::new();
    manager.begin("Mix");
    manager.fail("Failed to start download");

    let session = manager.session().unwrap();
    assert_eq!(session.status(), SessionStatus::Errored);
    assert_eq!(session.error(), Some("Failed to start download"));

    manager.toggle_minimized();
    assert!(manager.session().unwrap().is_minimized());

    assert!(manager.dismiss());
    assert!(manager.session().is_none());
}

#[test]
fn test_manager_cancel_without_reader() {
    let mut manager = DownloadManager::new();
    manager.begin("Mix");
    manager.cancel();

    assert_eq!(
        manager.session().unwrap().status(),
        SessionStatus::Cancelled
    );
    assert!(!manager.is_active());
}
