use crate::types::DownloadEvent;

const DATA_PREFIX: &str = "data: ";

/// Accumulates raw bytes and hands out complete `\n`-terminated lines.
///
/// Bytes are kept undecoded until a full line is available, so a multi-byte
/// character split across two chunks is reassembled correctly.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and returns every line it completed, without the
    /// trailing newline. The unterminated tail stays buffered.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };

        let tail = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, tail);

        complete[..complete.len() - 1]
            .split(|b| *b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Bytes received after the last newline.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Parses one stream line into an event.
///
/// Lines without the `data: ` prefix, malformed JSON and unknown event
/// types all yield `None`; a single bad line never ends the stream.
pub fn parse_line(line: &str) -> Option<DownloadEvent> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    serde_json::from_str(payload).ok()
}
