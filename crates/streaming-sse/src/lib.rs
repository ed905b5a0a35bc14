//! Incremental Server-Sent Events decoding.
//!
//! Transports hand over arbitrary byte chunks; [`SseDecoder`] buffers partial
//! lines across chunk boundaries and yields one [`SseEvent`] per blank-line
//! terminated event. Only the fields providers act on are kept: `data`,
//! `event` and `id`. Comment lines and unknown fields are skipped.

use bytes::Bytes;

/// Payload some OpenAI-style backends send to mark the end of a stream.
pub const DONE_SENTINEL: &[u8] = b"[DONE]";

/// A single decoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    /// `data` lines joined with `\n`.
    pub data: Bytes,
    pub id: Option<String>,
}

impl SseEvent {
    pub fn is_done(&self) -> bool {
        self.data.as_ref().trim_ascii() == DONE_SENTINEL
    }
}

#[derive(Default)]
struct PendingEvent {
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
}

impl PendingEvent {
    fn take(&mut self) -> Option<SseEvent> {
        let pending = std::mem::take(self);
        if pending.data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event: pending.event,
            data: Bytes::from(pending.data.join("\n")),
            id: pending.id,
        })
    }
}

/// Incremental decoder that is safe to feed at any byte boundary.
#[derive(Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    pending: PendingEvent,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect every event it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut out = Vec::new();
        while let Some((line_end, next)) = next_line_break(&self.buffer) {
            let line: Vec<u8> = self.buffer.drain(..next).take(line_end).collect();
            if let Some(event) = self.consume_line(&line) {
                out.push(event);
            }
        }
        out
    }

    /// Flush whatever is buffered when the byte stream ends.
    ///
    /// Servers may close the connection right after the last `data:` line
    /// without the terminating blank line; that event is still delivered.
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let mut out = Vec::new();
        if !self.buffer.is_empty() {
            let mut line = std::mem::take(&mut self.buffer);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if let Some(event) = self.consume_line(&line) {
                out.push(event);
            }
        }
        out.extend(self.pending.take());
        out
    }

    fn consume_line(&mut self, line: &[u8]) -> Option<SseEvent> {
        if line.is_empty() {
            return self.pending.take();
        }
        if line[0] == b':' {
            return None;
        }
        let text = String::from_utf8_lossy(line);
        let (field, value) = match text.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (text.as_ref(), ""),
        };
        match field {
            "data" => self.pending.data.push(value.to_string()),
            "event" => self.pending.event = Some(value.to_string()),
            "id" => self.pending.id = Some(value.to_string()),
            _ => {}
        }
        None
    }
}

/// Locate the next line break. Returns the line length and the offset just
/// past the break. A trailing `\r` is held back until the next byte shows
/// whether it starts a `\r\n` pair.
fn next_line_break(buf: &[u8]) -> Option<(usize, usize)> {
    let idx = buf.iter().position(|b| *b == b'\n' || *b == b'\r')?;
    if buf[idx] == b'\n' {
        return Some((idx, idx + 1));
    }
    match buf.get(idx + 1) {
        None => None,
        Some(b'\n') => Some((idx, idx + 2)),
        Some(_) => Some((idx, idx + 1)),
    }
}

#[cfg(test)]
#[path = "../tests/decoder_tests.rs"]
mod decoder_tests;
