//! Server-sent event framing
//!
//! Streaming replies arrive as `data: {json}` lines, but network chunks do
//! not line up with event boundaries. [`SseLineBuffer`] keeps the partial
//! tail of each chunk until its newline arrives.

use super::{AiError, AiResult, TextStream};
use futures_util::stream::unfold;
use futures_util::{Stream, StreamExt};
use std::collections::VecDeque;
use std::mem;
use std::pin::Pin;

#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buffer: String,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the `data:` payloads of every completed line
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));

        let mut events = Vec::new();
        while let Some(newline_pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline_pos).collect();
            if let Some(data) = data_payload(&line) {
                events.push(data);
            }
        }
        events
    }

    /// Drain whatever is left once the byte stream ends
    pub fn flush(&mut self) -> Option<String> {
        let remaining = mem::take(&mut self.buffer);
        data_payload(&remaining)
    }
}

fn data_payload(line: &str) -> Option<String> {
    let data = line.trim().strip_prefix("data:")?.trim();
    if data.is_empty() || data == "[DONE]" {
        None
    } else {
        Some(data.to_string())
    }
}

struct StreamState<S, F> {
    bytes: Pin<Box<S>>,
    parser: SseLineBuffer,
    parse: F,
    pending: VecDeque<AiResult<String>>,
    ended: bool,
}

impl<S, F> StreamState<S, F>
where
    F: Fn(&str) -> Option<AiResult<String>>,
{
    fn queue(&mut self, payload: String) {
        if let Some(item) = (self.parse)(&payload) {
            self.pending.push_back(item);
        }
    }
}

/// Turn a raw byte stream into a stream of text fragments
///
/// `parse` maps one `data:` payload to a fragment; `None` skips it.
pub fn text_stream<S, B, E, F>(bytes: S, parse: F) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
    F: Fn(&str) -> Option<AiResult<String>> + Send + 'static,
{
    let state = StreamState {
        bytes: Box::pin(bytes),
        parser: SseLineBuffer::new(),
        parse,
        pending: VecDeque::new(),
        ended: false,
    };

    let stream = unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.ended {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    for payload in state.parser.feed(chunk.as_ref()) {
                        state.queue(payload);
                    }
                }
                Some(Err(e)) => {
                    state.ended = true;
                    return Some((Err(AiError::Stream(e.to_string())), state));
                }
                None => {
                    state.ended = true;
                    if let Some(payload) = state.parser.flush() {
                        state.queue(payload);
                    }
                }
            }
        }
    });

    Box::pin(stream.filter(|item| {
        let keep = item.as_ref().map_or(true, |text| !text.is_empty());
        futures_util::future::ready(keep)
    }))
}
