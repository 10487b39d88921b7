//! Line-delimited JSON (NDJSON) decoding for Ollama streaming bodies.
//!
//! Ollama emits one JSON object per line. Transport chunks do not align with
//! line boundaries, so partial lines (including split multi-byte UTF-8
//! sequences) are buffered until the terminating newline arrives. Lines that
//! fail to parse are dropped, not fatal: the server may interleave non-JSON
//! diagnostic output. An unterminated trailing fragment at end-of-stream is
//! discarded, never parsed.
//!
//! One decoder instance serves exactly one request.

use futures::{Stream, StreamExt};

use crate::error::ClientError;

/// Incremental splitter/parser for newline-delimited JSON.
#[derive(Default)]
pub(crate) struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk, returning every value completed by it.
    ///
    /// Values are returned in arrival order. Blank lines and lines that are
    /// not valid JSON are skipped.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Vec<serde_json::Value> {
        self.buf.extend_from_slice(chunk);

        let mut values = Vec::new();
        while let Some(newline_pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=newline_pos).collect();
            line.pop(); // the newline itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice(&line) {
                Ok(value) => values.push(value),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed stream line");
                }
            }
        }
        values
    }

    /// Signal end-of-stream, discarding any unterminated trailing fragment.
    pub(crate) fn finish(self) {
        if !self.buf.is_empty() {
            tracing::debug!(
                bytes = self.buf.len(),
                "discarding unterminated trailing fragment at end of stream"
            );
        }
    }
}

/// Adapt a response byte stream into a stream of parsed JSON values.
///
/// A transport read error ends the stream with a single
/// [`ClientError::Stream`] item; decode errors are handled per-line inside
/// [`LineDecoder`] and never surface.
pub(crate) fn json_lines(
    byte_stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
) -> impl Stream<Item = Result<serde_json::Value, ClientError>> + Send + 'static {
    async_stream::stream! {
        let mut decoder = LineDecoder::new();
        let mut byte_stream = std::pin::pin!(byte_stream);

        while let Some(chunk) = byte_stream.next().await {
            let chunk = match chunk {
                Ok(b) => b,
                Err(e) => {
                    yield Err(ClientError::Stream(format!("stream read error: {e}")));
                    return;
                }
            };
            for value in decoder.feed(&chunk) {
                yield Ok(value);
            }
        }

        decoder.finish();
    }
}
