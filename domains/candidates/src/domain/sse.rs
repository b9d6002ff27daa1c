//! Incremental server-sent events decoder
//!
//! Bytes arrive in arbitrary chunks. The decoder keeps two pieces of explicit
//! carry-over state between calls: trailing bytes of an incomplete UTF-8
//! sequence, and decoded text that has not yet reached a blank line.

use serde_json::json;

/// SSE event name used when a record has no `event:` line
pub const DEFAULT_EVENT: &str = "message";

/// One blank-line-terminated SSE record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseRecord {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

impl SseRecord {
    /// Synthetic `error` record for a stream that could not be completed
    pub fn error(message: &str) -> Self {
        Self {
            event: "error".to_string(),
            data: json!({ "type": "error", "message": message }).to_string(),
            id: None,
        }
    }

    /// Wire form, terminated by a blank line
    pub fn encode(&self) -> String {
        let mut out = String::new();
        if let Some(id) = &self.id {
            out.push_str("id: ");
            out.push_str(id);
            out.push('\n');
        }
        out.push_str("event: ");
        out.push_str(&self.event);
        out.push('\n');
        for line in self.data.split('\n') {
            out.push_str("data: ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    buffer: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every record it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseRecord> {
        self.pending.extend_from_slice(chunk);
        self.decode_pending(false);

        let mut records = Vec::new();
        while let Some((end, separator)) = find_boundary(&self.buffer) {
            let block: String = self.buffer.drain(..end + separator).collect();
            if let Some(record) = parse_block(&block[..end]) {
                records.push(record);
            }
        }
        records
    }

    /// Flush a trailing record that was never terminated by a blank line
    pub fn finish(mut self) -> Option<SseRecord> {
        self.decode_pending(true);
        if self.buffer.trim().is_empty() {
            return None;
        }
        parse_block(&self.buffer)
    }

    fn decode_pending(&mut self, at_end: bool) {
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    self.pending.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                        // Incomplete sequence at the end of the chunk
                        None if !at_end => {
                            self.pending.drain(..valid);
                            return;
                        }
                        None => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending.clear();
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Earliest blank line: `(record_end, separator_len)`
fn find_boundary(buffer: &str) -> Option<(usize, usize)> {
    let lf = buffer.find("\n\n").map(|i| (i, 2));
    let crlf = buffer.find("\r\n\r\n").map(|i| (i, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn parse_block(block: &str) -> Option<SseRecord> {
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();
    let mut id = None;

    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            "id" => id = Some(value.to_string()),
            _ => {}
        }
    }

    if event.is_none() && data.is_empty() {
        return None;
    }

    Some(SseRecord {
        event: event
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_EVENT.to_string()),
        data: data.join("\n"),
        id,
    })
}
