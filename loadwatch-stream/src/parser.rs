//! Incremental parser for `text/event-stream` frames
//!
//! Frames are blank-line separated. A frame carries an optional `event:`
//! name and zero or more `data:` lines, joined with `\n`. Comment lines
//! (leading `:`) and the `id:`/`retry:` fields are ignored; neither feed
//! uses them.

/// One parsed server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name; None for the default (untagged) event type
    pub event: Option<String>,

    /// Frame payload text
    pub data: String,
}

/// Stateful parser fed with raw byte chunks as they arrive
///
/// Chunks are buffered as raw bytes: network framing can split a frame
/// anywhere, including inside a multibyte character, so decoding happens
/// only on complete blank-line-terminated blocks.
#[derive(Debug, Default)]
pub struct FrameParser {
    buffer: Vec<u8>,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every frame it completes. A frame split
    /// across chunks stays buffered until its terminating blank line.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some((end, delimiter)) = find_blank_line(&self.buffer) {
            // block boundaries are ASCII, so a complete block is always a
            // complete UTF-8 sequence
            let block = String::from_utf8_lossy(&self.buffer[..end]).into_owned();
            self.buffer.drain(..end + delimiter);
            if let Some(frame) = parse_block(&block) {
                frames.push(frame);
            }
        }
        frames
    }
}

/// Locate the blank line ending the current block: a line ending followed
/// immediately by another. Returns block length and delimiter length.
fn find_blank_line(buffer: &[u8]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i + 1 < buffer.len() {
        if buffer[i] == b'\n' {
            if buffer[i + 1] == b'\n' {
                return Some((i, 2));
            }
            if buffer[i + 1] == b'\r' && buffer.get(i + 2) == Some(&b'\n') {
                return Some((i, 3));
            }
        }
        i += 1;
    }
    None
}

fn parse_block(block: &str) -> Option<SseFrame> {
    let mut event = None;
    let mut data_lines: Vec<&str> = Vec::new();

    for line in block.lines() {
        // lines() strips \r only from \r\n endings; a block cut at the
        // blank line can leave one trailing \r on its last line
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.starts_with(':') {
            continue;
        }
        if let Some(value) = field_value(line, "event") {
            event = Some(value.to_string());
        } else if let Some(value) = field_value(line, "data") {
            data_lines.push(value);
        }
    }

    let data = data_lines.join("\n");
    // A frame with neither a name nor data is a keep-alive; drop it
    if event.is_none() && data.trim().is_empty() {
        return None;
    }
    Some(SseFrame { event, data })
}

fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(field)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}
