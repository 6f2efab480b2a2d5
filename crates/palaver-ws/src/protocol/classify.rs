//! The frame classifier
//!
//! WebSocket frames carry both structured protocol messages and raw payloads
//! such as media, so the classifier is conservative about false positives:
//! any byte sequence that does not parse into a non-empty header block is
//! passed through unchanged as opaque binary, and no input may panic here.

use super::header::HeaderBlock;
use once_cell::sync::Lazy;
use regex::Regex;

static HTTP_REQUEST_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z]+\s+/\S*\s+HTTP/\d\.\d$").expect("request line regex is valid")
});

static CUSTOM_REQUEST_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z]+\s+/\S*\s+Version/\d\.\d$").expect("request line regex is valid")
});

static HEADER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([!#$%&'*+\-.^_`|~0-9A-Za-z]+):\s*(.+)$").expect("header line regex is valid")
});

/// One discrete WebSocket message payload
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A structured header block
    Header(HeaderBlock),
    /// Opaque bytes, passed through untouched
    Binary(Vec<u8>),
}

impl Frame {
    pub fn as_header(&self) -> Option<&HeaderBlock> {
        match self {
            Frame::Header(block) => Some(block),
            Frame::Binary(_) => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Frame::Binary(_))
    }
}

/// Classify a raw payload as a header block or opaque binary
///
/// Line endings are normalized to `\n`. Two request-line grammars are tried
/// against the first line: `METHOD /path HTTP/x.y` and the custom
/// `METHOD /path Version/x.y` variant, both case-insensitive. Subsequent
/// lines must be `token: value` pairs; the first blank line starts the body,
/// and a line matching neither grammar stops parsing with the remainder
/// dropped.
pub fn classify(raw: Vec<u8>) -> Frame {
    let text = match std::str::from_utf8(&raw) {
        Ok(text) => text,
        Err(_) => return Frame::Binary(raw),
    };

    let normalized = text.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    if lines.is_empty() {
        return Frame::Binary(raw);
    }

    let mut block = HeaderBlock::new();
    let mut rest = &lines[..];

    let first = lines[0].trim();
    if HTTP_REQUEST_LINE.is_match(first) || CUSTOM_REQUEST_LINE.is_match(first) {
        block.request_line = first.to_string();
        rest = &lines[1..];
    }

    let mut body: Option<Vec<&str>> = None;
    for &line in rest {
        if let Some(body_lines) = body.as_mut() {
            body_lines.push(line);
            continue;
        }
        if line.trim().is_empty() {
            body = Some(Vec::new());
            continue;
        }
        match HEADER_LINE.captures(line) {
            Some(caps) => {
                block.set(&caps[1], &caps[2]);
            }
            None => break,
        }
    }
    block.content = body.map(|body_lines| body_lines.join("\n")).unwrap_or_default();

    if block.is_empty() {
        Frame::Binary(raw)
    } else {
        Frame::Header(block)
    }
}
