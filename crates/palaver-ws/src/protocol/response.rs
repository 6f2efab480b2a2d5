//! The binary response envelope
//!
//! Outbound-only: handlers build a response, serialize it once, and send the
//! bytes; the peer is responsible for decoding. Header keys keep the case
//! they were set with, and insertion order is preserved on the wire.

use indexmap::IndexMap;

/// Response body, either UTF-8 text or raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Binary(Vec<u8>),
}

impl Body {
    pub fn len(&self) -> usize {
        match self {
            Body::Text(text) => text.len(),
            Body::Binary(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Body::Text(_))
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Text(String::new())
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Vec<u8>> for Body {
    fn from(data: Vec<u8>) -> Self {
        Body::Binary(data)
    }
}

/// An outbound response envelope
///
/// Wire layout, all integers little-endian:
/// status `u32` | header section length `u32` | header section bytes |
/// body kind `u8` (1 text, 0 binary) | body length `u32` | body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u32,
    headers: IndexMap<String, String>,
    pub body: Body,
}

impl Response {
    pub fn new(status: u32, body: impl Into<Body>) -> Self {
        Self {
            status,
            headers: IndexMap::new(),
            body: body.into(),
        }
    }

    /// Insert a header, consuming and returning the response for chaining
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.headers.contains_key(key)
    }

    pub fn delete(&mut self, key: &str) -> Option<String> {
        self.headers.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str)
    }

    /// Render the header section: `key: value\r\n` pairs, no trailing blank
    /// line
    pub fn serialize_headers(&self) -> String {
        let mut section = String::new();
        for (key, value) in &self.headers {
            section.push_str(key);
            section.push_str(": ");
            section.push_str(value);
            section.push_str("\r\n");
        }
        section
    }

    /// Serialize the envelope into its binary wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        let header_bytes = self.serialize_headers().into_bytes();
        let (body_kind, body_bytes): (u8, &[u8]) = match &self.body {
            Body::Text(text) => (1, text.as_bytes()),
            Body::Binary(data) => (0, data.as_slice()),
        };

        let mut buffer =
            Vec::with_capacity(4 + 4 + header_bytes.len() + 1 + 4 + body_bytes.len());
        buffer.extend_from_slice(&self.status.to_le_bytes());
        buffer.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
        buffer.extend_from_slice(&header_bytes);
        buffer.push(body_kind);
        buffer.extend_from_slice(&(body_bytes.len() as u32).to_le_bytes());
        buffer.extend_from_slice(body_bytes);
        buffer
    }
}
