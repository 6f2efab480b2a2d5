//! The header block model
//!
//! An ordered header bag plus a request line and a text body; the unit
//! exchanged in both directions over the frame channel. Keys are normalized
//! to lower case at insertion time, which makes every lookup
//! case-insensitive; insertion order is preserved for re-serialization.

use indexmap::IndexMap;

/// A parsed (or programmatically built) header block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    /// The request line, empty when the frame carried none
    pub request_line: String,
    headers: IndexMap<String, String>,
    /// Body text following the blank separator line
    pub content: String,
}

impl HeaderBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_line(request_line: impl Into<String>) -> Self {
        Self {
            request_line: request_line.into(),
            ..Self::default()
        }
    }

    /// Insert a header, replacing any previous value under the same key
    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) -> &mut Self {
        self.headers
            .insert(key.as_ref().to_lowercase(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.headers.contains_key(&key.to_lowercase())
    }

    /// Remove a header, preserving the order of the remaining entries
    pub fn delete(&mut self, key: &str) -> Option<String> {
        self.headers.shift_remove(&key.to_lowercase())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str)
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// True when the block carries no request line, no headers, and no body
    pub fn is_empty(&self) -> bool {
        self.request_line.is_empty() && self.headers.is_empty() && self.content.is_empty()
    }

    /// Render the block in its wire text form
    pub fn serialize_text(&self) -> String {
        let mut text = String::new();
        if !self.request_line.is_empty() {
            text.push_str(&self.request_line);
            text.push_str("\r\n");
        }
        for (key, value) in &self.headers {
            text.push_str(key);
            text.push_str(": ");
            text.push_str(value);
            text.push_str("\r\n");
        }
        text.push_str("\r\n");
        if !self.content.is_empty() {
            text.push_str(&self.content);
        }
        text
    }

    pub fn serialize_bytes(&self) -> Vec<u8> {
        self.serialize_text().into_bytes()
    }
}
