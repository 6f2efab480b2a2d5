//! Shared helpers for crate tests

use crate::types::WsMessage;
use tokio::sync::mpsc::UnboundedReceiver;

/// A decoded outbound envelope
pub(crate) struct Envelope {
    pub status: u32,
    pub headers: String,
    pub body_kind: u8,
    pub body: Vec<u8>,
}

impl Envelope {
    pub fn body_text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("text body")
    }

    pub fn header(&self, key: &str) -> Option<String> {
        self.headers.lines().find_map(|line| {
            let (k, v) = line.split_once(": ")?;
            (k == key).then(|| v.to_string())
        })
    }
}

/// Decode the binary envelope layout: status, header section, body kind,
/// body
pub(crate) fn decode_envelope(bytes: &[u8]) -> Envelope {
    let status = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
    let header_len = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
    let headers = String::from_utf8(bytes[8..8 + header_len].to_vec()).unwrap();
    let body_kind = bytes[8 + header_len];
    let body_start = 8 + header_len + 1 + 4;
    let body_len =
        u32::from_le_bytes(bytes[9 + header_len..body_start].try_into().unwrap()) as usize;
    let body = bytes[body_start..body_start + body_len].to_vec();
    Envelope {
        status,
        headers,
        body_kind,
        body,
    }
}

/// Pop the next queued message and decode it as an envelope
pub(crate) fn recv_envelope(receiver: &mut UnboundedReceiver<WsMessage>) -> Envelope {
    match receiver.try_recv() {
        Ok(WsMessage::Binary(bytes)) => decode_envelope(&bytes),
        other => panic!("expected binary envelope, got {other:?}"),
    }
}
