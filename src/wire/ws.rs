//! RFC 6455 client-side WebSocket framing
//!
//! Just enough of the protocol for a log sink: the opening handshake, masked
//! text frames, and a close frame. Client frames are always masked.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

const OPCODE_TEXT: u8 = 0x81; // FIN + text
const OPCODE_CLOSE: u8 = 0x88; // FIN + close
const MASK_BIT: u8 = 0x80;

/// Sec-WebSocket-Key: base64 of 16 random bytes.
pub fn handshake_key() -> String {
    BASE64.encode(rand::random::<[u8; 16]>())
}

/// The opening handshake request. Ends with the blank line, ready to send.
pub fn handshake_request(host: &str, path: &str, key: &str) -> String {
    format!(
        "GET {path} HTTP/1.1\r\n\
         Host: {host}\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Key: {key}\r\n\
         Sec-WebSocket-Version: 13\r\n\
         \r\n"
    )
}

/// Whether the server accepted the upgrade (HTTP 101).
pub fn handshake_accepted(response: &str) -> bool {
    response.contains("HTTP/1.1 101")
}

/// One masked text frame carrying `payload`.
pub fn text_frame(payload: &str) -> Vec<u8> {
    text_frame_with_mask(payload, rand::random::<[u8; 4]>())
}

/// A masked close frame with an empty payload.
pub fn close_frame() -> Vec<u8> {
    let mask = rand::random::<[u8; 4]>();
    let mut frame = Vec::with_capacity(6);
    frame.push(OPCODE_CLOSE);
    frame.push(MASK_BIT); // zero-length payload
    frame.extend_from_slice(&mask);
    frame
}

// Split out so tests can frame with a known mask.
fn text_frame_with_mask(payload: &str, mask: [u8; 4]) -> Vec<u8> {
    let bytes = payload.as_bytes();
    let length = bytes.len();

    let mut frame = Vec::with_capacity(length + 14);
    frame.push(OPCODE_TEXT);

    // Payload length: 7 bits, or 126 + u16, or 127 + u64
    if length < 126 {
        frame.push(length as u8 | MASK_BIT);
    } else if length < 65536 {
        frame.push(126 | MASK_BIT);
        frame.extend_from_slice(&(length as u16).to_be_bytes());
    } else {
        frame.push(127 | MASK_BIT);
        frame.extend_from_slice(&(length as u64).to_be_bytes());
    }

    frame.extend_from_slice(&mask);
    frame.extend(
        bytes
            .iter()
            .enumerate()
            .map(|(i, byte)| byte ^ mask[i % 4]),
    );

    frame
}
