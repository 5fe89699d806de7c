use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: time (8) + msgtype (12) + length (4) = 24 bytes.
pub const HEADER_SIZE: usize = 24;

/// Width of the null-padded message type field.
pub const MSGTYPE_SIZE: usize = 12;

/// Default maximum payload size: 32 MiB.
///
/// Well above the largest legitimate protocol message; only a corrupt
/// length field gets anywhere near it.
pub const DEFAULT_MAX_PAYLOAD: usize = 32 * 1024 * 1024;

/// One captured message frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Capture timestamp, microseconds since the epoch.
    pub time: u64,
    /// Raw message type field, right-padded with NUL bytes.
    pub msgtype: [u8; MSGTYPE_SIZE],
    /// The message payload, uninterpreted.
    pub payload: Bytes,
}

impl Frame {
    /// The semantic message type: everything before the first NUL byte.
    pub fn tag(&self) -> &[u8] {
        let end = self
            .msgtype
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(MSGTYPE_SIZE);
        &self.msgtype[..end]
    }

    /// The message type as text, for logs and record metadata.
    pub fn tag_lossy(&self) -> String {
        String::from_utf8_lossy(self.tag()).into_owned()
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬──────────────┬───────────┬──────────────────┐
/// │ Time       │ Msgtype      │ Length    │ Payload          │
/// │ (8B LE)    │ (12B, NUL-   │ (4B LE)   │ (Length bytes)   │
/// │ micros     │  padded)     │           │                  │
/// └────────────┴──────────────┴───────────┴──────────────────┘
/// ```
pub fn encode_frame(time: u64, msgtype: &[u8], payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if msgtype.is_empty() || msgtype.len() > MSGTYPE_SIZE || msgtype.contains(&0) {
        return Err(FrameError::BadMsgType);
    }
    if payload.len() > u32::MAX as usize {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u64_le(time);
    dst.put_slice(msgtype);
    dst.put_bytes(0, MSGTYPE_SIZE - msgtype.len());
    dst.put_u32_le(payload.len() as u32);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Frame>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let time = u64::from_le_bytes(src[0..8].try_into().expect("8-byte slice"));
    let mut msgtype = [0u8; MSGTYPE_SIZE];
    msgtype.copy_from_slice(&src[8..20]);
    let payload_len = u32::from_le_bytes(src[20..24].try_into().expect("4-byte slice")) as usize;

    if payload_len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let total = HEADER_SIZE + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(Frame {
        time,
        msgtype,
        payload,
    }))
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 32 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
