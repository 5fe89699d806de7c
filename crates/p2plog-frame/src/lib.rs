//! Framing layer for binary P2P message capture files.
//!
//! A capture file is a back-to-back sequence of frames, each with a
//! 24-byte fixed header:
//! - An 8-byte little-endian capture timestamp (microseconds)
//! - A 12-byte null-padded ASCII message type
//! - A 4-byte little-endian payload length
//!
//! The payload is carried verbatim; this layer never interprets it.

pub mod codec;
pub mod error;
pub mod reader;

pub use codec::{
    decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD, HEADER_SIZE, MSGTYPE_SIZE,
};
pub use error::{FrameError, Result};
pub use reader::CaptureReader;
