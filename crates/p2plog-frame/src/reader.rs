use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{decode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete capture frames from any `Read` source.
///
/// Handles partial reads internally — callers always get complete frames.
/// EOF exactly at a frame boundary is normal termination; EOF anywhere
/// else is a truncated capture.
pub struct CaptureReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> CaptureReader<T> {
    /// Create a new capture reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new capture reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame.
    ///
    /// Returns `Ok(None)` when the source is exhausted exactly at a frame
    /// boundary, `Err(FrameError::Truncated)` when it ends mid-frame.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf, self.config.max_payload_size)? {
                trace!(
                    msgtype = %frame.tag_lossy(),
                    time = frame.time,
                    size = frame.payload.len(),
                    "frame decoded"
                );
                return Ok(Some(frame));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(FrameError::Truncated);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::{BufMut, BytesMut};

    use super::*;
    use crate::codec::{encode_frame, HEADER_SIZE};

    #[test]
    fn read_single_frame() {
        let mut wire = BytesMut::new();
        encode_frame(42, b"ping", b"12345678", &mut wire).unwrap();

        let mut reader = CaptureReader::new(Cursor::new(wire.to_vec()));
        let frame = reader.next_frame().unwrap().unwrap();

        assert_eq!(frame.time, 42);
        assert_eq!(frame.tag(), b"ping");
        assert_eq!(frame.payload.as_ref(), b"12345678");

        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn read_multiple_frames_then_clean_eof() {
        let mut wire = BytesMut::new();
        encode_frame(1, b"ping", b"one", &mut wire).unwrap();
        encode_frame(2, b"pong", b"two", &mut wire).unwrap();
        encode_frame(3, b"inv", b"three", &mut wire).unwrap();

        let mut reader = CaptureReader::new(Cursor::new(wire.to_vec()));

        let f1 = reader.next_frame().unwrap().unwrap();
        let f2 = reader.next_frame().unwrap().unwrap();
        let f3 = reader.next_frame().unwrap().unwrap();

        assert_eq!((f1.time, f1.payload.as_ref()), (1, b"one".as_ref()));
        assert_eq!((f2.time, f2.payload.as_ref()), (2, b"two".as_ref()));
        assert_eq!((f3.time, f3.payload.as_ref()), (3, b"three".as_ref()));
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn read_frame_with_large_payload() {
        let payload = vec![0xAB; 64 * 1024];
        let mut wire = BytesMut::new();
        encode_frame(9, b"block", &payload, &mut wire).unwrap();

        let mut reader = CaptureReader::new(Cursor::new(wire.to_vec()));
        let frame = reader.next_frame().unwrap().unwrap();

        assert_eq!(frame.tag(), b"block");
        assert_eq!(frame.payload.as_ref(), payload.as_slice());
    }

    #[test]
    fn partial_read_handling() {
        let mut wire = BytesMut::new();
        encode_frame(4, b"ping", b"slow", &mut wire).unwrap();

        let byte_reader = ByteByByteReader {
            bytes: wire.to_vec(),
            pos: 0,
        };
        let mut reader = CaptureReader::new(byte_reader);

        let frame = reader.next_frame().unwrap().unwrap();
        assert_eq!(frame.tag(), b"ping");
        assert_eq!(frame.payload.as_ref(), b"slow");
    }

    #[test]
    fn empty_source_is_clean_eof() {
        let mut reader = CaptureReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn eof_mid_header_is_truncated() {
        let mut reader = CaptureReader::new(Cursor::new(vec![0u8; 11]));
        let err = reader.next_frame().unwrap_err();
        assert!(matches!(err, FrameError::Truncated));
    }

    #[test]
    fn eof_mid_payload_is_truncated() {
        let mut partial = BytesMut::new();
        partial.put_u64_le(77);
        partial.put_slice(b"ping\0\0\0\0\0\0\0\0");
        partial.put_u32_le(16);
        partial.put_slice(b"only-part");

        let mut reader = CaptureReader::new(Cursor::new(partial.to_vec()));
        let err = reader.next_frame().unwrap_err();
        assert!(matches!(err, FrameError::Truncated));
    }

    #[test]
    fn truncated_last_frame_after_good_frames() {
        let mut wire = BytesMut::new();
        encode_frame(1, b"ping", b"ok", &mut wire).unwrap();
        let good = wire.len();
        encode_frame(2, b"pong", b"will be cut", &mut wire).unwrap();
        wire.truncate(good + HEADER_SIZE + 2);

        let mut reader = CaptureReader::new(Cursor::new(wire.to_vec()));
        assert!(reader.next_frame().unwrap().is_some());
        let err = reader.next_frame().unwrap_err();
        assert!(matches!(err, FrameError::Truncated));
    }

    #[test]
    fn oversized_frame_in_stream() {
        let mut wire = BytesMut::new();
        wire.put_u64_le(0);
        wire.put_slice(b"tx\0\0\0\0\0\0\0\0\0\0");
        wire.put_u32_le(1024);

        let cfg = FrameConfig {
            max_payload_size: 16,
        };
        let mut reader = CaptureReader::with_config(Cursor::new(wire.to_vec()), cfg);
        let err = reader.next_frame().unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[test]
    fn interrupted_read_retries() {
        let mut wire = BytesMut::new();
        encode_frame(8, b"ping", b"ok", &mut wire).unwrap();

        let source = InterruptedThenData {
            state: 0,
            bytes: wire.to_vec(),
            pos: 0,
        };
        let mut reader = CaptureReader::new(source);
        let frame = reader.next_frame().unwrap().unwrap();

        assert_eq!(frame.time, 8);
        assert_eq!(frame.payload.as_ref(), b"ok");
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = CaptureReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _ = reader.config();
        let _inner = reader.into_inner();
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            if buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }
}
