/// Errors that can occur while reading or writing capture frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The source ended mid-header or before `length` payload bytes.
    #[error("capture truncated mid-frame")]
    Truncated,

    /// The declared payload length exceeds the configured maximum.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The message type field does not fit the 12-byte header slot.
    #[error("message type must be 1-12 ASCII bytes without NUL")]
    BadMsgType,

    /// An I/O error occurred while reading or writing frames.
    #[error("capture I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
