/// Errors that can occur while decoding a message payload.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The payload ended before the grammar was satisfied.
    #[error("payload ended early (needed {needed} more bytes, {remaining} left)")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// The decoder consumed a different byte count than the frame declared.
    ///
    /// This means the registered grammar has drifted from the writer's
    /// serialization and the whole decode is untrustworthy.
    #[error("{msgtype}: decoded {consumed} bytes but frame declared {declared}")]
    LengthMismatch {
        msgtype: String,
        declared: u32,
        consumed: usize,
    },

    /// A string field held bytes that are not valid UTF-8.
    #[error("field {0:?} is not valid UTF-8")]
    Utf8(&'static str),
}

pub type Result<T> = std::result::Result<T, WireError>;
