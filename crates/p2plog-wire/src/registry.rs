use std::collections::HashMap;

use p2plog_frame::Frame;
use tracing::debug;

use crate::error::{Result, WireError};
use crate::messages;
use crate::schema::Decode;
use crate::value::DecodedMessage;

/// Result of dispatching one frame.
///
/// The skip path is an explicit branch, not an error: a capture may hold
/// message types this build has no grammar for.
#[derive(Debug)]
pub enum Outcome {
    /// The payload decoded fully against its registered grammar.
    Decoded(DecodedMessage),
    /// No grammar is registered for the frame's message type.
    Skipped,
}

/// Tag-keyed registry of payload decoders.
///
/// Keys are the null-trimmed message type field. Lookup is pure; the
/// registry is built once at startup and never mutated afterwards.
pub struct Registry {
    decoders: HashMap<&'static [u8], &'static dyn Decode>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry holding grammars for the standard message family.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(b"version", &messages::VersionDecoder);
        registry.register(b"verack", &messages::VERACK);
        registry.register(b"addr", &messages::ADDR);
        registry.register(b"inv", &messages::INV);
        registry.register(b"getdata", &messages::GETDATA);
        registry.register(b"notfound", &messages::NOTFOUND);
        registry.register(b"getblocks", &messages::GETBLOCKS);
        registry.register(b"getheaders", &messages::GETHEADERS);
        registry.register(b"headers", &messages::HeadersDecoder);
        registry.register(b"block", &messages::BlockDecoder);
        registry.register(b"tx", &messages::TxDecoder);
        registry.register(b"ping", &messages::PING);
        registry.register(b"pong", &messages::PONG);
        registry.register(b"getaddr", &messages::GETADDR);
        registry.register(b"mempool", &messages::MEMPOOL);
        registry.register(b"sendheaders", &messages::SENDHEADERS);
        registry.register(b"sendaddrv2", &messages::SENDADDRV2);
        registry.register(b"sendcmpct", &messages::SENDCMPCT);
        registry.register(b"feefilter", &messages::FEEFILTER);
        registry.register(b"wtxidrelay", &messages::WTXIDRELAY);
        registry
    }

    /// Register (or replace) the decoder for a message type.
    pub fn register(&mut self, tag: &'static [u8], decoder: &'static dyn Decode) {
        self.decoders.insert(tag, decoder);
    }

    /// Look up the decoder for a tag. Absence means "skip", not failure.
    pub fn lookup(&self, tag: &[u8]) -> Option<&dyn Decode> {
        self.decoders.get(tag).copied()
    }

    /// Number of registered message types.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode one frame's payload against its registered grammar.
    ///
    /// A decoder that consumes anything other than the frame's declared
    /// payload length signals grammar drift and fails the whole run.
    pub fn dispatch(&self, frame: &Frame) -> Result<Outcome> {
        let Some(decoder) = self.lookup(frame.tag()) else {
            debug!(msgtype = %frame.tag_lossy(), "no grammar registered, skipping frame");
            return Ok(Outcome::Skipped);
        };

        let payload = frame.payload.as_ref();
        let (msg, consumed) = decoder.decode(payload)?;
        if consumed != payload.len() {
            return Err(WireError::LengthMismatch {
                msgtype: frame.tag_lossy(),
                declared: payload.len() as u32,
                consumed,
            });
        }
        Ok(Outcome::Decoded(msg))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
