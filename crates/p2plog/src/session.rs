use std::io::Read;
use std::path::Path;

use p2plog_frame::{CaptureReader, FrameError};
use p2plog_wire::{project, HashFields, Outcome, Registry, WireError};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Traffic direction of one capture source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[serde(rename = "sent")]
    Sent,
    #[serde(rename = "recv")]
    Received,
}

impl Direction {
    /// Capture files are conventionally named by direction: anything with
    /// "recv" in the file stem is inbound, everything else outbound.
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem.contains("recv") {
            Self::Received
        } else {
            Self::Sent
        }
    }
}

/// One decoded frame, ready for JSON emission.
///
/// `body` is absent for empty payloads; skipped frames produce no record
/// at all.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub msgtype: String,
    pub direction: Direction,
    pub time: u64,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Aggregates records across capture sources and orders them by time.
pub struct Session<'a> {
    registry: &'a Registry,
    hash_fields: &'a dyn HashFields,
    records: Vec<Record>,
}

impl<'a> Session<'a> {
    pub fn new(registry: &'a Registry, hash_fields: &'a dyn HashFields) -> Self {
        Self {
            registry,
            hash_fields,
            records: Vec::new(),
        }
    }

    /// Decode every frame of one source, tagging records with `direction`.
    ///
    /// Frames without a registered grammar are skipped byte-exactly; any
    /// truncation, grammar drift, or I/O failure aborts the whole run.
    pub fn add_source<R: Read>(
        &mut self,
        source: R,
        direction: Direction,
    ) -> Result<(), SessionError> {
        let mut reader = CaptureReader::new(source);
        while let Some(frame) = reader.next_frame()? {
            match self.registry.dispatch(&frame)? {
                Outcome::Decoded(msg) => {
                    let size = frame.payload.len() as u32;
                    let body = (size > 0).then(|| project(&msg, self.hash_fields));
                    self.records.push(Record {
                        msgtype: frame.tag_lossy(),
                        direction,
                        time: frame.time,
                        size,
                        body,
                    });
                }
                Outcome::Skipped => {
                    debug!(msgtype = %frame.tag_lossy(), time = frame.time, "skipped frame");
                }
            }
        }
        Ok(())
    }

    /// All collected records, stably sorted ascending by capture time.
    pub fn finish(mut self) -> Vec<Record> {
        // sort_by_key is stable: equal times keep input order.
        self.records.sort_by_key(|record| record.time);
        self.records
    }
}
