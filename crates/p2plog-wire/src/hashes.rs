//! Classification of field names that carry hash semantics.
//!
//! The wire carries these fields as large little-endian integers, which
//! is indistinguishable from any other 256-bit quantity; the names known
//! to be hashes are itemized here so projection can render them in the
//! conventional byte-reversed display order.

/// How a field name relates to hash display conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    /// The field is a single 256-bit hash.
    Scalar,
    /// The field is an ordered sequence of 256-bit hashes.
    Vector,
    /// No hash semantics; project the value as-is.
    Plain,
}

/// Lookup seam for the classification table.
///
/// Classification is global and keyed by name alone, matching the
/// established capture output. A name shared by an unrelated message
/// type gets converted too; changing the key to (message type, name)
/// would be a behavior change and lives behind this trait if it ever
/// happens.
pub trait HashFields {
    fn classify(&self, name: &str) -> HashKind;
}

const SCALAR_HASH_FIELDS: &[&str] = &[
    "blockhash",
    "block_hash",
    "hash", // collides across inventory entries, outpoints, and others
    "hashMerkleRoot",
    "hashPrevBlock",
    "hashstop",
    "prev_header",
    "sha256",
    "stop_hash",
];

const VECTOR_HASH_FIELDS: &[&str] = &[
    "hashes",
    "headers", // collides with the headers message's record vector
    "vHave",
    "vHash",
];

/// The stock classification tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardHashFields;

impl HashFields for StandardHashFields {
    fn classify(&self, name: &str) -> HashKind {
        if SCALAR_HASH_FIELDS.contains(&name) {
            HashKind::Scalar
        } else if VECTOR_HASH_FIELDS.contains(&name) {
            HashKind::Vector
        } else {
            HashKind::Plain
        }
    }
}
