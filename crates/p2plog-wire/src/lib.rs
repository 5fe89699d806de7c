//! Message grammars and JSON projection for P2P capture payloads.
//!
//! Every registered message type declares an ordered field grammar; a
//! frame's payload is decoded against the grammar looked up by its type
//! tag, and the resulting field tree is projected into a generic JSON
//! document. Fields whose names are known to carry 256-bit hashes are
//! rendered in the conventional byte-reversed hex orientation.

pub mod cursor;
pub mod error;
pub mod hashes;
pub mod messages;
pub mod project;
pub mod registry;
pub mod schema;
pub mod value;

pub use cursor::Cursor;
pub use error::{Result, WireError};
pub use hashes::{HashFields, HashKind, StandardHashFields};
pub use project::project;
pub use registry::{Outcome, Registry};
pub use schema::{Decode, FieldKind, MessageSchema};
pub use value::{DecodedMessage, FieldValue, Uint256};
