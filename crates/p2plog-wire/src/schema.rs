use crate::cursor::Cursor;
use crate::error::Result;
use crate::value::{DecodedMessage, FieldValue};

/// A payload decoder registered for one message type.
///
/// Returns the decoded field tree and the number of bytes consumed. The
/// dispatcher compares the consumed count against the frame's declared
/// length; the decoder itself never needs to know the frame.
pub trait Decode: Send + Sync {
    fn decode(&self, payload: &[u8]) -> Result<(DecodedMessage, usize)>;
}

/// The wire kind of a single field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    U8,
    U16,
    /// Big-endian u16 (network ports).
    U16Be,
    U32,
    U64,
    I32,
    I64,
    Bool,
    /// 256-bit hash, carried as a little-endian large integer.
    Hash,
    /// CompactSize integer.
    VarInt,
    /// CompactSize length prefix plus raw bytes.
    VarBytes,
    /// CompactSize length prefix plus UTF-8 text.
    VarStr,
    /// Exactly `n` raw bytes.
    FixedBytes(usize),
    /// CompactSize element count, then that many elements.
    Array(&'static FieldKind),
    /// A nested record with its own field list.
    Struct(&'static MessageSchema),
}

/// Declarative grammar for one message type: an ordered field list.
///
/// The field order here is the wire order and also the projection order.
#[derive(Debug)]
pub struct MessageSchema {
    pub msgtype: &'static str,
    pub fields: &'static [(&'static str, FieldKind)],
}

impl MessageSchema {
    /// Decode this schema's fields from the cursor into `msg`.
    ///
    /// Exposed within the crate so composite decoders (transactions,
    /// blocks, headers) can reuse schema fragments.
    pub(crate) fn decode_into(&self, cur: &mut Cursor<'_>, msg: &mut DecodedMessage) -> Result<()> {
        for (name, kind) in self.fields {
            let value = decode_kind(kind, name, cur)?;
            msg.push(name, value);
        }
        Ok(())
    }
}

impl Decode for MessageSchema {
    fn decode(&self, payload: &[u8]) -> Result<(DecodedMessage, usize)> {
        let mut cur = Cursor::new(payload);
        let mut msg = DecodedMessage::new();
        self.decode_into(&mut cur, &mut msg)?;
        Ok((msg, cur.consumed()))
    }
}

fn decode_kind(kind: &FieldKind, field: &'static str, cur: &mut Cursor<'_>) -> Result<FieldValue> {
    Ok(match kind {
        FieldKind::U8 => FieldValue::UInt(u64::from(cur.read_u8()?)),
        FieldKind::U16 => FieldValue::UInt(u64::from(cur.read_u16_le()?)),
        FieldKind::U16Be => FieldValue::UInt(u64::from(cur.read_u16_be()?)),
        FieldKind::U32 => FieldValue::UInt(u64::from(cur.read_u32_le()?)),
        FieldKind::U64 => FieldValue::UInt(cur.read_u64_le()?),
        FieldKind::I32 => FieldValue::Int(i64::from(cur.read_i32_le()?)),
        FieldKind::I64 => FieldValue::Int(cur.read_i64_le()?),
        FieldKind::Bool => FieldValue::Bool(cur.read_bool()?),
        FieldKind::Hash => FieldValue::Uint256(cur.read_u256()?),
        FieldKind::VarInt => FieldValue::UInt(cur.read_compact_size()?),
        FieldKind::VarBytes => FieldValue::Bytes(cur.read_var_bytes()?),
        FieldKind::VarStr => FieldValue::Str(cur.read_var_str(field)?),
        FieldKind::FixedBytes(n) => FieldValue::Bytes(cur.read_bytes(*n)?),
        FieldKind::Array(elem) => {
            let count = cur.read_compact_size()?;
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(decode_kind(elem, field, cur)?);
            }
            FieldValue::Array(items)
        }
        FieldKind::Struct(schema) => {
            let mut nested = DecodedMessage::new();
            schema.decode_into(cur, &mut nested)?;
            FieldValue::Record(nested)
        }
    })
}
