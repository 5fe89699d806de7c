//! Grammars for the known message family.
//!
//! Most messages are purely declarative [`MessageSchema`] tables walked by
//! the generic decoder. Transactions (segwit marker/flag), blocks, and
//! headers (trailing zero tx count per header) need a few lines of custom
//! decoding and implement [`Decode`] directly.
//!
//! Field names follow the protocol's conventional serialization names so
//! the emitted documents line up with the established capture output.

use crate::cursor::Cursor;
use crate::error::Result;
use crate::schema::{Decode, FieldKind, MessageSchema};
use crate::value::{DecodedMessage, FieldValue};

/// Network address without a timestamp, as embedded in `version`.
pub static NET_ADDR: MessageSchema = MessageSchema {
    msgtype: "netaddr",
    fields: &[
        ("nServices", FieldKind::U64),
        ("ip", FieldKind::FixedBytes(16)),
        ("port", FieldKind::U16Be),
    ],
};

/// Network address with a timestamp, as relayed in `addr`.
pub static TIMED_NET_ADDR: MessageSchema = MessageSchema {
    msgtype: "netaddr+time",
    fields: &[
        ("time", FieldKind::U32),
        ("nServices", FieldKind::U64),
        ("ip", FieldKind::FixedBytes(16)),
        ("port", FieldKind::U16Be),
    ],
};

/// Inventory entry: a type tag plus a hash.
pub static INV_ITEM: MessageSchema = MessageSchema {
    msgtype: "invitem",
    fields: &[("type", FieldKind::U32), ("hash", FieldKind::Hash)],
};

/// Block locator: protocol version plus a thinning trail of block hashes.
pub static BLOCK_LOCATOR: MessageSchema = MessageSchema {
    msgtype: "locator",
    fields: &[
        ("nVersion", FieldKind::I32),
        ("vHave", FieldKind::Array(&FieldKind::Hash)),
    ],
};

/// The 80-byte block header.
pub static BLOCK_HEADER: MessageSchema = MessageSchema {
    msgtype: "blockheader",
    fields: &[
        ("nVersion", FieldKind::I32),
        ("hashPrevBlock", FieldKind::Hash),
        ("hashMerkleRoot", FieldKind::Hash),
        ("nTime", FieldKind::U32),
        ("nBits", FieldKind::U32),
        ("nNonce", FieldKind::U32),
    ],
};

static OUT_POINT: MessageSchema = MessageSchema {
    msgtype: "outpoint",
    fields: &[("hash", FieldKind::Hash), ("n", FieldKind::U32)],
};

static TX_IN: MessageSchema = MessageSchema {
    msgtype: "txin",
    fields: &[
        ("prevout", FieldKind::Struct(&OUT_POINT)),
        ("scriptSig", FieldKind::VarBytes),
        ("nSequence", FieldKind::U32),
    ],
};

static TX_OUT: MessageSchema = MessageSchema {
    msgtype: "txout",
    fields: &[
        ("nValue", FieldKind::I64),
        ("scriptPubKey", FieldKind::VarBytes),
    ],
};

pub static ADDR: MessageSchema = MessageSchema {
    msgtype: "addr",
    fields: &[("addrs", FieldKind::Array(&FieldKind::Struct(&TIMED_NET_ADDR)))],
};

pub static INV: MessageSchema = MessageSchema {
    msgtype: "inv",
    fields: &[("inv", FieldKind::Array(&FieldKind::Struct(&INV_ITEM)))],
};

pub static GETDATA: MessageSchema = MessageSchema {
    msgtype: "getdata",
    fields: &[("inv", FieldKind::Array(&FieldKind::Struct(&INV_ITEM)))],
};

pub static NOTFOUND: MessageSchema = MessageSchema {
    msgtype: "notfound",
    fields: &[("inv", FieldKind::Array(&FieldKind::Struct(&INV_ITEM)))],
};

pub static GETBLOCKS: MessageSchema = MessageSchema {
    msgtype: "getblocks",
    fields: &[
        ("locator", FieldKind::Struct(&BLOCK_LOCATOR)),
        ("hashstop", FieldKind::Hash),
    ],
};

pub static GETHEADERS: MessageSchema = MessageSchema {
    msgtype: "getheaders",
    fields: &[
        ("locator", FieldKind::Struct(&BLOCK_LOCATOR)),
        ("hashstop", FieldKind::Hash),
    ],
};

pub static PING: MessageSchema = MessageSchema {
    msgtype: "ping",
    fields: &[("nonce", FieldKind::U64)],
};

pub static PONG: MessageSchema = MessageSchema {
    msgtype: "pong",
    fields: &[("nonce", FieldKind::U64)],
};

pub static FEEFILTER: MessageSchema = MessageSchema {
    msgtype: "feefilter",
    fields: &[("feerate", FieldKind::U64)],
};

pub static SENDCMPCT: MessageSchema = MessageSchema {
    msgtype: "sendcmpct",
    fields: &[("announce", FieldKind::Bool), ("version", FieldKind::U64)],
};

pub static VERACK: MessageSchema = MessageSchema {
    msgtype: "verack",
    fields: &[],
};

pub static GETADDR: MessageSchema = MessageSchema {
    msgtype: "getaddr",
    fields: &[],
};

pub static MEMPOOL: MessageSchema = MessageSchema {
    msgtype: "mempool",
    fields: &[],
};

pub static SENDHEADERS: MessageSchema = MessageSchema {
    msgtype: "sendheaders",
    fields: &[],
};

pub static SENDADDRV2: MessageSchema = MessageSchema {
    msgtype: "sendaddrv2",
    fields: &[],
};

pub static WTXIDRELAY: MessageSchema = MessageSchema {
    msgtype: "wtxidrelay",
    fields: &[],
};

static VERSION_FIXED: MessageSchema = MessageSchema {
    msgtype: "version",
    fields: &[
        ("nVersion", FieldKind::I32),
        ("nServices", FieldKind::U64),
        ("nTime", FieldKind::I64),
        ("addrTo", FieldKind::Struct(&NET_ADDR)),
        ("addrFrom", FieldKind::Struct(&NET_ADDR)),
        ("nNonce", FieldKind::U64),
        ("strSubVer", FieldKind::VarStr),
        ("nStartingHeight", FieldKind::I32),
    ],
};

/// `version` handshake message.
///
/// The trailing relay flag only exists for peers past protocol 70001, so
/// it is read only when bytes remain.
pub struct VersionDecoder;

impl Decode for VersionDecoder {
    fn decode(&self, payload: &[u8]) -> Result<(DecodedMessage, usize)> {
        let mut cur = Cursor::new(payload);
        let mut msg = DecodedMessage::new();
        VERSION_FIXED.decode_into(&mut cur, &mut msg)?;
        if cur.remaining() > 0 {
            msg.push("relay", FieldValue::Bool(cur.read_bool()?));
        }
        Ok((msg, cur.consumed()))
    }
}

/// Transaction decoder handling both the legacy layout and the segwit
/// extension (zero input-count marker, flag byte, per-input witness
/// stacks before the lock time).
pub struct TxDecoder;

impl TxDecoder {
    pub(crate) fn decode_tx(cur: &mut Cursor<'_>) -> Result<DecodedMessage> {
        let mut msg = DecodedMessage::new();
        msg.push("nVersion", FieldValue::Int(i64::from(cur.read_i32_le()?)));

        let mut in_count = cur.read_compact_size()?;
        let mut flags = 0u8;
        if in_count == 0 {
            // Segwit marker: real input count follows the flag byte.
            flags = cur.read_u8()?;
            in_count = cur.read_compact_size()?;
        }

        let mut vin = Vec::new();
        for _ in 0..in_count {
            let mut txin = DecodedMessage::new();
            TX_IN.decode_into(cur, &mut txin)?;
            vin.push(FieldValue::Record(txin));
        }
        msg.push("vin", FieldValue::Array(vin));

        let out_count = cur.read_compact_size()?;
        let mut vout = Vec::new();
        for _ in 0..out_count {
            let mut txout = DecodedMessage::new();
            TX_OUT.decode_into(cur, &mut txout)?;
            vout.push(FieldValue::Record(txout));
        }
        msg.push("vout", FieldValue::Array(vout));

        if flags != 0 {
            let mut vtxinwit = Vec::new();
            for _ in 0..in_count {
                let stack_len = cur.read_compact_size()?;
                let mut stack = Vec::new();
                for _ in 0..stack_len {
                    stack.push(FieldValue::Bytes(cur.read_var_bytes()?));
                }
                let mut script_witness = DecodedMessage::new();
                script_witness.push("stack", FieldValue::Array(stack));
                let mut txinwit = DecodedMessage::new();
                txinwit.push("scriptWitness", FieldValue::Record(script_witness));
                vtxinwit.push(FieldValue::Record(txinwit));
            }
            let mut wit = DecodedMessage::new();
            wit.push("vtxinwit", FieldValue::Array(vtxinwit));
            msg.push("wit", FieldValue::Record(wit));
        }

        msg.push("nLockTime", FieldValue::UInt(u64::from(cur.read_u32_le()?)));
        Ok(msg)
    }
}

impl Decode for TxDecoder {
    fn decode(&self, payload: &[u8]) -> Result<(DecodedMessage, usize)> {
        let mut cur = Cursor::new(payload);
        let msg = Self::decode_tx(&mut cur)?;
        Ok((msg, cur.consumed()))
    }
}

/// Block decoder: the 80-byte header followed by its transactions.
pub struct BlockDecoder;

impl Decode for BlockDecoder {
    fn decode(&self, payload: &[u8]) -> Result<(DecodedMessage, usize)> {
        let mut cur = Cursor::new(payload);
        let mut msg = DecodedMessage::new();
        BLOCK_HEADER.decode_into(&mut cur, &mut msg)?;

        let tx_count = cur.read_compact_size()?;
        let mut vtx = Vec::new();
        for _ in 0..tx_count {
            vtx.push(FieldValue::Record(TxDecoder::decode_tx(&mut cur)?));
        }
        msg.push("vtx", FieldValue::Array(vtx));
        Ok((msg, cur.consumed()))
    }
}

/// Headers announcement decoder.
///
/// Each entry on the wire is a block header plus a tx count that is
/// always zero for announcements; the count still has to be consumed (and
/// any transactions a nonstandard peer stuffed in are parsed and dropped).
pub struct HeadersDecoder;

impl Decode for HeadersDecoder {
    fn decode(&self, payload: &[u8]) -> Result<(DecodedMessage, usize)> {
        let mut cur = Cursor::new(payload);
        let count = cur.read_compact_size()?;
        let mut headers = Vec::new();
        for _ in 0..count {
            let mut header = DecodedMessage::new();
            BLOCK_HEADER.decode_into(&mut cur, &mut header)?;
            let tx_count = cur.read_compact_size()?;
            for _ in 0..tx_count {
                let _ = TxDecoder::decode_tx(&mut cur)?;
            }
            headers.push(FieldValue::Record(header));
        }
        let mut msg = DecodedMessage::new();
        msg.push("headers", FieldValue::Array(headers));
        Ok((msg, cur.consumed()))
    }
}
