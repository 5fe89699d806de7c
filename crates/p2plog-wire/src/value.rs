/// A 256-bit hash in its native storage byte order.
///
/// The protocol carries these as little-endian 256-bit integers; the
/// conventional display orientation reverses the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uint256(pub [u8; 32]);

impl Uint256 {
    /// Lowercase hex in the conventional (byte-reversed) display order.
    pub fn to_display_hex(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        hex::encode(bytes)
    }

    /// Lowercase hex in storage order, for fields not known to be hashes.
    pub fn to_storage_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 32]> for Uint256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// One decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    UInt(u64),
    Int(i64),
    Bool(bool),
    Uint256(Uint256),
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<FieldValue>),
    Record(DecodedMessage),
}

/// A decoded message: named fields in the order the grammar declares them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedMessage {
    fields: Vec<(&'static str, FieldValue)>,
}

impl DecodedMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Order of insertion is the declared field order.
    pub fn push(&mut self, name: &'static str, value: FieldValue) {
        self.fields.push((name, value));
    }

    pub fn fields(&self) -> &[(&'static str, FieldValue)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
