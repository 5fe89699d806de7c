use serde_json::{Map, Value};

use crate::hashes::{HashFields, HashKind};
use crate::value::{DecodedMessage, FieldValue};

/// Project a decoded message into a generic JSON document.
///
/// Pure and deterministic: the same tree always yields the same document.
/// Field order follows the grammar's declared order (`serde_json` is
/// built with `preserve_order`). No field is dropped; the only rewriting
/// is the hash display conversion keyed by field name.
pub fn project(msg: &DecodedMessage, hash_fields: &dyn HashFields) -> Value {
    let mut map = Map::with_capacity(msg.fields().len());
    for (name, value) in msg.fields() {
        map.insert((*name).to_string(), project_field(name, value, hash_fields));
    }
    Value::Object(map)
}

fn project_field(name: &str, value: &FieldValue, hash_fields: &dyn HashFields) -> Value {
    match (hash_fields.classify(name), value) {
        (HashKind::Scalar, FieldValue::Uint256(hash)) => Value::String(hash.to_display_hex()),
        (HashKind::Vector, FieldValue::Array(items))
            if matches!(items.first(), Some(FieldValue::Uint256(_))) =>
        {
            Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        FieldValue::Uint256(hash) => Value::String(hash.to_display_hex()),
                        other => project_value(other, hash_fields),
                    })
                    .collect(),
            )
        }
        // A listed name whose value is not the large-int representation
        // passes through untouched.
        (_, other) => project_value(other, hash_fields),
    }
}

fn project_value(value: &FieldValue, hash_fields: &dyn HashFields) -> Value {
    match value {
        FieldValue::UInt(n) => Value::from(*n),
        FieldValue::Int(n) => Value::from(*n),
        FieldValue::Bool(b) => Value::from(*b),
        FieldValue::Uint256(hash) => Value::String(hash.to_storage_hex()),
        FieldValue::Bytes(bytes) => Value::String(hex::encode(bytes)),
        FieldValue::Str(text) => Value::from(text.as_str()),
        FieldValue::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| project_value(item, hash_fields))
                .collect(),
        ),
        FieldValue::Record(nested) => project(nested, hash_fields),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::hashes::StandardHashFields;
    use crate::value::Uint256;

    fn counting_hash() -> Uint256 {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i + 1) as u8;
        }
        Uint256(bytes)
    }

    #[test]
    fn scalar_hash_renders_reversed() {
        let mut msg = DecodedMessage::new();
        msg.push("hashstop", FieldValue::Uint256(counting_hash()));

        let doc = project(&msg, &StandardHashFields);
        let rendered = doc["hashstop"].as_str().unwrap();
        assert!(rendered.starts_with("201f1e1d"));
        assert!(rendered.ends_with("04030201"));
        assert_eq!(rendered.len(), 64);
    }

    #[test]
    fn hash_named_field_with_other_representation_is_untouched() {
        let mut msg = DecodedMessage::new();
        msg.push("hash", FieldValue::Str("already-text".into()));
        msg.push("hashes", FieldValue::Array(vec![FieldValue::UInt(1)]));

        let doc = project(&msg, &StandardHashFields);
        assert_eq!(doc["hash"], json!("already-text"));
        assert_eq!(doc["hashes"], json!([1]));
    }

    #[test]
    fn vector_hash_converts_every_element() {
        let mut msg = DecodedMessage::new();
        msg.push(
            "vHave",
            FieldValue::Array(vec![
                FieldValue::Uint256(counting_hash()),
                FieldValue::Uint256(Uint256([0xff; 32])),
            ]),
        );

        let doc = project(&msg, &StandardHashFields);
        let have = doc["vHave"].as_array().unwrap();
        assert_eq!(have.len(), 2);
        assert!(have[0].as_str().unwrap().starts_with("201f"));
        assert_eq!(have[1].as_str().unwrap(), "ff".repeat(32));
    }

    #[test]
    fn bytes_render_as_lowercase_hex() {
        let mut msg = DecodedMessage::new();
        msg.push("scriptSig", FieldValue::Bytes(vec![0x00, 0xab, 0xff]));

        let doc = project(&msg, &StandardHashFields);
        assert_eq!(doc["scriptSig"], json!("00abff"));
    }

    #[test]
    fn nested_records_keep_declared_order() {
        let mut inner = DecodedMessage::new();
        inner.push("type", FieldValue::UInt(2));
        inner.push("hash", FieldValue::Uint256(counting_hash()));

        let mut msg = DecodedMessage::new();
        msg.push("zzz", FieldValue::UInt(1));
        msg.push("inv", FieldValue::Array(vec![FieldValue::Record(inner)]));
        msg.push("aaa", FieldValue::Bool(false));

        let doc = project(&msg, &StandardHashFields);
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zzz", "inv", "aaa"]);

        // The nested "hash" gets the scalar conversion even inside an array.
        let entry = &doc["inv"][0];
        assert!(entry["hash"].as_str().unwrap().starts_with("201f"));
        assert_eq!(entry["type"], json!(2));
    }

    #[test]
    fn projection_is_deterministic() {
        let mut msg = DecodedMessage::new();
        msg.push("nonce", FieldValue::UInt(9));
        msg.push("hash", FieldValue::Uint256(counting_hash()));

        let a = project(&msg, &StandardHashFields);
        let b = project(&msg, &StandardHashFields);
        assert_eq!(a, b);
    }

    #[test]
    fn unlisted_uint256_renders_in_storage_order() {
        let mut msg = DecodedMessage::new();
        msg.push("commitment", FieldValue::Uint256(counting_hash()));

        let doc = project(&msg, &StandardHashFields);
        assert!(doc["commitment"].as_str().unwrap().starts_with("0102"));
    }
}
