//! Composite-key serialization.
//!
//! Any indexable [`Value`] reduces to one canonical string. Composite keys
//! serialize their fields in ascending code-point order, so two keys with
//! the same content always produce the same string regardless of field
//! insertion order — the equality-by-content guarantee the group index
//! relies on. The scheme is deterministic, not collision-proof: callers
//! must not construct keys whose serialized forms legitimately collide.

use tessera_core::Value;

use crate::error::CollectionError;

/// Reserved token for a null key component; distinct from any valid string.
pub const NULL_KEY: &str = "%NUL%";
/// Reserved token for an undefined key component.
pub const UNDEFINED_KEY: &str = "%UND%";

/// A type usable as a composite group key: anything that can reduce itself
/// to an indexable [`Value`].
pub trait IndexKey {
    fn index_value(&self) -> Value;
}

impl IndexKey for Value {
    fn index_value(&self) -> Value {
        self.clone()
    }
}

/// Serializes an indexable value to its canonical string key.
///
/// Strings serialize as themselves; numbers and booleans as their text
/// form; null and undefined as reserved sentinels; composites as
/// `{"v1"|"v2"|…}` with fields sorted by name. Lists and maps with
/// non-string keys are not indexable.
pub fn serialize_index_key(value: &Value) -> Result<String, CollectionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        // Trailing zeros are stripped first: 1.1 and 1.10 compare equal,
        // so they must share a key.
        Value::Number(d) => Ok(d.normalize().to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(NULL_KEY.to_string()),
        Value::Undefined => Ok(UNDEFINED_KEY.to_string()),
        // A timestamp reduces to its textual form.
        Value::Timestamp(s) => Ok(s.clone()),
        Value::Record(record) => {
            serialize_composite(record.fields().iter().map(|(k, v)| (k.as_str(), v)))
        }
        Value::Map(entries) => {
            let mut fields = Vec::with_capacity(entries.len());
            for (key, value) in entries.iter() {
                match key {
                    Value::String(name) => fields.push((name.as_str(), value)),
                    other => {
                        return Err(CollectionError::UnsupportedIndexKey {
                            kind: format!("map keyed by {}", other.type_name()),
                        })
                    }
                }
            }
            serialize_composite(fields.into_iter())
        }
        Value::List(_) => Err(CollectionError::UnsupportedIndexKey {
            kind: "List".to_string(),
        }),
    }
}

fn serialize_composite<'a>(
    fields: impl Iterator<Item = (&'a str, &'a Value)>,
) -> Result<String, CollectionError> {
    let mut sorted: Vec<(&str, &Value)> = fields.collect();
    // Byte order on UTF-8 is ascending code-point order.
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let mut parts = Vec::with_capacity(sorted.len());
    for (_, value) in sorted {
        parts.push(format!("\"{}\"", serialize_index_key(value)?));
    }
    Ok(format!("{{{}}}", parts.join("|")))
}
