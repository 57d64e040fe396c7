//! Runtime value model.
//!
//! Coerced data is made of [`Value`]s. All numbers use
//! `rust_decimal::Decimal` — never `f64` — so values are `Eq` and serialize
//! deterministically as index keys. `Undefined` is a first-class sentinel
//! distinct from `Null`: JSON has no such thing, so it is only ever
//! introduced by field lookup on a keyed bag, never by [`Value::from_json`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::collections::{List, MapValue, OrderedMap};

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// A loosely- or strongly-typed runtime value.
///
/// The same enum serves as engine input (built from JSON or by hand) and
/// engine output (records, typed lists and maps). That shared shape is what
/// makes reference coercion idempotent: an already-coerced value passed back
/// through the engine comes out unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Number(Decimal),
    Bool(bool),
    Null,
    Undefined,
    /// A textual instant. Only ever produced by coercing a non-empty string
    /// against a timestamp reference.
    Timestamp(String),
    List(List<Value>),
    /// A generic map, doubling as the keyed bag that records are built from.
    Map(MapValue<Value, Value>),
    Record(RecordValue),
}

impl Value {
    /// Human-readable shape name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Number(_) => "Number",
            Value::Bool(_) => "Boolean",
            Value::Null => "Null",
            Value::Undefined => "Undefined",
            Value::Timestamp(_) => "Timestamp",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Record(_) => "Record",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Value::Number(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue<Value, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Converts parsed JSON into the runtime model. Objects become keyed
    /// bags ([`Value::Map`] with string keys), arrays become lists, numbers
    /// become decimals.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(decimal_from_number(n)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .iter()
                    .map(|(k, v)| (Value::String(k.clone()), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Renders the value back as JSON. `Undefined` has no JSON form and
    /// comes out as `null`; a map with non-string keys renders each key
    /// through its own JSON text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) | Value::Timestamp(s) => serde_json::Value::String(s.clone()),
            Value::Number(d) => number_to_json(*d),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Null | Value::Undefined => serde_json::Value::Null,
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => {
                let mut obj = serde_json::Map::new();
                for (k, v) in entries.iter() {
                    let key = match k {
                        Value::String(s) => s.clone(),
                        other => other.to_json().to_string(),
                    };
                    obj.insert(key, v.to_json());
                }
                serde_json::Value::Object(obj)
            }
            Value::Record(record) => {
                let mut obj = serde_json::Map::new();
                for (name, v) in record.fields().iter() {
                    obj.insert(name.clone(), v.to_json());
                }
                serde_json::Value::Object(obj)
            }
        }
    }
}

fn decimal_from_number(n: &serde_json::Number) -> Decimal {
    if let Some(i) = n.as_i64() {
        return Decimal::from(i);
    }
    if let Some(u) = n.as_u64() {
        return Decimal::from(u);
    }
    let text = n.to_string();
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        // JSON magnitudes beyond Decimal's range have no faithful
        // representation; saturate rather than fail the whole conversion.
        .unwrap_or(if text.starts_with('-') {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

fn number_to_json(d: Decimal) -> serde_json::Value {
    if d.is_integer() {
        if let Some(i) = d.to_i64() {
            return serde_json::Value::from(i);
        }
    }
    match d.to_f64().and_then(serde_json::Number::from_f64) {
        Some(n) => serde_json::Value::Number(n),
        None => serde_json::Value::String(d.to_string()),
    }
}

// ──────────────────────────────────────────────
// Records
// ──────────────────────────────────────────────

/// A coerced class instance: the owning class name plus an ordered
/// field-name→value map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordValue {
    class_name: String,
    fields: OrderedMap<String, Value>,
}

impl RecordValue {
    pub fn new(class_name: impl Into<String>, fields: OrderedMap<String, Value>) -> Self {
        RecordValue {
            class_name: class_name.into(),
            fields,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn fields(&self) -> &OrderedMap<String, Value> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns a new record with `name` bound to `value`.
    pub fn set(&self, name: impl Into<String>, value: Value) -> Self {
        RecordValue {
            class_name: self.class_name.clone(),
            fields: self.fields.set(name.into(), value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_builds_keyed_bags() {
        let json = serde_json::json!({"name": "a", "count": 2, "tags": ["x"], "extra": null});
        let value = Value::from_json(&json);
        let bag = value.as_map().unwrap();
        assert_eq!(
            bag.get(&Value::String("name".into())),
            Some(&Value::String("a".into()))
        );
        assert_eq!(
            bag.get(&Value::String("count".into())),
            Some(&Value::Number(Decimal::from(2)))
        );
        assert_eq!(bag.get(&Value::String("extra".into())), Some(&Value::Null));
        assert_eq!(
            bag.get(&Value::String("tags".into())).unwrap().type_name(),
            "List"
        );
    }

    #[test]
    fn json_numbers_become_decimals() {
        let v = Value::from_json(&serde_json::json!(1.5));
        assert_eq!(v, Value::Number("1.5".parse().unwrap()));
        let v = Value::from_json(&serde_json::json!(-7));
        assert_eq!(v, Value::Number(Decimal::from(-7)));
    }

    #[test]
    fn to_json_round_trips_plain_data() {
        let json = serde_json::json!({"a": [1, 2], "b": {"c": true}});
        assert_eq!(Value::from_json(&json).to_json(), json);
    }

    #[test]
    fn undefined_renders_as_null() {
        assert_eq!(Value::Undefined.to_json(), serde_json::Value::Null);
    }
}
