//! Typed extraction from coerced values.
//!
//! [`FromValue`] is the seam between the engine's dynamic [`Value`] output
//! and a caller's domain structs: coerce once against a descriptor, then
//! build the typed struct from the record without re-validating.
//! [`RecordFields`] supplies the field accessors those impls are written
//! with.

use rust_decimal::Decimal;
use tessera_core::{List, MapValue, RecordValue, TypeDescriptor, Value};

use crate::diagnostics::Diagnostics;
use crate::engine::coerce;
use crate::error::CoerceError;

/// A type constructible from a coerced [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, CoerceError>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        Ok(value.clone())
    }
}

/// Coerces `input` against `descriptor` and builds a `T` from the result.
pub fn coerce_typed<T: FromValue>(
    descriptor: &TypeDescriptor,
    input: &Value,
    diags: &mut Diagnostics,
) -> Result<T, CoerceError> {
    let value = coerce(descriptor, input, diags)?;
    T::from_value(&value)
}

/// Field accessors for [`FromValue`] implementations over records.
///
/// Each accessor returns a [`CoerceError::FieldError`] naming the record's
/// class and the field, so extraction failures read like coercion failures.
pub trait RecordFields {
    fn require(&self, field: &str) -> Result<&Value, CoerceError>;
    fn string_field(&self, field: &str) -> Result<&str, CoerceError>;
    fn number_field(&self, field: &str) -> Result<Decimal, CoerceError>;
    fn bool_field(&self, field: &str) -> Result<bool, CoerceError>;
    fn list_field(&self, field: &str) -> Result<&List<Value>, CoerceError>;
    fn map_field(&self, field: &str) -> Result<&MapValue<Value, Value>, CoerceError>;
    fn record_field(&self, field: &str) -> Result<&RecordValue, CoerceError>;
    /// `Undefined`/`Null` read as `None`; anything else must be a string.
    fn optional_string_field(&self, field: &str) -> Result<Option<&str>, CoerceError>;
}

impl RecordFields for RecordValue {
    fn require(&self, field: &str) -> Result<&Value, CoerceError> {
        self.field(field).ok_or_else(|| CoerceError::FieldError {
            class: self.class_name().to_string(),
            field: field.to_string(),
            message: "field is missing".to_string(),
        })
    }

    fn string_field(&self, field: &str) -> Result<&str, CoerceError> {
        let value = self.require(field)?;
        value
            .as_str()
            .ok_or_else(|| field_error(self, field, "String", value))
    }

    fn number_field(&self, field: &str) -> Result<Decimal, CoerceError> {
        let value = self.require(field)?;
        value
            .as_number()
            .ok_or_else(|| field_error(self, field, "Number", value))
    }

    fn bool_field(&self, field: &str) -> Result<bool, CoerceError> {
        let value = self.require(field)?;
        value
            .as_bool()
            .ok_or_else(|| field_error(self, field, "Boolean", value))
    }

    fn list_field(&self, field: &str) -> Result<&List<Value>, CoerceError> {
        let value = self.require(field)?;
        value
            .as_list()
            .ok_or_else(|| field_error(self, field, "List", value))
    }

    fn map_field(&self, field: &str) -> Result<&MapValue<Value, Value>, CoerceError> {
        let value = self.require(field)?;
        value
            .as_map()
            .ok_or_else(|| field_error(self, field, "Map", value))
    }

    fn record_field(&self, field: &str) -> Result<&RecordValue, CoerceError> {
        let value = self.require(field)?;
        value
            .as_record()
            .ok_or_else(|| field_error(self, field, "Record", value))
    }

    fn optional_string_field(&self, field: &str) -> Result<Option<&str>, CoerceError> {
        match self.field(field) {
            None | Some(Value::Undefined) | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| field_error(self, field, "String", value)),
        }
    }
}

fn field_error(record: &RecordValue, field: &str, expected: &str, got: &Value) -> CoerceError {
    CoerceError::FieldError {
        class: record.class_name().to_string(),
        field: field.to_string(),
        message: format!("expected {}, got {}", expected, got.type_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::OrderedMap;

    fn record() -> RecordValue {
        RecordValue::new(
            "Track",
            OrderedMap::from_entries([
                ("id".to_string(), Value::String("t1".into())),
                ("count".to_string(), Value::Number(Decimal::from(3))),
                ("note".to_string(), Value::Undefined),
            ]),
        )
    }

    #[test]
    fn accessors_extract_typed_fields() {
        let r = record();
        assert_eq!(r.string_field("id").unwrap(), "t1");
        assert_eq!(r.number_field("count").unwrap(), Decimal::from(3));
        assert_eq!(r.optional_string_field("note").unwrap(), None);
        assert_eq!(r.optional_string_field("id").unwrap(), Some("t1"));
    }

    #[test]
    fn accessor_errors_name_class_and_field() {
        let err = record().bool_field("id").unwrap_err();
        assert_eq!(
            err,
            CoerceError::FieldError {
                class: "Track".into(),
                field: "id".into(),
                message: "expected Boolean, got String".into(),
            }
        );
        assert!(matches!(
            record().require("missing"),
            Err(CoerceError::FieldError { .. })
        ));
    }
}
