//! End-to-end coercion suite.
//!
//! Builds descriptor trees the way a caller would — explicitly, ahead of
//! time — and drives them with JSON fixtures, asserting both the coerced
//! shape and the collected diagnostics.

use std::sync::Arc;

use rust_decimal::Decimal;
use tessera_coerce::{
    coerce_json, CoerceError, DiagnosticReason, Diagnostics, FieldPath, RecordFields,
};
use tessera_core::{ClassDescriptor, TypeDescriptor, Value};

/// A playlist entry: required id, defaulted play count, optional label,
/// temporal added-at, and a list of tag strings.
fn entry_class() -> Arc<ClassDescriptor> {
    ClassDescriptor::builder("Entry")
        .field("id", TypeDescriptor::String)
        .field_with_default("plays", TypeDescriptor::Number, || {
            Value::Number(Decimal::ZERO)
        })
        .optional_field("label", TypeDescriptor::String)
        .field("added_at", TypeDescriptor::timestamp())
        .field_with_default(
            "tags",
            TypeDescriptor::list(TypeDescriptor::String),
            || Value::List(tessera_core::List::new()),
        )
        .build()
}

#[test]
fn full_record_coerces_cleanly() {
    let desc = TypeDescriptor::class(entry_class());
    let json = serde_json::json!({
        "id": "e1",
        "plays": 12,
        "label": "warmup",
        "added_at": "2024-05-01T10:00:00Z",
        "tags": ["a", "b"],
    });
    let mut diags = Diagnostics::collect();
    let value = coerce_json(&desc, &json, &mut diags).unwrap();
    let record = value.as_record().unwrap();

    assert_eq!(record.class_name(), "Entry");
    assert_eq!(record.string_field("id").unwrap(), "e1");
    assert_eq!(record.number_field("plays").unwrap(), Decimal::from(12));
    assert_eq!(record.optional_string_field("label").unwrap(), Some("warmup"));
    assert_eq!(
        record.field("added_at"),
        Some(&Value::Timestamp("2024-05-01T10:00:00Z".into()))
    );
    assert_eq!(record.list_field("tags").unwrap().len(), 2);
    assert!(diags.is_empty());
}

#[test]
fn sparse_record_is_defaulted() {
    let desc = TypeDescriptor::class(entry_class());
    let json = serde_json::json!({"id": "e2", "added_at": "2024-05-02T10:00:00Z"});
    let mut diags = Diagnostics::collect();
    let value = coerce_json(&desc, &json, &mut diags).unwrap();
    let record = value.as_record().unwrap();

    assert_eq!(record.number_field("plays").unwrap(), Decimal::ZERO);
    assert_eq!(record.field("label"), Some(&Value::Undefined));
    assert!(record.list_field("tags").unwrap().is_empty());
    assert!(diags.is_empty());
}

#[test]
fn malformed_fields_are_normalized_and_reported() {
    let desc = TypeDescriptor::class(entry_class());
    let json = serde_json::json!({
        "id": "e3",
        "plays": "not-a-number",
        "added_at": "",
        "tags": ["ok", 7],
    });
    let mut diags = Diagnostics::collect();
    let value = coerce_json(&desc, &json, &mut diags).unwrap();
    let record = value.as_record().unwrap();

    // Every bad field was replaced by its conservative placeholder.
    assert_eq!(record.number_field("plays").unwrap(), Decimal::ZERO);
    assert_eq!(record.field("added_at"), Some(&Value::Map(tessera_core::MapValue::new())));
    assert!(record.list_field("tags").unwrap().is_empty());

    // The failed tag element is reported at its index, then the enclosing
    // field is reported as it is normalized.
    let paths: Vec<String> = diags.entries().iter().map(|d| d.path.to_string()).collect();
    assert_eq!(paths, vec!["added_at", "plays", "[1]", "tags"]);
    assert!(diags
        .entries()
        .iter()
        .all(|d| matches!(d.reason, DiagnosticReason::CoercionFailed(_))));
}

#[test]
fn reference_coercion_is_idempotent() {
    let desc = TypeDescriptor::class(entry_class());
    let json = serde_json::json!({
        "id": "e4",
        "added_at": "2024-05-04T10:00:00Z",
        "tags": ["x"],
    });
    let mut diags = Diagnostics::collect();
    let once = coerce_json(&desc, &json, &mut diags).unwrap();
    let twice = tessera_coerce::coerce(&desc, &once, &mut diags).unwrap();
    assert_eq!(once, twice);
    assert!(diags.is_empty());
}

#[test]
fn inheritance_and_shadowing_resolve_against_the_chain() {
    let asset = ClassDescriptor::builder("Asset")
        .field("id", TypeDescriptor::String)
        .field_with_default("rank", TypeDescriptor::Number, || {
            Value::Number(Decimal::from(-1))
        })
        .build();
    let video = ClassDescriptor::builder("Video")
        .field("duration", TypeDescriptor::Number)
        .parent(asset)
        .build();
    let desc = TypeDescriptor::class(video);

    let json = serde_json::json!({"id": "v1", "duration": 90});
    let mut diags = Diagnostics::collect();
    let value = coerce_json(&desc, &json, &mut diags).unwrap();
    let record = value.as_record().unwrap();

    assert_eq!(record.class_name(), "Video");
    assert_eq!(record.string_field("id").unwrap(), "v1");
    assert_eq!(record.number_field("duration").unwrap(), Decimal::from(90));
    assert_eq!(record.number_field("rank").unwrap(), Decimal::from(-1));
}

#[test]
fn nested_records_coerce_recursively() {
    let owner = ClassDescriptor::builder("Owner")
        .field("name", TypeDescriptor::String)
        .build();
    let item = ClassDescriptor::builder("Item")
        .field("id", TypeDescriptor::String)
        .field("owner", TypeDescriptor::class(owner))
        .build();
    let desc = TypeDescriptor::class(item);

    let json = serde_json::json!({"id": "i1", "owner": {"name": "ada"}});
    let mut diags = Diagnostics::collect();
    let value = coerce_json(&desc, &json, &mut diags).unwrap();
    let record = value.as_record().unwrap();
    let owner = record.record_field("owner").unwrap();
    assert_eq!(owner.class_name(), "Owner");
    assert_eq!(owner.string_field("name").unwrap(), "ada");
}

#[test]
fn union_of_shapes_disambiguates_by_priority() {
    let desc = TypeDescriptor::Union(vec![
        TypeDescriptor::Number,
        TypeDescriptor::list(TypeDescriptor::Number),
        TypeDescriptor::Undefined,
    ]);
    let mut diags = Diagnostics::collect();

    let n = coerce_json(&desc, &serde_json::json!(5), &mut diags).unwrap();
    assert_eq!(n, Value::Number(Decimal::from(5)));

    let l = coerce_json(&desc, &serde_json::json!([1, 2]), &mut diags).unwrap();
    assert_eq!(l.as_list().unwrap().len(), 2);

    let err = coerce_json(&desc, &serde_json::json!("nope"), &mut diags).unwrap_err();
    assert!(matches!(err, CoerceError::NoUnionMemberMatched { .. }));
}

#[test]
fn unknown_fields_keep_their_raw_shape() {
    let desc = TypeDescriptor::class(entry_class());
    let json = serde_json::json!({
        "id": "e5",
        "added_at": "2024-05-05T10:00:00Z",
        "debug": {"depth": 2},
    });
    let mut diags = Diagnostics::collect();
    let value = coerce_json(&desc, &json, &mut diags).unwrap();
    let record = value.as_record().unwrap();

    let raw = record.field("debug").unwrap();
    assert!(raw.as_map().is_some());
    assert_eq!(diags.entries().len(), 1);
    assert_eq!(diags.entries()[0].path, FieldPath::Key("debug".into()));
    assert_eq!(diags.entries()[0].reason, DiagnosticReason::UnknownField);
}
