//! The coercion engine.
//!
//! `coerce` recursively reconciles an input [`Value`] with a
//! [`TypeDescriptor`]. It is pure: the same descriptor and input always
//! produce the same result or the same failure, and nothing is held across
//! calls. Record construction is best-effort — a field that fails to coerce
//! is replaced by its normalization fallback and reported through the
//! diagnostic sink, so one bad field never loses the whole record.

use rust_decimal::Decimal;
use tessera_core::{
    ClassDescriptor, List, MapValue, OrderedMap, RecordValue, ReferenceDescriptor,
    ReferenceTarget, TypeDescriptor, Value,
};

use crate::diagnostics::{Diagnostic, DiagnosticReason, Diagnostics, FieldPath};
use crate::error::CoerceError;

// ──────────────────────────────────────────────
// Entry points
// ──────────────────────────────────────────────

/// Coerces `input` against `descriptor`.
///
/// Recoverable problems inside record fields go to `diags`; the returned
/// error means the value as a whole could not be reconciled.
pub fn coerce(
    descriptor: &TypeDescriptor,
    input: &Value,
    diags: &mut Diagnostics,
) -> Result<Value, CoerceError> {
    // Absence is resolved before any kind-specific rule.
    if input.is_undefined() {
        return if descriptor.admits_absence() {
            Ok(Value::Undefined)
        } else {
            Err(CoerceError::MissingRequiredValue)
        };
    }

    match descriptor {
        TypeDescriptor::StringLiteral(expected) => match input {
            Value::String(s) if s == expected => Ok(input.clone()),
            other => Err(literal_mismatch(descriptor, other)),
        },
        TypeDescriptor::NumberLiteral(expected) => match input {
            Value::Number(d) if d == expected => Ok(input.clone()),
            other => Err(literal_mismatch(descriptor, other)),
        },
        TypeDescriptor::BooleanLiteral(expected) => match input {
            Value::Bool(b) if b == expected => Ok(input.clone()),
            other => Err(literal_mismatch(descriptor, other)),
        },
        TypeDescriptor::String => match input {
            Value::String(_) => Ok(input.clone()),
            other => Err(type_mismatch("String", other)),
        },
        TypeDescriptor::Number => match input {
            Value::Number(_) => Ok(input.clone()),
            other => Err(type_mismatch("Number", other)),
        },
        TypeDescriptor::Boolean => match input {
            Value::Bool(_) => Ok(input.clone()),
            other => Err(type_mismatch("Boolean", other)),
        },
        TypeDescriptor::Null => match input {
            Value::Null => Ok(Value::Null),
            other => Err(type_mismatch("Null", other)),
        },
        // Undefined input was handled above, so anything left mismatches.
        TypeDescriptor::Undefined => Err(type_mismatch("Undefined", input)),
        TypeDescriptor::Reference(reference) => coerce_reference(reference, input, diags),
        TypeDescriptor::Union(members) => coerce_union(members, input, diags),
    }
}

/// Converts `json` to the runtime model and coerces it. Convenience entry
/// point for callers holding parsed JSON.
pub fn coerce_json(
    descriptor: &TypeDescriptor,
    json: &serde_json::Value,
    diags: &mut Diagnostics,
) -> Result<Value, CoerceError> {
    coerce(descriptor, &Value::from_json(json), diags)
}

/// Coerces with diagnostics routed to `tracing` instead of collected.
pub fn coerce_lenient(
    descriptor: &TypeDescriptor,
    input: &Value,
) -> Result<Value, CoerceError> {
    coerce(descriptor, input, &mut Diagnostics::log())
}

// ──────────────────────────────────────────────
// References
// ──────────────────────────────────────────────

fn coerce_reference(
    reference: &ReferenceDescriptor,
    input: &Value,
    diags: &mut Diagnostics,
) -> Result<Value, CoerceError> {
    match &reference.target {
        ReferenceTarget::Timestamp => match input {
            // Already coerced; hand it back untouched.
            Value::Timestamp(_) => Ok(input.clone()),
            Value::String(s) if !s.is_empty() => Ok(Value::Timestamp(s.clone())),
            other => Err(CoerceError::InvalidTemporalLiteral {
                got: render(other),
            }),
        },
        ReferenceTarget::List => {
            let element = reference.type_arguments.first().ok_or_else(|| {
                CoerceError::MalformedDescriptor {
                    message: "list reference is missing its element type argument".to_string(),
                }
            })?;
            match input {
                Value::List(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        match coerce(element, item, diags) {
                            Ok(value) => out.push(value),
                            Err(err) => {
                                // The element's position is only known here,
                                // so the diagnostic is emitted before the
                                // failure propagates.
                                diags.push(Diagnostic {
                                    class_name: reference.describe(),
                                    path: FieldPath::Index(index),
                                    expected: element.describe(),
                                    value: item.clone(),
                                    reason: DiagnosticReason::CoercionFailed(err.clone()),
                                });
                                return Err(err);
                            }
                        }
                    }
                    Ok(Value::List(List::from_vec(out)))
                }
                other => Err(type_mismatch(&reference.describe(), other)),
            }
        }
        ReferenceTarget::Map => {
            let (key_ty, value_ty) = match (
                reference.type_arguments.first(),
                reference.type_arguments.get(1),
            ) {
                (Some(k), Some(v)) => (k, v),
                _ => {
                    return Err(CoerceError::MalformedDescriptor {
                        message: "map reference needs key and value type arguments".to_string(),
                    })
                }
            };
            let entries: Vec<(Value, Value)> = match input {
                Value::Map(entries) => {
                    entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
                }
                Value::Record(record) => record
                    .fields()
                    .iter()
                    .map(|(k, v)| (Value::String(k.clone()), v.clone()))
                    .collect(),
                other => return Err(type_mismatch(&reference.describe(), other)),
            };
            let mut out = Vec::with_capacity(entries.len());
            for (k, v) in &entries {
                let key = coerce(key_ty, k, diags)?;
                let value = coerce(value_ty, v, diags)?;
                out.push((key, value));
            }
            Ok(Value::Map(MapValue::from_entries(out)))
        }
        ReferenceTarget::Class(class) => {
            // An instance of the target class passes through unchanged.
            if let Value::Record(record) = input {
                if record.class_name() == class.name {
                    return Ok(input.clone());
                }
            }
            coerce_record(class, input, diags).map(Value::Record)
        }
    }
}

// ──────────────────────────────────────────────
// Unions
// ──────────────────────────────────────────────

fn coerce_union(
    members: &[TypeDescriptor],
    input: &Value,
    diags: &mut Diagnostics,
) -> Result<Value, CoerceError> {
    if members.is_empty() {
        return Err(CoerceError::EmptyUnion);
    }
    for member in by_priority(members) {
        // Member attempts run against a scratch sink so a failed attempt
        // leaks no diagnostics.
        let mut scratch = Diagnostics::collect();
        if let Ok(value) = coerce(member, input, &mut scratch) {
            diags.absorb(scratch);
            return Ok(value);
        }
    }
    Err(CoerceError::NoUnionMemberMatched {
        expected: members
            .iter()
            .map(TypeDescriptor::describe)
            .collect::<Vec<_>>()
            .join(" | "),
    })
}

/// Members that are not absence-like (`Null`/`Undefined`) come first,
/// preserving relative order within each group: a present value should be
/// interpreted as a real type before being read as absence.
fn by_priority(members: &[TypeDescriptor]) -> Vec<&TypeDescriptor> {
    let (real, absent): (Vec<&TypeDescriptor>, Vec<&TypeDescriptor>) = members
        .iter()
        .partition(|m| !matches!(m, TypeDescriptor::Null | TypeDescriptor::Undefined));
    real.into_iter().chain(absent).collect()
}

// ──────────────────────────────────────────────
// Records
// ──────────────────────────────────────────────

/// Constructs a record of `class` from a keyed bag.
///
/// Input fields are coerced against their declared descriptors (walking the
/// inheritance chain closest-first); declared fields missing from the input
/// are defaulted. A field that fails to coerce is replaced by
/// [`normalize`]'s placeholder and reported to `diags`; only a required
/// field with neither input nor default fails the whole record.
pub fn coerce_record(
    class: &ClassDescriptor,
    input: &Value,
    diags: &mut Diagnostics,
) -> Result<RecordValue, CoerceError> {
    let bag = keyed_bag(class, input)?;
    let mut fields: OrderedMap<String, Value> = OrderedMap::new();

    // Pass 1: input-driven.
    for (name, raw) in &bag {
        match class.resolve_field(name) {
            None => {
                if class.ignores(name) {
                    continue;
                }
                diags.push(Diagnostic {
                    class_name: class.name.clone(),
                    path: FieldPath::Key(name.clone()),
                    expected: "(not declared)".to_string(),
                    value: raw.clone(),
                    reason: DiagnosticReason::UnknownField,
                });
                // Undeclared fields are retained verbatim.
                fields = fields.set(name.clone(), raw.clone());
            }
            Some(field) => match coerce(&field.ty, raw, diags) {
                Ok(value) => fields = fields.set(name.clone(), value),
                Err(err) => {
                    diags.push(Diagnostic {
                        class_name: class.name.clone(),
                        path: FieldPath::Key(name.clone()),
                        expected: field.ty.describe(),
                        value: raw.clone(),
                        reason: DiagnosticReason::CoercionFailed(err),
                    });
                    fields = fields.set(name.clone(), normalize(&field.ty));
                }
            },
        }
    }

    // Pass 2: declaration-driven, closest-first. A name already present —
    // from input, or from a closer declaration — is never overwritten.
    for source in class.field_sources() {
        for field in &source.fields {
            if fields.contains_key(&field.name) {
                continue;
            }
            let value = match &field.default {
                Some(supplier) => supplier(),
                None if field.ty.admits_absence() => Value::Undefined,
                None => {
                    return Err(CoerceError::MissingRequiredField {
                        class: class.name.clone(),
                        field: field.name.clone(),
                    })
                }
            };
            fields = fields.set(field.name.clone(), value);
        }
    }

    Ok(RecordValue::new(class.name.clone(), fields))
}

fn keyed_bag(
    class: &ClassDescriptor,
    input: &Value,
) -> Result<Vec<(String, Value)>, CoerceError> {
    match input {
        // An absent bag constructs a fully-defaulted record.
        Value::Undefined => Ok(Vec::new()),
        Value::Map(entries) => {
            let mut bag = Vec::with_capacity(entries.len());
            for (key, value) in entries.iter() {
                match key {
                    Value::String(name) => bag.push((name.clone(), value.clone())),
                    other => {
                        return Err(type_mismatch(
                            &format!("keyed bag for {}", class.name),
                            other,
                        ))
                    }
                }
            }
            Ok(bag)
        }
        Value::Record(record) => Ok(record
            .fields()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()),
        other => Err(type_mismatch(&class.name, other)),
    }
}

// ──────────────────────────────────────────────
// Normalization fallback
// ──────────────────────────────────────────────

/// The most conservative structurally-valid placeholder for a descriptor.
///
/// Used only as the error-recovery fallback when a record field fails to
/// coerce — never on the primary path. Total: every descriptor normalizes
/// to something.
pub fn normalize(descriptor: &TypeDescriptor) -> Value {
    match descriptor {
        TypeDescriptor::String => Value::String(String::new()),
        TypeDescriptor::Number => Value::Number(Decimal::ZERO),
        TypeDescriptor::Boolean => Value::Bool(false),
        TypeDescriptor::Null => Value::Null,
        TypeDescriptor::Undefined => Value::Undefined,
        // The lowest-priority member is the fallback: absence-like members
        // sort last, so an optional shape normalizes to absence.
        TypeDescriptor::Union(members) => match by_priority(members).last() {
            Some(member) => normalize(member),
            None => empty_placeholder(),
        },
        TypeDescriptor::Reference(reference) => match &reference.target {
            ReferenceTarget::List => Value::List(List::new()),
            ReferenceTarget::Map => Value::Map(MapValue::new()),
            ReferenceTarget::Class(class) => {
                // Default-construct from an empty bag; a class that cannot
                // be defaulted collapses to the empty placeholder.
                match coerce_record(class, &Value::Undefined, &mut Diagnostics::collect()) {
                    Ok(record) => Value::Record(record),
                    Err(_) => empty_placeholder(),
                }
            }
            ReferenceTarget::Timestamp => empty_placeholder(),
        },
        TypeDescriptor::StringLiteral(_)
        | TypeDescriptor::NumberLiteral(_)
        | TypeDescriptor::BooleanLiteral(_) => empty_placeholder(),
    }
}

fn empty_placeholder() -> Value {
    Value::Map(MapValue::new())
}

// ──────────────────────────────────────────────
// Error helpers
// ──────────────────────────────────────────────

fn type_mismatch(expected: &str, got: &Value) -> CoerceError {
    CoerceError::TypeMismatch {
        expected: expected.to_string(),
        got: got.type_name().to_string(),
    }
}

fn literal_mismatch(expected: &TypeDescriptor, got: &Value) -> CoerceError {
    CoerceError::LiteralMismatch {
        expected: expected.describe(),
        got: render(got),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        other => other.to_json().to_string(),
    }
}
