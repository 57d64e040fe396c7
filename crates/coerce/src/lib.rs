//! tessera-coerce: the type-directed deserialization engine.
//!
//! Given an arbitrary input [`tessera_core::Value`] (typically built from
//! parsed JSON) and a [`tessera_core::TypeDescriptor`], [`coerce`] produces a
//! fully-typed value or a structured [`CoerceError`] — never a panic.
//! Records are constructed best-effort: a field that fails to coerce is
//! replaced by its [`normalize`] placeholder and reported through
//! [`Diagnostics`], so one malformed field never loses the whole record.

mod diagnostics;
mod engine;
mod error;
mod from_value;

pub use diagnostics::{Diagnostic, DiagnosticReason, Diagnostics, FieldPath};
pub use engine::{coerce, coerce_json, coerce_lenient, coerce_record, normalize};
pub use error::CoerceError;
pub use from_value::{coerce_typed, FromValue, RecordFields};
