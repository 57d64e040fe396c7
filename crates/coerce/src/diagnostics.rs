//! Non-fatal coercion diagnostics.
//!
//! When a single field fails to coerce, the engine substitutes a normalized
//! placeholder and reports what happened here instead of failing the whole
//! record. Callers choose the channel: collect diagnostics for assertion, or
//! let them flow to `tracing`.

use std::fmt;

use tessera_core::Value;

use crate::error::CoerceError;

/// Where in the enclosing value the problem was: a record field or a list
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    Key(String),
    Index(usize),
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Key(key) => write!(f, "{}", key),
            FieldPath::Index(index) => write!(f, "[{}]", index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticReason {
    /// The field's value did not coerce against its declared descriptor.
    CoercionFailed(CoerceError),
    /// The input carried a field the class chain does not declare.
    UnknownField,
}

/// One non-fatal problem encountered while constructing a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The shape being constructed when the problem surfaced: a class name,
    /// or a container rendering such as `List<Number>` for an indexed path.
    pub class_name: String,
    /// The offending field or index.
    pub path: FieldPath,
    /// Rendering of the expected descriptor.
    pub expected: String,
    /// The raw offending value, verbatim.
    pub value: Value,
    pub reason: DiagnosticReason,
}

/// A diagnostic sink.
///
/// `Collect` buffers diagnostics so tests (and callers that want to inspect
/// them) can assert on exactly what was reported. `Log` forwards each
/// diagnostic to `tracing::warn!` and keeps nothing.
#[derive(Debug)]
pub enum Diagnostics {
    Collect(Vec<Diagnostic>),
    Log,
}

impl Diagnostics {
    pub fn collect() -> Self {
        Diagnostics::Collect(Vec::new())
    }

    pub fn log() -> Self {
        Diagnostics::Log
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match self {
            Diagnostics::Collect(buffer) => buffer.push(diagnostic),
            Diagnostics::Log => {
                tracing::warn!(
                    class = %diagnostic.class_name,
                    path = %diagnostic.path,
                    expected = %diagnostic.expected,
                    value = %diagnostic.value.to_json(),
                    reason = ?diagnostic.reason,
                    "field coercion diagnostic"
                );
            }
        }
    }

    /// The collected diagnostics; empty in `Log` mode.
    pub fn entries(&self) -> &[Diagnostic] {
        match self {
            Diagnostics::Collect(buffer) => buffer,
            Diagnostics::Log => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Moves every diagnostic buffered in `other` into this sink. Union
    /// coercion runs each member attempt against a scratch `Collect` sink
    /// and absorbs it only when the member succeeds, so failed attempts
    /// leak nothing.
    pub fn absorb(&mut self, other: Diagnostics) {
        if let Diagnostics::Collect(buffer) = other {
            for diagnostic in buffer {
                self.push(diagnostic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(class: &str) -> Diagnostic {
        Diagnostic {
            class_name: class.to_string(),
            path: FieldPath::Key("f".to_string()),
            expected: "String".to_string(),
            value: Value::Null,
            reason: DiagnosticReason::UnknownField,
        }
    }

    #[test]
    fn collect_buffers_in_order() {
        let mut diags = Diagnostics::collect();
        diags.push(sample("A"));
        diags.push(sample("B"));
        let classes: Vec<_> = diags.entries().iter().map(|d| d.class_name.as_str()).collect();
        assert_eq!(classes, vec!["A", "B"]);
    }

    #[test]
    fn absorb_moves_scratch_entries() {
        let mut outer = Diagnostics::collect();
        let mut scratch = Diagnostics::collect();
        scratch.push(sample("A"));
        outer.absorb(scratch);
        assert_eq!(outer.entries().len(), 1);
    }

    #[test]
    fn log_mode_keeps_nothing() {
        let mut diags = Diagnostics::log();
        diags.push(sample("A"));
        assert!(diags.is_empty());
    }

    #[test]
    fn field_path_renders_keys_and_indices() {
        assert_eq!(FieldPath::Key("age".into()).to_string(), "age");
        assert_eq!(FieldPath::Index(3).to_string(), "[3]");
    }
}
