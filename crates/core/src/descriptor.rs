//! Type descriptors.
//!
//! A [`TypeDescriptor`] is an immutable, explicitly-constructed tree that
//! describes an expected value shape. Descriptors are built ahead of time —
//! by hand through [`ClassBuilder`], by a build step, or from a schema — and
//! passed into every coercion call; nothing is ever reflected off a live
//! value. The engine treats the tree as read-only for the life of the
//! process.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::value::Value;

/// Produces the default value for a class field that is absent from input.
pub type DefaultSupplier = Arc<dyn Fn() -> Value + Send + Sync>;

// ──────────────────────────────────────────────
// Descriptor tree
// ──────────────────────────────────────────────

/// An expected value shape.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    StringLiteral(String),
    NumberLiteral(Decimal),
    BooleanLiteral(bool),
    /// A composite shape: a generic container, a temporal value, or a class.
    Reference(ReferenceDescriptor),
    /// Ordered alternatives. Member order is the declared priority order;
    /// the engine additionally tries non-absence members first.
    Union(Vec<TypeDescriptor>),
}

/// A reference to a composite shape, with its type arguments.
#[derive(Debug, Clone)]
pub struct ReferenceDescriptor {
    pub target: ReferenceTarget,
    pub type_arguments: Vec<TypeDescriptor>,
}

/// What a [`ReferenceDescriptor`] points at.
#[derive(Debug, Clone)]
pub enum ReferenceTarget {
    /// An ordered sequence; one type argument (the element shape).
    List,
    /// A key→value map; two type arguments (key shape, value shape).
    Map,
    /// A textual instant; no type arguments.
    Timestamp,
    /// A class-like record with an inheritance chain.
    Class(Arc<ClassDescriptor>),
}

impl TypeDescriptor {
    pub fn list(element: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Reference(ReferenceDescriptor {
            target: ReferenceTarget::List,
            type_arguments: vec![element],
        })
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Reference(ReferenceDescriptor {
            target: ReferenceTarget::Map,
            type_arguments: vec![key, value],
        })
    }

    pub fn timestamp() -> TypeDescriptor {
        TypeDescriptor::Reference(ReferenceDescriptor {
            target: ReferenceTarget::Timestamp,
            type_arguments: Vec::new(),
        })
    }

    pub fn class(class: Arc<ClassDescriptor>) -> TypeDescriptor {
        TypeDescriptor::Reference(ReferenceDescriptor {
            target: ReferenceTarget::Class(class),
            type_arguments: Vec::new(),
        })
    }

    /// Shorthand for `Union[ty, Undefined]`.
    pub fn optional(ty: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Union(vec![ty, TypeDescriptor::Undefined])
    }

    /// Whether an absent input is acceptable for this shape.
    pub fn admits_absence(&self) -> bool {
        match self {
            TypeDescriptor::Undefined => true,
            TypeDescriptor::Union(members) => members
                .iter()
                .any(|m| matches!(m, TypeDescriptor::Undefined)),
            _ => false,
        }
    }

    /// Compact human-readable rendering for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TypeDescriptor::String => "String".to_string(),
            TypeDescriptor::Number => "Number".to_string(),
            TypeDescriptor::Boolean => "Boolean".to_string(),
            TypeDescriptor::Null => "Null".to_string(),
            TypeDescriptor::Undefined => "Undefined".to_string(),
            TypeDescriptor::StringLiteral(s) => format!("\"{}\"", s),
            TypeDescriptor::NumberLiteral(d) => d.to_string(),
            TypeDescriptor::BooleanLiteral(b) => b.to_string(),
            TypeDescriptor::Reference(reference) => reference.describe(),
            TypeDescriptor::Union(members) => members
                .iter()
                .map(TypeDescriptor::describe)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

impl ReferenceDescriptor {
    pub fn describe(&self) -> String {
        match &self.target {
            ReferenceTarget::List => match self.type_arguments.first() {
                Some(element) => format!("List<{}>", element.describe()),
                None => "List<?>".to_string(),
            },
            ReferenceTarget::Map => {
                let key = self.type_arguments.first().map(TypeDescriptor::describe);
                let value = self.type_arguments.get(1).map(TypeDescriptor::describe);
                format!(
                    "Map<{}, {}>",
                    key.as_deref().unwrap_or("?"),
                    value.as_deref().unwrap_or("?")
                )
            }
            ReferenceTarget::Timestamp => "Timestamp".to_string(),
            ReferenceTarget::Class(class) => class.name.clone(),
        }
    }
}

// ──────────────────────────────────────────────
// Classes
// ──────────────────────────────────────────────

/// Which input fields undeclared by the class (or its ancestors) are
/// silently dropped instead of retained-with-diagnostic.
#[derive(Debug, Clone, Default)]
pub enum IgnoreUnknown {
    #[default]
    None,
    Fields(BTreeSet<String>),
    All,
}

/// A class-like record shape: an ordered field list plus an optional parent
/// forming a single-inheritance chain.
#[derive(Clone)]
pub struct ClassDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub parent: Option<Arc<ClassDescriptor>>,
    pub ignore_unknown: IgnoreUnknown,
}

/// One declared field of a class.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
    pub default: Option<DefaultSupplier>,
}

impl ClassDescriptor {
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            fields: Vec::new(),
            parent: None,
            ignore_unknown: IgnoreUnknown::None,
        }
    }

    /// The field sources to resolve against, closest-first: this class, then
    /// its parent, and so on up the chain.
    pub fn field_sources(&self) -> FieldSources<'_> {
        FieldSources {
            next: Some(self),
        }
    }

    /// Finds the descriptor for a field name anywhere in the chain. The
    /// closest declaration wins, so a child field shadows an ancestor field
    /// of the same name.
    pub fn resolve_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_sources()
            .find_map(|source| source.fields.iter().find(|f| f.name == name))
    }

    /// Whether an undeclared input field by this name should be dropped
    /// silently. Marks anywhere in the chain apply, so a subclass inherits
    /// its ancestors' ignore marks.
    pub fn ignores(&self, name: &str) -> bool {
        self.field_sources()
            .any(|source| match &source.ignore_unknown {
                IgnoreUnknown::None => false,
                IgnoreUnknown::Fields(names) => names.contains(name),
                IgnoreUnknown::All => true,
            })
    }

    /// Whether `name` is this class or one of its ancestors.
    pub fn chain_contains(&self, name: &str) -> bool {
        self.field_sources().any(|source| source.name == name)
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("parent", &self.parent.as_ref().map(|p| &p.name))
            .field("ignore_unknown", &self.ignore_unknown)
            .finish()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

/// Iterator over an inheritance chain, closest-first.
pub struct FieldSources<'a> {
    next: Option<&'a ClassDescriptor>,
}

impl<'a> Iterator for FieldSources<'a> {
    type Item = &'a ClassDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

/// Builder for hand-constructed class descriptors.
pub struct ClassBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    parent: Option<Arc<ClassDescriptor>>,
    ignore_unknown: IgnoreUnknown,
}

impl ClassBuilder {
    pub fn field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            ty,
            default: None,
        });
        self
    }

    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        ty: TypeDescriptor,
        default: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            ty,
            default: Some(Arc::new(default)),
        });
        self
    }

    /// Declares a field whose shape is `Union[ty, Undefined]`.
    pub fn optional_field(self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.field(name, TypeDescriptor::optional(ty))
    }

    pub fn parent(mut self, parent: Arc<ClassDescriptor>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Marks one undeclared input field name as ignorable.
    pub fn ignore(mut self, name: impl Into<String>) -> Self {
        self.ignore_unknown = match self.ignore_unknown {
            IgnoreUnknown::All => IgnoreUnknown::All,
            IgnoreUnknown::None => IgnoreUnknown::Fields(BTreeSet::from([name.into()])),
            IgnoreUnknown::Fields(mut names) => {
                names.insert(name.into());
                IgnoreUnknown::Fields(names)
            }
        };
        self
    }

    /// Marks every undeclared input field as ignorable.
    pub fn ignore_all(mut self) -> Self {
        self.ignore_unknown = IgnoreUnknown::All;
        self
    }

    pub fn build(self) -> Arc<ClassDescriptor> {
        Arc::new(ClassDescriptor {
            name: self.name,
            fields: self.fields,
            parent: self.parent,
            ignore_unknown: self.ignore_unknown,
        })
    }
}
