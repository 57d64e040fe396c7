//! tessera-core: the shared data model for the Tessera collection library.
//!
//! Three pieces live here:
//! - [`value`]: the runtime [`Value`] enum that coerced data is made of,
//! - [`descriptor`]: the explicitly-constructed [`TypeDescriptor`] tree that
//!   describes an expected value shape,
//! - [`collections`]: the base persistent containers ([`OrderedMap`],
//!   [`List`], [`MapValue`]) that both the coercion engine and the indexed
//!   collection build on.
//!
//! Everything is an immutable value type: "mutating" operations return a new
//! value and never touch the receiver.

pub mod collections;
pub mod descriptor;
pub mod value;

pub use collections::{List, MapValue, OrderedMap};
pub use descriptor::{
    ClassBuilder, ClassDescriptor, DefaultSupplier, FieldDescriptor, IgnoreUnknown,
    ReferenceDescriptor, ReferenceTarget, TypeDescriptor,
};
pub use value::{RecordValue, Value};
