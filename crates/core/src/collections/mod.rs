//! Base persistent containers.
//!
//! These are the provided primitives underneath the coercion engine and the
//! indexed collection: an insertion-ordered map, a list, and a generic map.
//! All three share the same contract — every operation that would mutate
//! returns a fresh value built from the receiver, which stays observable and
//! unchanged.

mod list;
mod map_value;
mod ordered_map;

pub use list::List;
pub use map_value::MapValue;
pub use ordered_map::OrderedMap;
