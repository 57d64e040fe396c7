//! tessera-indexed: an immutable insertion-ordered map with a secondary
//! group index keyed by deterministic composite-key strings.
//!
//! [`IndexedOrderedMap`] keeps every value individually addressable in the
//! primary map while the group operations maintain named, ordered member
//! lists with per-group metadata. Group keys are arbitrary indexable
//! [`tessera_core::Value`]s reduced to canonical strings by
//! [`serialize_index_key`], so structurally equal keys always address the
//! same group.

mod collection;
mod error;
mod key;

pub use collection::{IndexedOrderedMap, Keyed};
pub use error::CollectionError;
pub use key::{serialize_index_key, IndexKey, NULL_KEY, UNDEFINED_KEY};
