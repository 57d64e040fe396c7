use tessera_coerce::CoerceError;

/// All errors the indexed collection can return.
///
/// `UnsupportedIndexKey`, `CorruptIndex`, and `MissingGroupMetadata` are
/// structural: they indicate a programming error in key construction or a
/// violated collection invariant, not bad external input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("unsupported index key shape: {kind}")]
    UnsupportedIndexKey { kind: String },

    #[error("group '{group}' references a key missing from the primary map")]
    CorruptIndex { group: String },

    #[error("group '{group}' has no metadata entry")]
    MissingGroupMetadata { group: String },

    #[error("untyped input must be a list, got {got}")]
    NotAList { got: String },

    #[error(transparent)]
    Coerce(#[from] CoerceError),
}
