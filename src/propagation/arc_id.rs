use crate::containers::StorageKey;

/// An arc id is an index into the engine's arc store, and is the handle through which the
/// scheduling machinery refers to a registered arc.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct ArcId(pub(crate) u32);

impl StorageKey for ArcId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ArcId(index as u32)
    }
}

impl std::fmt::Display for ArcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ArcId({})", self.0)
    }
}
