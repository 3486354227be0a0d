//! Entity trait: identity + soft-delete lifecycle.

/// Entity marker + minimal interface.
///
/// Entities in this system are never physically removed; deletion sets a flag
/// and every lookup filters on it.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether the entity has been soft-deleted.
    fn is_deleted(&self) -> bool;

    /// Live entities are the only ones lookups may return.
    fn is_live(&self) -> bool {
        !self.is_deleted()
    }
}
