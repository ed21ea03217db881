pub mod q_table;

/// A trait for state and action types that can be used as keys in a [`HashMap`](std::collections::HashMap)
pub trait Hashable: Copy + Eq + std::hash::Hash {}

impl<T> Hashable for T where T: Copy + Eq + std::hash::Hash {}

/// A state that can be reduced to a compact key for table lookups
///
/// States that present the same decision to the agent should map to the same key,
/// so the table generalizes across observations it has never seen verbatim.
pub trait Canonical {
    type Key: Hashable;

    fn canonical_key(&self) -> Self::Key;
}
