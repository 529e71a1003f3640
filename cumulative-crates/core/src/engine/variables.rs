use std::fmt::Debug;
use std::fmt::Display;

use crate::containers::StorageKey;

/// An opaque identifier of an integer variable owned by the bound storage.
///
/// The engine never stores bounds itself; it only refers to variables by their identifier and
/// reads or tightens their bounds through [`crate::engine::BoundStore`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId {
    pub id: u32,
}

impl VariableId {
    pub const fn new(id: u32) -> Self {
        VariableId { id }
    }
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId { id: index as u32 }
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

impl Debug for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}
