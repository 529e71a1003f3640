use crate::containers::StorageKey;
use crate::engine::VariableId;

/// A handle to a row owned by a [`RowSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowId {
    pub id: u32,
}

impl StorageKey for RowId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        RowId { id: index as u32 }
    }
}

/// The linear relaxation which consumes the rows of the constraint.
pub trait RowSink {
    /// Creates an empty row `lhs <= ... <= rhs`; a local row is only valid in the current
    /// sub-problem.
    fn create_row(&mut self, name: &str, lhs: f64, rhs: f64, local: bool) -> RowId;

    fn add_coefficient(&mut self, row: RowId, variable: VariableId, coefficient: f64);

    /// Signals that no more coefficients will be added to the row.
    fn commit_row(&mut self, row: RowId);

    /// Adds the row as a cutting plane to the relaxation; returns `true` if the relaxation
    /// became infeasible.
    fn add_cut_to_relaxation(&mut self, row: RowId) -> bool;

    /// Adds the row to the problem as a standalone linear constraint.
    fn add_row_as_constraint(&mut self, row: RowId);

    /// Releases a row which the constraint will no longer use.
    fn release_row(&mut self, row: RowId);
}
