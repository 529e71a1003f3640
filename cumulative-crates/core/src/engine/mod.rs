//! The interfaces through which the cumulative constraint talks to the surrounding solver.
mod bound_store;
mod conflict_sink;
mod indicator_linking;
pub(crate) mod predicates;
mod row_sink;
pub(crate) mod test_solver;
mod variables;

pub use bound_store::*;
pub use conflict_sink::ConflictSink;
pub use indicator_linking::*;
pub use row_sink::*;
pub use test_solver::TestSolver;
pub use variables::VariableId;
