mod constraint_operation_error;
mod propagation_status;
mod propositional_conjunction;
mod solution;

pub use constraint_operation_error::ConstraintOperationError;
pub(crate) use propagation_status::*;
pub use propositional_conjunction::PropositionalConjunction;
pub use solution::*;
