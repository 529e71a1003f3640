//! # Cumulative
//! An engine for the cumulative resource constraint, meant to be embedded in a constraint
//! programming or mixed-integer solver.
//!
//! A [`CumulativeConstraint`] is created from a set of jobs ([`ArgJob`]) and the capacity of the
//! resource. It does not own any variables: the surrounding solver provides the domains of the
//! start times through a [`BoundStore`], receives conflicts through a [`ConflictSink`], and
//! receives the rows of the linear relaxation through a [`RowSink`]. The constraint offers
//! - propagation ([`CumulativeConstraint::propagate`]) with core-time reasoning, the overload
//!   check, edge-finding, and energetic reasoning;
//! - lazy explanations of its bound changes ([`CumulativeConstraint::explain_bound_change`]);
//! - separation of capacity rows and cover cuts ([`CumulativeConstraint::separate`]);
//! - a feasibility check of complete solutions ([`CumulativeConstraint::check`]).
//!
//! # Example
//! ```rust
//! # use cumulative_core::ArgJob;
//! # use cumulative_core::CumulativeConstraint;
//! # use cumulative_core::CumulativeOptions;
//! # use cumulative_core::NoIndicatorVariables;
//! # use cumulative_core::ReadDomains;
//! # use cumulative_core::TestSolver;
//! let mut solver = TestSolver::default();
//! let a = solver.new_variable(0, 0);
//! let b = solver.new_variable(0, 3);
//!
//! let mut constraint = CumulativeConstraint::new(
//!     "machine",
//!     &[ArgJob::new(a, 2, 2), ArgJob::new(b, 2, 1)],
//!     2,
//!     CumulativeOptions::default(),
//! )
//! .expect("the input is valid");
//!
//! let result = constraint.propagate(&mut solver, &NoIndicatorVariables);
//!
//! assert!(!result.cutoff);
//! assert_eq!(solver.lower_bound(b), 2);
//! ```
#[doc(hidden)]
pub mod asserts;
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub(crate) mod math;
pub(crate) mod propagators;
pub mod statistics;

pub use convert_case;
pub use enumset;

pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::Solution;
pub use crate::basic_types::SolutionValues;
pub use crate::engine::test_solver::BoundChange;
pub use crate::engine::test_solver::DomainSnapshot;
pub use crate::engine::test_solver::TestRow;
pub use crate::engine::BoundStore;
pub use crate::engine::ConflictSink;
pub use crate::engine::EmptyDomain;
pub use crate::engine::IndicatorLinking;
pub use crate::engine::IndicatorMap;
pub use crate::engine::NoIndicatorVariables;
pub use crate::engine::ReadDomains;
pub use crate::engine::RowId;
pub use crate::engine::RowSink;
pub use crate::engine::TestSolver;
pub use crate::propagators::cumulative::ArgJob;
pub use crate::propagators::cumulative::BoundChangeContext;
pub use crate::propagators::cumulative::CapacityViolation;
pub use crate::propagators::cumulative::CumulativeConstraint;
pub use crate::propagators::cumulative::CumulativeExplanationType;
pub use crate::propagators::cumulative::CumulativeOptions;
pub use crate::propagators::cumulative::CumulativeRelaxationOptions;
pub use crate::propagators::cumulative::CumulativeRule;
pub use crate::propagators::cumulative::CumulativeStatistics;
pub use crate::propagators::cumulative::InferenceRecord;
pub use crate::propagators::cumulative::JobId;
pub use crate::propagators::cumulative::PropagationResult;
pub use crate::propagators::cumulative::RowMaterialisation;
pub use crate::propagators::cumulative::SeparationResult;

pub mod predicates {
    //! Contains structures which represent bounds on variables and conjunctions of them.
    pub use crate::basic_types::PropositionalConjunction;
    pub use crate::engine::predicates::Predicate;
    pub use crate::engine::predicates::PredicateConstructor;
    pub use crate::engine::predicates::PredicateType;
}

pub mod variables {
    //! Contains the identifiers of the variables which the constraint reasons over.
    pub use crate::engine::VariableId;
}
