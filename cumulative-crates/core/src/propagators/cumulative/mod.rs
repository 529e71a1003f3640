//! Contains the cumulative constraint.
//!
//! The cumulative constraint states that a set of jobs, each with a start time variable, a
//! duration, and a demand, never use more than the capacity of a renewable resource:
//!
//! ```text
//! ∀ t: Σ_{j : s_j <= t < s_j + p_j} c_j <= C
//! ```
//!
//! The constraint is propagated by a fixed sequence of reasoning rules of increasing strength
//! and cost (see [`CumulativeRule`]); which rules are run and how their explanations are created
//! is determined by the [`CumulativeOptions`]. Every bound change is tagged with an
//! [`InferenceRecord`] from which its reason is created lazily. The constraint also offers a
//! linear relaxation over the time-indexed indicator variables of the jobs.
mod checker;
mod cumulative_constraint;
mod edge_finding;
mod energetic_reasoning;
pub(crate) mod explanations;
mod inference;
mod options;
mod propagation_context;
mod redundancy;
mod relaxation;
mod time_table;
mod utils;

pub use checker::CapacityViolation;
pub use cumulative_constraint::CumulativeConstraint;
pub use cumulative_constraint::CumulativeStatistics;
pub use cumulative_constraint::PropagationResult;
pub use cumulative_constraint::SeparationResult;
pub use explanations::BoundChangeContext;
pub use inference::CumulativeRule;
pub use inference::InferenceRecord;
pub use options::*;
pub use utils::*;
