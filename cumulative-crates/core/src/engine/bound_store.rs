use thiserror::Error;

use crate::engine::VariableId;
use crate::propagators::cumulative::InferenceRecord;

/// Read-only access to the bounds of integer variables.
///
/// Implemented by the bound storage itself and by snapshots of the domains at an earlier point
/// of the search, which is what the explanations are computed against.
pub trait ReadDomains {
    fn lower_bound(&self, variable: VariableId) -> i32;

    fn upper_bound(&self, variable: VariableId) -> i32;

    fn is_fixed(&self, variable: VariableId) -> bool {
        self.lower_bound(variable) == self.upper_bound(variable)
    }
}

/// Returned by a [`BoundStore`] when a tightening would cross the opposite bound.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("tightening the bound would empty the domain")]
pub struct EmptyDomain;

/// The bound storage which owns the domains of the start-time (and indicator) variables.
///
/// Every bound write of the engine goes through this trait so that the storage can reject
/// tightenings, record undo information, and store the [`InferenceRecord`] which is later handed
/// back to the constraint when a reason for the change is requested.
pub trait BoundStore: ReadDomains {
    /// Tightens the lower bound of `variable` to `new_lower_bound`.
    ///
    /// Returns `Ok(true)` if the bound changed, `Ok(false)` if the new bound does not improve the
    /// current one, and [`EmptyDomain`] if it exceeds the upper bound.
    fn tighten_lower_bound(
        &mut self,
        variable: VariableId,
        new_lower_bound: i32,
        reason: InferenceRecord,
    ) -> Result<bool, EmptyDomain>;

    /// Tightens the upper bound of `variable` to `new_upper_bound`; see
    /// [`BoundStore::tighten_lower_bound`].
    fn tighten_upper_bound(
        &mut self,
        variable: VariableId,
        new_upper_bound: i32,
        reason: InferenceRecord,
    ) -> Result<bool, EmptyDomain>;
}
