use super::PropositionalConjunction;
use crate::propagators::cumulative::CumulativeRule;

/// The result of invoking one of the cumulative reasoning rules. The propagation can either
/// succeed or identify a conflict. The necessary conditions for the conflict must be captured in
/// the error variant, i.e. a propositional conjunction.
pub(crate) type PropagationStatus = Result<(), PropagatorConflict>;

/// A conflict stated by one of the cumulative reasoning rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PropagatorConflict {
    /// The conjunction that describes the infeasible partial assignment.
    pub(crate) conjunction: PropositionalConjunction,
    /// The rule that identified the conflict; `None` for conflicts which do not depend on the
    /// bounds of the jobs.
    pub(crate) rule: Option<CumulativeRule>,
}

impl PropagatorConflict {
    pub(crate) fn new(conjunction: PropositionalConjunction, rule: CumulativeRule) -> Self {
        PropagatorConflict {
            conjunction,
            rule: Some(rule),
        }
    }
}
