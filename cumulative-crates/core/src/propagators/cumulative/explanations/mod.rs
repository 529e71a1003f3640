//! Contains the explanations of the bound changes and conflicts of the cumulative constraint.
//!
//! Bound changes are explained lazily: every change carries an [`InferenceRecord`], and when the
//! search asks for the reason of a change, the reasoning is replayed against the domains just
//! before the change. All explanations are sufficient by construction; an insufficient
//! explanation is a defect and results in a panic.
pub(crate) mod core_times;
pub(crate) mod energy;

use crate::basic_types::PropositionalConjunction;
use crate::engine::predicates::Predicate;
use crate::engine::ReadDomains;
use crate::predicate;
use crate::propagators::cumulative::CumulativeParameters;
use crate::propagators::cumulative::CumulativeRule;
use crate::propagators::cumulative::InferenceRecord;
use crate::propagators::cumulative::Job;

/// The bound change which should be explained; `domains` are the domains just before the
/// change was made.
#[derive(Debug)]
pub struct BoundChangeContext<'a, Domains: ReadDomains + ?Sized> {
    pub predicate: Predicate,
    pub domains: &'a Domains,
}

impl<'a, Domains: ReadDomains + ?Sized> BoundChangeContext<'a, Domains> {
    pub fn new(predicate: Predicate, domains: &'a Domains) -> Self {
        BoundChangeContext { predicate, domains }
    }
}

/// Creates the reason for `predicate`, which was propagated with `record`.
pub(crate) fn create_explanation<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    record: InferenceRecord,
    context: &BoundChangeContext<'_, Domains>,
) -> PropositionalConjunction {
    match record.rule() {
        CumulativeRule::CoreTimes | CumulativeRule::CoreTimeHoles => {
            core_times::explain_bound_change(parameters, record, context)
        }
        CumulativeRule::EdgeFinding => energy::explain_edge_finding(parameters, record, context),
        CumulativeRule::EnergeticReasoning => {
            energy::explain_energetic_reasoning(parameters, record, context)
        }
        CumulativeRule::OverloadCheck => {
            panic!("the overload check does not change bounds, cannot explain {record:?}")
        }
    }
}

/// The bound of the explained variable before the change, of the same kind as the change.
fn prior_bound<Domains: ReadDomains + ?Sized>(context: &BoundChangeContext<'_, Domains>) -> Predicate {
    let variable = context.predicate.get_variable();
    if context.predicate.is_lower_bound_predicate() {
        predicate!(variable >= context.domains.lower_bound(variable))
    } else {
        predicate!(variable <= context.domains.upper_bound(variable))
    }
}

/// The predicates stating that `job` lies within `[est, lct)`.
fn window_predicates(job: &Job, est: i32, lct: i32) -> [Predicate; 2] {
    [
        predicate!(job.start_variable >= est),
        predicate!(job.start_variable <= lct - job.duration),
    ]
}

/// The predicates stating the current bounds of `job`.
fn bound_predicates<Domains: ReadDomains + ?Sized>(job: &Job, domains: &Domains) -> [Predicate; 2] {
    [
        predicate!(job.start_variable >= job.est(domains)),
        predicate!(job.start_variable <= job.lst(domains)),
    ]
}
