use std::cmp::Reverse;

use itertools::Itertools;

use super::bound_predicates;
use super::prior_bound;
use super::window_predicates;
use super::BoundChangeContext;
use crate::basic_types::PropositionalConjunction;
use crate::cumulative_assert_simple;
use crate::engine::ReadDomains;
use crate::math::num_ext::NumExt;
use crate::propagators::cumulative::energetic_reasoning::left_shift;
use crate::propagators::cumulative::energetic_reasoning::minimal_intersection;
use crate::propagators::cumulative::energetic_reasoning::right_shift;
use crate::propagators::cumulative::CumulativeExplanationType;
use crate::propagators::cumulative::CumulativeParameters;
use crate::propagators::cumulative::InferenceRecord;
use crate::propagators::cumulative::Job;
use crate::propagators::cumulative::JobId;

/// The relevant jobs (other than `excluded`) whose domains lie within `[est, lct)`, in order
/// of decreasing energy.
fn nested_jobs<'a, Domains: ReadDomains + ?Sized>(
    parameters: &'a CumulativeParameters,
    domains: &'a Domains,
    excluded: Option<JobId>,
    est: i32,
    lct: i32,
) -> Vec<&'a Job> {
    parameters
        .relevant_jobs()
        .filter(|job| Some(job.id) != excluded)
        .filter(|job| job.est(domains) >= est && job.lct(domains) <= lct)
        .sorted_by_key(|job| (Reverse(job.energy()), job.id))
        .collect()
}

/// Explains that the jobs within `[est, lct)` need more energy than the window provides.
pub(crate) fn explain_window_overload<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    domains: &Domains,
    est: i32,
    lct: i32,
) -> PropositionalConjunction {
    let available = parameters.capacity as i64 * (lct - est) as i64;
    let mut energy = 0;
    let mut explanation = PropositionalConjunction::default();

    for job in nested_jobs(parameters, domains, None, est, lct) {
        energy += job.energy();
        explanation.extend(window_predicates(job, est, lct));
        if parameters.options.explanation_type == CumulativeExplanationType::Short
            && energy > available
        {
            break;
        }
    }

    cumulative_assert_simple!(
        energy > available,
        "the jobs in [{est}, {lct}) do not overload the resource"
    );
    explanation
}

/// Explains a bound change made by edge-finding.
///
/// With `E` the energy of the jobs nested in `[est, lct)`, the explained job `i` cannot end
/// within the window because `E + e_i` exceeds the available energy. It therefore occupies the
/// end (forward) or the start (backward) of the window, and the energy
/// `E - (C - c_i) * (lct - est)` which the nested jobs cannot place next to it pushes its start
/// by `ceil(rest / c_i)`.
pub(crate) fn explain_edge_finding<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    record: InferenceRecord,
    context: &BoundChangeContext<'_, Domains>,
) -> PropositionalConjunction {
    let job = &parameters.jobs[record.job()];
    let (est, lct) = (record.est(), record.lct());
    cumulative_assert_simple!(est < lct, "edge-finding window [{est}, {lct}) is empty");
    let new_bound = context.predicate.get_right_hand_side();

    let required_shift = if context.predicate.is_lower_bound_predicate() {
        new_bound - est
    } else {
        lct - job.duration - new_bound
    };
    let width = (lct - est) as i64;
    let capacity = parameters.capacity as i64;
    let demand = job.demand as i64;
    let is_sufficient = |energy: i64| {
        let rest = energy - (capacity - demand) * width;
        energy + job.energy() > capacity * width
            && rest > 0
            && <i64 as NumExt>::div_ceil(rest, demand) >= required_shift as i64
    };

    let mut explanation = PropositionalConjunction::default();
    explanation.push(prior_bound(context));

    let mut energy = 0;
    for other in nested_jobs(parameters, context.domains, Some(job.id), est, lct) {
        energy += other.energy();
        explanation.extend(window_predicates(other, est, lct));
        if parameters.options.explanation_type == CumulativeExplanationType::Short
            && is_sufficient(energy)
        {
            break;
        }
    }

    cumulative_assert_simple!(
        is_sufficient(energy),
        "the jobs in [{est}, {lct}) do not justify {}",
        context.predicate
    );
    explanation
}

/// Explains that the minimal energy which the jobs need in `[est, lct)` exceeds the available
/// energy.
pub(crate) fn explain_energetic_overload<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    domains: &Domains,
    est: i32,
    lct: i32,
) -> PropositionalConjunction {
    let available = parameters.capacity as i64 * (lct - est) as i64;
    let mut energy = 0;
    let mut explanation = PropositionalConjunction::default();

    for (job, required) in parameters
        .relevant_jobs()
        .map(|job| {
            let required = minimal_intersection(job, domains, est, lct) * job.demand as i64;
            (job, required)
        })
        .filter(|&(_, required)| required > 0)
        .sorted_by_key(|&(job, required)| (Reverse(required), job.id))
    {
        energy += required;
        explanation.extend(bound_predicates(job, domains));
        if parameters.options.explanation_type == CumulativeExplanationType::Short
            && energy > available
        {
            break;
        }
    }

    cumulative_assert_simple!(
        energy > available,
        "the jobs intersecting [{est}, {lct}) do not overload the resource"
    );
    explanation
}

/// Explains a bound change made by energetic reasoning.
///
/// Every other job intersecting `[est, lct)` is part of the explanation with its bounds. With
/// `x` the number of time units which the explained job can still occupy in the window, it
/// cannot start before `lct - x` (or end after `est + x`).
pub(crate) fn explain_energetic_reasoning<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    record: InferenceRecord,
    context: &BoundChangeContext<'_, Domains>,
) -> PropositionalConjunction {
    let job = &parameters.jobs[record.job()];
    let (est, lct) = (record.est(), record.lct());
    let domains = context.domains;

    let mut explanation = PropositionalConjunction::default();
    explanation.push(prior_bound(context));

    let mut energy = 0;
    for other in parameters.relevant_jobs().filter(|other| other.id != job.id) {
        let required = minimal_intersection(other, domains, est, lct) * other.demand as i64;
        if required > 0 {
            energy += required;
            explanation.extend(bound_predicates(other, domains));
        }
    }

    let available = parameters.capacity as i64 * (lct - est) as i64 - energy;
    let units = <i64 as NumExt>::div_floor(available, job.demand as i64);
    let new_bound = context.predicate.get_right_hand_side() as i64;
    let is_sufficient = if context.predicate.is_lower_bound_predicate() {
        left_shift(job, domains, est, lct) > units && new_bound <= lct as i64 - units
    } else {
        right_shift(job, domains, est, lct) > units
            && new_bound >= est as i64 + units - job.duration as i64
    };

    cumulative_assert_simple!(
        is_sufficient,
        "the jobs intersecting [{est}, {lct}) do not justify {}",
        context.predicate
    );
    explanation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conjunction;
    use crate::engine::TestSolver;
    use crate::predicate;
    use crate::propagators::cumulative::ArgJob;
    use crate::propagators::cumulative::CumulativeOptions;
    use crate::propagators::cumulative::CumulativeRule;

    fn options(explanation_type: CumulativeExplanationType) -> CumulativeOptions {
        CumulativeOptions {
            explanation_type,
            ..Default::default()
        }
    }

    #[test]
    fn short_overload_explanation_stops_when_sufficient() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 1);
        let b = solver.new_variable(0, 1);
        let c = solver.new_variable(0, 2);
        let jobs = [
            ArgJob::new(a, 2, 1),
            ArgJob::new(b, 2, 1),
            ArgJob::new(c, 1, 1),
        ];

        let short = CumulativeParameters::new(&jobs, 1, options(CumulativeExplanationType::Short));
        let naive = CumulativeParameters::new(&jobs, 1, options(CumulativeExplanationType::Naive));

        // All jobs lie within [0, 3) and need 5 units of energy; a and b already need 4
        let short_explanation = explain_window_overload(&short, &solver, 0, 3);
        let naive_explanation = explain_window_overload(&naive, &solver, 0, 3);

        assert_eq!(
            short_explanation,
            conjunction!([a >= 0] & [a <= 1] & [b >= 0] & [b <= 1])
        );
        assert_eq!(naive_explanation.len(), 6);
        assert!(solver.holds(&short_explanation));
    }

    #[test]
    fn edge_finding_explanation_contains_nested_jobs() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 3);
        let b = solver.new_variable(0, 3);
        let c = solver.new_variable(0, 10);
        let parameters = CumulativeParameters::new(
            &[
                ArgJob::new(a, 2, 1),
                ArgJob::new(b, 2, 1),
                ArgJob::new(c, 2, 1),
            ],
            1,
            options(CumulativeExplanationType::Naive),
        );

        // a and b fill [0, 5) with 4 of its 5 units, so c cannot end by 5 and starts at 4 or
        // later
        let record = InferenceRecord::new(CumulativeRule::EdgeFinding, JobId::new(2), 0, 5);
        let explanation = explain_edge_finding(
            &parameters,
            record,
            &BoundChangeContext::new(predicate!(c >= 4), &solver),
        );

        assert_eq!(
            explanation,
            conjunction!([c >= 0] & [a >= 0] & [a <= 3] & [b >= 0] & [b <= 3])
        );
    }
}
