use std::cmp::Reverse;

use itertools::Itertools;

use super::prior_bound;
use super::BoundChangeContext;
use crate::basic_types::PropositionalConjunction;
use crate::cumulative_assert_moderate;
use crate::cumulative_assert_simple;
use crate::engine::ReadDomains;
use crate::predicate;
use crate::propagators::cumulative::CumulativeParameters;
use crate::propagators::cumulative::CumulativeRule;
use crate::propagators::cumulative::InferenceRecord;
use crate::propagators::cumulative::Job;
use crate::propagators::cumulative::JobId;
use crate::propagators::cumulative::ResourceProfile;

/// Explains a conflict found while building the profile: the cores at `time` exceed the
/// capacity.
///
/// The cores covering `time` are added in order of decreasing demand until their demand exceeds
/// the capacity, which gives the smallest set of jobs overlapping at `time`.
pub(crate) fn explain_overload_at<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    domains: &Domains,
    time: i32,
) -> PropositionalConjunction {
    let mut explanation = PropositionalConjunction::default();
    let mut demand = 0;
    for job in parameters
        .relevant_jobs()
        .filter(|job| {
            job.core(domains)
                .is_some_and(|(start, end)| start <= time && time < end)
        })
        .sorted_by_key(|job| Reverse(job.demand))
    {
        demand += job.demand;
        explanation.push(predicate!(job.start_variable >= time + 1 - job.duration));
        explanation.push(predicate!(job.start_variable <= time));
        if demand > parameters.capacity {
            break;
        }
    }

    cumulative_assert_simple!(
        demand > parameters.capacity,
        "the cores at time {time} do not overload the resource"
    );
    explanation
}

/// Explains a bound change made by core-time reasoning, or an indicator fixed by hole
/// propagation.
///
/// The window `[est, lct)` of the record covers every time point of the forbidden placements of
/// the job. Each other job contributes the part of its core inside the window, stated with the
/// weakest bounds which still give that part of the core.
pub(crate) fn explain_bound_change<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    record: InferenceRecord,
    context: &BoundChangeContext<'_, Domains>,
) -> PropositionalConjunction {
    let job = &parameters.jobs[record.job()];
    let (est, lct) = (record.est(), record.lct());
    let domains = context.domains;

    let mut explanation = PropositionalConjunction::default();
    explanation.push(prior_bound(context));

    let mut profile = ResourceProfile::new(parameters.capacity);
    for other in cores_in_window(parameters, domains, record.job(), est, lct) {
        let (start, end) = other.core(domains).unwrap_or_default();
        let (start, end) = (start.max(est), end.min(lct));
        explanation.push(predicate!(other.start_variable >= end - other.duration));
        explanation.push(predicate!(other.start_variable <= start));
        let _ = profile.insert_interval(start, end, other.demand);
    }

    cumulative_assert_moderate!(
        forbids_placements(&profile, job, record, context),
        "the cores in [{est}, {lct}) do not justify {}",
        context.predicate
    );
    explanation
}

fn cores_in_window<'a, Domains: ReadDomains + ?Sized>(
    parameters: &'a CumulativeParameters,
    domains: &'a Domains,
    excluded: JobId,
    est: i32,
    lct: i32,
) -> impl Iterator<Item = &'a Job> + 'a {
    parameters.relevant_jobs().filter(move |job| {
        job.id != excluded
            && job
                .core(domains)
                .is_some_and(|(start, end)| start < lct && end > est)
    })
}

/// Whether the profile forbids every placement which the bound change removed.
fn forbids_placements<Domains: ReadDomains + ?Sized>(
    profile: &ResourceProfile,
    job: &Job,
    record: InferenceRecord,
    context: &BoundChangeContext<'_, Domains>,
) -> bool {
    let variable = context.predicate.get_variable();
    let new_bound = context.predicate.get_right_hand_side();

    if record.rule() == CumulativeRule::CoreTimeHoles {
        return !profile.is_feasible_start(record.est(), job.duration, job.demand);
    }

    if context.predicate.is_lower_bound_predicate() {
        let prior = context.domains.lower_bound(variable);
        profile
            .earliest_feasible_start(prior, new_bound - 1, job.duration, job.demand)
            .is_none()
    } else {
        let prior = context.domains.upper_bound(variable);
        profile
            .latest_feasible_start(new_bound + 1, prior, job.duration, job.demand)
            .is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conjunction;
    use crate::engine::BoundStore;
    use crate::engine::TestSolver;
    use crate::propagators::cumulative::ArgJob;
    use crate::propagators::cumulative::CumulativeOptions;

    #[test]
    fn overload_explanation_uses_largest_demands() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 0);
        let b = solver.new_variable(1, 1);
        let c = solver.new_variable(0, 2);
        let parameters = CumulativeParameters::new(
            &[
                ArgJob::new(a, 3, 2),
                ArgJob::new(b, 3, 2),
                ArgJob::new(c, 3, 1),
            ],
            3,
            CumulativeOptions::default(),
        );

        let explanation = explain_overload_at(&parameters, &solver, 2);

        assert_eq!(
            explanation,
            conjunction!([a >= 0] & [a <= 2] & [b >= 0] & [b <= 2])
        );
        // c also covers time 2 but is not needed
        assert_eq!(explanation.len(), 4);
    }

    #[test]
    fn lower_bound_explanation_contains_overlapping_cores() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(1, 2);
        let b = solver.new_variable(0, 6);
        let far = solver.new_variable(20, 20);
        let parameters = CumulativeParameters::new(
            &[
                ArgJob::new(a, 4, 1),
                ArgJob::new(b, 3, 1),
                ArgJob::new(far, 2, 1),
            ],
            1,
            CumulativeOptions::default(),
        );
        // The core of a is [2, 5); b cannot start in [0, 5)
        let record = InferenceRecord::new(CumulativeRule::CoreTimes, JobId::new(1), 0, 7);
        let _ = solver.tighten_lower_bound(b, 5, record).unwrap();

        let position = solver.position_of(predicate!(b >= 5)).unwrap();
        let snapshot = solver.domains_before(position);
        let explanation = explain_bound_change(
            &parameters,
            record,
            &BoundChangeContext::new(predicate!(b >= 5), &snapshot),
        );

        assert_eq!(explanation, conjunction!([b >= 0] & [a >= 1] & [a <= 2]));
    }
}
