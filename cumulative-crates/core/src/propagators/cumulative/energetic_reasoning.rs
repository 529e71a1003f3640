//! Contains energetic reasoning, which compares the energy which the jobs need within a time
//! window with the energy which the window provides.
//!
//! The windows which are considered are spanned by an earliest start time and a latest
//! completion time of two (not necessarily different) jobs. The part of a job which has to
//! execute within a window `[a, b)` regardless of its start time is its minimal intersection
//! `min(b - a, p, ect - a, b - lst)`. If the minimal intersections of all jobs except `k` leave
//! room for only `x` time units of `k`, then `k` cannot start at a time where it would
//! occupy more than `x` time units of the window.
//!
//! # Bibliography
//! \[1\] P. Baptiste, C. Le Pape, and W. Nuijten, ‘Satisfiability tests and time-bound
//! adjustments for cumulative scheduling problems’, Annals of Operations Research, vol. 92,
//! pp. 305–333, 1999.
use itertools::Itertools;

use super::explanations::energy::explain_energetic_overload;
use super::propagation_context::PropagationContextMut;
use super::CumulativeParameters;
use super::CumulativeRule;
use super::InferenceRecord;
use super::Job;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::engine::BoundStore;
use crate::engine::ReadDomains;
use crate::math::num_ext::NumExt;
use crate::predicate;

/// The number of time units of `[est, lct)` which `job` occupies in every start time.
pub(crate) fn minimal_intersection<Domains: ReadDomains + ?Sized>(
    job: &Job,
    domains: &Domains,
    est: i32,
    lct: i32,
) -> i64 {
    let width = lct as i64 - est as i64;
    let left = job.ect(domains) as i64 - est as i64;
    let right = lct as i64 - job.lst(domains) as i64;
    width.min(job.duration as i64).min(left).min(right).max(0)
}

/// The number of time units of `[est, lct)` which `job` occupies when it starts as early as
/// possible.
pub(crate) fn left_shift<Domains: ReadDomains + ?Sized>(
    job: &Job,
    domains: &Domains,
    est: i32,
    lct: i32,
) -> i64 {
    let start = job.est(domains).max(est) as i64;
    let end = job.ect(domains).min(lct) as i64;
    (end - start).max(0)
}

/// The number of time units of `[est, lct)` which `job` occupies when it starts as late as
/// possible.
pub(crate) fn right_shift<Domains: ReadDomains + ?Sized>(
    job: &Job,
    domains: &Domains,
    est: i32,
    lct: i32,
) -> i64 {
    let start = job.lst(domains).max(est) as i64;
    let end = job.lct(domains).min(lct) as i64;
    (end - start).max(0)
}

/// The windows `[a, b)` with `a` an earliest start time and `b` a latest completion time of a
/// relevant job, and `a < b`.
fn windows<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    domains: &Domains,
) -> Vec<(i32, i32)> {
    let starts = parameters
        .relevant_jobs()
        .map(|job| job.est(domains))
        .sorted()
        .dedup()
        .collect::<Vec<_>>();
    let ends = parameters
        .relevant_jobs()
        .map(|job| job.lct(domains))
        .sorted()
        .dedup()
        .collect::<Vec<_>>();

    starts
        .iter()
        .cartesian_product(ends.iter())
        .filter(|(start, end)| start < end)
        .map(|(&start, &end)| (start, end))
        .collect()
}

/// Runs energetic reasoning over all windows spanned by the jobs at the start of the call.
pub(crate) fn propagate_energetic_reasoning<Store: BoundStore + ?Sized>(
    context: &mut PropagationContextMut<'_, Store>,
    parameters: &CumulativeParameters,
) -> PropagationStatus {
    let capacity = parameters.capacity as i64;

    for (est, lct) in windows(parameters, context.domains()) {
        let available = capacity * (lct as i64 - est as i64);
        let required = parameters
            .relevant_jobs()
            .map(|job| minimal_intersection(job, context.domains(), est, lct) * job.demand as i64)
            .sum::<i64>();

        if required > available {
            return Err(PropagatorConflict::new(
                explain_energetic_overload(parameters, context.domains(), est, lct),
                CumulativeRule::EnergeticReasoning,
            ));
        }

        for job in parameters.relevant_jobs() {
            let demand = job.demand as i64;
            let own = minimal_intersection(job, context.domains(), est, lct) * demand;
            let units = <i64 as NumExt>::div_floor(available - (required - own), demand);
            let record = InferenceRecord::new(CumulativeRule::EnergeticReasoning, job.id, est, lct);

            if left_shift(job, context.domains(), est, lct) > units {
                let new_lower_bound = (lct as i64 - units) as i32;
                context.post(predicate!(job.start_variable >= new_lower_bound), record)?;
            }
            if right_shift(job, context.domains(), est, lct) > units {
                let new_upper_bound = (est as i64 + units) as i32 - job.duration;
                context.post(predicate!(job.start_variable <= new_upper_bound), record)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TestSolver;
    use crate::propagators::cumulative::ArgJob;
    use crate::propagators::cumulative::CumulativeOptions;
    use crate::propagators::cumulative::JobId;

    #[test]
    fn intersections_of_a_job() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(2, 6);
        let parameters =
            CumulativeParameters::new(&[ArgJob::new(a, 4, 1)], 1, CumulativeOptions::default());
        let job = &parameters.jobs[JobId::new(0)];

        // Every start time occupies at least 2 units of [4, 8)
        assert_eq!(minimal_intersection(job, &solver, 4, 8), 2);
        assert_eq!(minimal_intersection(job, &solver, 0, 4), 0);
        assert_eq!(left_shift(job, &solver, 4, 8), 2);
        assert_eq!(right_shift(job, &solver, 4, 8), 2);
        assert_eq!(left_shift(job, &solver, 0, 4), 2);
        assert_eq!(right_shift(job, &solver, 0, 4), 0);
    }

    #[test]
    fn job_is_pushed_out_of_full_window() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 1);
        let b = solver.new_variable(0, 1);
        let c = solver.new_variable(0, 10);
        let parameters = CumulativeParameters::new(
            &[
                ArgJob::new(a, 3, 1),
                ArgJob::new(b, 3, 1),
                ArgJob::new(c, 2, 2),
            ],
            2,
            CumulativeOptions::default(),
        );

        let mut context = PropagationContextMut::new(&mut solver, &parameters);
        assert!(propagate_energetic_reasoning(&mut context, &parameters).is_ok());

        // a and b use 6 of the 8 units of [0, 4), which leaves room for one time unit of c
        assert_eq!(solver.lower_bound(c), 3);
    }

    #[test]
    fn overloaded_window_is_a_conflict() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 1);
        let b = solver.new_variable(0, 1);
        let c = solver.new_variable(0, 1);
        let parameters = CumulativeParameters::new(
            &[
                ArgJob::new(a, 3, 1),
                ArgJob::new(b, 3, 1),
                ArgJob::new(c, 3, 1),
            ],
            2,
            CumulativeOptions::default(),
        );

        let mut context = PropagationContextMut::new(&mut solver, &parameters);
        let conflict = propagate_energetic_reasoning(&mut context, &parameters)
            .expect_err("the jobs need 9 of the 8 units of [0, 4)");

        assert_eq!(conflict.rule, Some(CumulativeRule::EnergeticReasoning));
        assert!(solver.holds(&conflict.conjunction));
    }
}
