use std::cmp::Reverse;

use itertools::Itertools;

use super::energy_jobs;
use super::theta_lambda_tree::ThetaLambdaTree;
use super::Direction;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::engine::BoundStore;
use crate::math::num_ext::NumExt;
use crate::predicate;
use crate::propagators::cumulative::explanations::energy::explain_window_overload;
use crate::propagators::cumulative::propagation_context::PropagationContextMut;
use crate::propagators::cumulative::CumulativeParameters;
use crate::propagators::cumulative::CumulativeRule;
use crate::propagators::cumulative::InferenceRecord;

/// Runs edge-finding in the given direction.
///
/// The jobs are processed in order of non-increasing latest completion time, starting with all
/// jobs in Theta. For the job `j` under consideration, Theta holds exactly the jobs which complete
/// by `lct_j`:
/// - if the envelope of Theta exceeds `C * lct_j`, the jobs in Theta are overloaded;
/// - while the envelope with one job `i` of Lambda exceeds `C * lct_j`, the job `i` has to end
///   after `lct_j` and its earliest start time is updated using the energy `e_Ω` of the jobs in
///   Theta which start no earlier than `est_Ω`:
///   `est_i >= est_Ω + ceil((e_Ω - (C - c_i) * (lct_j - est_Ω)) / c_i)`.
///   The update is skipped when `Ω` is empty, which happens when the envelope is determined by
///   `i` alone. Afterwards `i` is removed from Lambda.
///
/// Finally `j` is moved from Theta to Lambda.
///
/// In the backward direction the time windows are mirrored, hence the earliest start time which
/// is computed is an upper bound on the completion time in the original time.
pub(crate) fn propagate_edge_finding<Store: BoundStore + ?Sized>(
    context: &mut PropagationContextMut<'_, Store>,
    parameters: &CumulativeParameters,
    direction: Direction,
) -> PropagationStatus {
    let jobs = energy_jobs(parameters, context.domains(), direction);
    let capacity = parameters.capacity as i64;
    let mut tree = ThetaLambdaTree::new(&jobs, parameters.capacity);

    for job in jobs.iter().sorted_by_key(|job| Reverse((job.lct, job.id))) {
        let available = capacity * job.lct as i64;

        if tree.envelope() > available {
            let est = tree.envelope_start().unwrap_or(job.est);
            let (est, lct) = original_window(direction, est, job.lct);
            return Err(PropagatorConflict::new(
                explain_window_overload(parameters, context.domains(), est, lct),
                CumulativeRule::EdgeFinding,
            ));
        }

        while tree.envelope_bar() > available {
            let Some(trace) = tree.trace_lambda() else {
                break;
            };
            let lambda_job = trace.lambda_job;
            let demand = lambda_job.demand as i64;

            // Without jobs of Theta inside [est_Ω, lct_j) there is nothing to push against
            let omega_in_window = trace.energy_omega > 0 && trace.est_omega < job.lct;
            let rest = trace.energy_omega
                - (capacity - demand) * (job.lct - trace.est_omega) as i64;
            if omega_in_window && rest > 0 {
                let new_est =
                    trace.est_omega as i64 + <i64 as NumExt>::div_ceil(rest, demand);
                if new_est > lambda_job.est as i64 {
                    let (est, lct) = original_window(direction, trace.est_omega, job.lct);
                    let record =
                        InferenceRecord::new(CumulativeRule::EdgeFinding, lambda_job.id, est, lct);
                    let original = &parameters.jobs[lambda_job.id];
                    // The new bound lies within the time window of the jobs
                    let new_est = new_est as i32;
                    let predicate = match direction {
                        Direction::Forward => predicate!(original.start_variable >= new_est),
                        Direction::Backward { .. } => predicate!(
                            original.start_variable
                                <= direction.map_time(new_est) - original.duration
                        ),
                    };
                    context.post(predicate, record)?;
                }
            }

            tree.remove_from_lambda(lambda_job.id);
        }

        tree.move_to_lambda(job);
    }
    Ok(())
}

/// Maps a window from the frame of `direction` to the original time.
fn original_window(direction: Direction, est: i32, lct: i32) -> (i32, i32) {
    match direction {
        Direction::Forward => (est, lct),
        Direction::Backward { .. } => (direction.map_time(lct), direction.map_time(est)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ReadDomains;
    use crate::engine::TestSolver;
    use crate::propagators::cumulative::explanations::create_explanation;
    use crate::propagators::cumulative::explanations::BoundChangeContext;
    use crate::propagators::cumulative::ArgJob;
    use crate::propagators::cumulative::CumulativeOptions;

    fn propagate(
        solver: &mut TestSolver,
        parameters: &CumulativeParameters,
        direction: Direction,
    ) -> PropagationStatus {
        let mut context = PropagationContextMut::new(solver, parameters);
        propagate_edge_finding(&mut context, parameters, direction)
    }

    /// Checks that every bound change made by the constraint is explained.
    fn assert_explanations_hold(solver: &TestSolver, parameters: &CumulativeParameters) {
        for (position, change) in solver.bound_changes().iter().enumerate() {
            let Some(record) = change.reason else {
                continue;
            };
            let snapshot = solver.domains_before(position);
            let explanation = create_explanation(
                parameters,
                record,
                &BoundChangeContext::new(change.predicate, &snapshot),
            );
            assert!(explanation
                .iter()
                .all(|predicate| predicate.is_satisfied(&snapshot)));
        }
    }

    #[test]
    fn job_is_pushed_after_window() {
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
            CumulativeOptions::default(),
        );

        assert!(propagate(&mut solver, &parameters, Direction::Forward).is_ok());

        // a and b use 4 of the 5 units of [0, 5), so c ends after 5 and starts after both
        assert_eq!(solver.lower_bound(c), 4);
        assert_eq!(solver.lower_bound(a), 0);
        assert_explanations_hold(&solver, &parameters);
    }

    #[test]
    fn backward_pass_tightens_upper_bounds() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(7, 10);
        let b = solver.new_variable(7, 10);
        let c = solver.new_variable(0, 10);
        let parameters = CumulativeParameters::new(
            &[
                ArgJob::new(a, 2, 1),
                ArgJob::new(b, 2, 1),
                ArgJob::new(c, 2, 1),
            ],
            1,
            CumulativeOptions::default(),
        );
        let direction = Direction::backward(&parameters, &solver);

        assert!(propagate(&mut solver, &parameters, direction).is_ok());

        // a and b use 4 of the 5 units of [7, 12), so c ends before them
        assert_eq!(solver.upper_bound(c), 6);
        assert_explanations_hold(&solver, &parameters);
    }

    #[test]
    fn job_is_not_pushed_by_its_own_envelope() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 0);
        let b = solver.new_variable(3, 6);
        let c = solver.new_variable(4, 8);
        let parameters = CumulativeParameters::new(
            &[
                ArgJob::new(a, 1, 1),
                ArgJob::new(b, 3, 1),
                ArgJob::new(c, 2, 2),
            ],
            2,
            CumulativeOptions::default(),
        );
        let backward = Direction::backward(&parameters, &solver);

        assert!(propagate(&mut solver, &parameters, Direction::Forward).is_ok());
        assert!(propagate(&mut solver, &parameters, backward).is_ok());

        // a = 0, b = 3, c = 6 and a = 0, b = 6, c = 4 are both solutions
        assert!(solver.bound_changes().is_empty());
        assert_eq!(solver.lower_bound(b), 3);
        assert_eq!(solver.upper_bound(b), 6);
        assert_eq!(solver.lower_bound(c), 4);
    }

    #[test]
    fn overloaded_theta_is_a_conflict() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 1);
        let b = solver.new_variable(0, 1);
        let parameters = CumulativeParameters::new(
            &[ArgJob::new(a, 2, 1), ArgJob::new(b, 2, 1)],
            1,
            CumulativeOptions::default(),
        );

        let conflict = propagate(&mut solver, &parameters, Direction::Forward)
            .expect_err("[0, 3) is overloaded");

        assert_eq!(conflict.rule, Some(CumulativeRule::EdgeFinding));
        assert!(solver.holds(&conflict.conjunction));
    }
}
