use itertools::Itertools;

use super::energy_jobs;
use super::theta_tree::ThetaTree;
use super::Direction;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::engine::ReadDomains;
use crate::propagators::cumulative::explanations::energy::explain_window_overload;
use crate::propagators::cumulative::CumulativeParameters;
use crate::propagators::cumulative::CumulativeRule;

/// Checks whether some set of jobs needs more energy than their common time window provides.
///
/// The jobs are added to Theta in order of non-decreasing latest completion time; after adding a
/// job `j`, every job in Theta completes by `lct_j`, hence an envelope larger than `C * lct_j`
/// is an overload of the window which starts at the earliest start time responsible for the
/// envelope.
pub(crate) fn check_overload<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    domains: &Domains,
) -> PropagationStatus {
    let jobs = energy_jobs(parameters, domains, Direction::Forward);
    let capacity = parameters.capacity as i64;
    let mut theta = ThetaTree::new(&jobs, parameters.capacity);

    for job in jobs.iter().sorted_by_key(|job| (job.lct, job.id)) {
        theta.add(job);
        if theta.envelope() > capacity * job.lct as i64 {
            let est = theta
                .responsible_job()
                .map_or(job.est, |responsible| responsible.est);
            return Err(PropagatorConflict::new(
                explain_window_overload(parameters, domains, est, job.lct),
                CumulativeRule::OverloadCheck,
            ));
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

    #[test]
    fn overloaded_window_is_detected() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 2);
        let b = solver.new_variable(0, 2);
        let c = solver.new_variable(1, 2);
        let far = solver.new_variable(10, 20);
        let parameters = CumulativeParameters::new(
            &[
                ArgJob::new(a, 2, 1),
                ArgJob::new(b, 2, 1),
                ArgJob::new(c, 1, 1),
                ArgJob::new(far, 3, 1),
            ],
            1,
            CumulativeOptions::default(),
        );

        let conflict = check_overload(&parameters, &solver).expect_err("[0, 4) is overloaded");

        assert_eq!(conflict.rule, Some(CumulativeRule::OverloadCheck));
        assert!(solver.holds(&conflict.conjunction));
        assert!(conflict
            .conjunction
            .iter()
            .all(|predicate| predicate.get_variable() != far));
    }

    #[test]
    fn fitting_jobs_pass() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 3);
        let b = solver.new_variable(0, 3);
        let parameters = CumulativeParameters::new(
            &[ArgJob::new(a, 2, 1), ArgJob::new(b, 2, 1)],
            1,
            CumulativeOptions::default(),
        );

        assert!(check_overload(&parameters, &solver).is_ok());
    }
}
