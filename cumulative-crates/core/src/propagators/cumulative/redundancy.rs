use std::collections::BTreeMap;

use super::CumulativeParameters;
use crate::engine::ReadDomains;

/// Whether the resource cannot be overloaded under the current bounds: the demand of the jobs
/// whose windows `[est, lct)` overlap never exceeds the capacity.
pub(crate) fn is_redundant<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    domains: &Domains,
) -> bool {
    let mut profile = BTreeMap::new();
    for job in parameters.relevant_jobs() {
        *profile.entry(job.est(domains)).or_insert(0_i64) += job.demand as i64;
        *profile.entry(job.lct(domains)).or_insert(0_i64) -= job.demand as i64;
    }

    let mut usage = 0;
    profile.values().all(|delta| {
        usage += delta;
        usage <= parameters.capacity as i64
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TestSolver;
    use crate::propagators::cumulative::ArgJob;
    use crate::propagators::cumulative::CumulativeOptions;

    #[test]
    fn disjoint_windows_are_redundant() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 2);
        let b = solver.new_variable(4, 6);
        let parameters = CumulativeParameters::new(
            &[ArgJob::new(a, 2, 1), ArgJob::new(b, 2, 1)],
            1,
            CumulativeOptions::default(),
        );

        assert!(is_redundant(&parameters, &solver));
    }

    #[test]
    fn overlapping_windows_are_not_redundant() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 3);
        let b = solver.new_variable(4, 6);
        let parameters = CumulativeParameters::new(
            &[ArgJob::new(a, 2, 1), ArgJob::new(b, 2, 1)],
            1,
            CumulativeOptions::default(),
        );

        assert!(!is_redundant(&parameters, &solver));
    }
}
