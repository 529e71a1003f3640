use std::collections::BTreeMap;

use super::ArgJob;
use crate::basic_types::SolutionValues;

/// The first time point at which a solution uses more than the capacity of the resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityViolation {
    pub time: i32,
    pub usage: i64,
}

/// Sweeps the start and completion times of the jobs in `solution` and returns the first
/// overloaded time point.
///
/// The profile is a key-value store of the relative change in resource usage per time point; a
/// job which completes at time `t` and one which starts at `t` therefore never overlap.
pub(crate) fn first_violation(
    jobs: &[ArgJob],
    capacity: i32,
    solution: &impl SolutionValues,
) -> Option<CapacityViolation> {
    let mut profile = BTreeMap::new();
    for job in jobs.iter().filter(|job| job.duration > 0 && job.demand > 0) {
        let start = solution.integer_value(job.start_time);
        *profile.entry(start).or_insert(0_i64) += job.demand as i64;
        *profile.entry(start + job.duration).or_insert(0_i64) -= job.demand as i64;
    }

    let mut usage = 0;
    for (&time, delta) in profile.iter() {
        usage += delta;
        if usage > capacity as i64 {
            return Some(CapacityViolation { time, usage });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Solution;
    use crate::engine::VariableId;

    fn jobs() -> Vec<ArgJob> {
        vec![
            ArgJob::new(VariableId::new(0), 2, 2),
            ArgJob::new(VariableId::new(1), 3, 1),
            ArgJob::new(VariableId::new(2), 0, 5),
        ]
    }

    #[test]
    fn touching_jobs_do_not_overlap() {
        let solution = [(VariableId::new(0), 0), (VariableId::new(1), 2), (VariableId::new(2), 1)]
            .into_iter()
            .collect::<Solution>();

        assert_eq!(first_violation(&jobs(), 2, &solution), None);
    }

    #[test]
    fn overlapping_jobs_are_reported() {
        let solution = [(VariableId::new(0), 1), (VariableId::new(1), 2), (VariableId::new(2), 1)]
            .into_iter()
            .collect::<Solution>();

        assert_eq!(
            first_violation(&jobs(), 2, &solution),
            Some(CapacityViolation { time: 2, usage: 3 })
        );
    }
}
