use itertools::Itertools;

use super::ArgJob;
use super::Job;
use super::JobId;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::engine::VariableId;
use crate::propagators::cumulative::CumulativeOptions;

/// Holds the data which the reasoning rules work on; more specifically it holds:
/// - The jobs, with normalised demands
/// - The normalised capacity of the resource
/// - The options for propagating the cumulative constraint
///
/// The normalisation yields an equivalent resource: if no two relevant jobs fit next to each
/// other the resource is unary (all demands and the capacity are one), otherwise demands and
/// capacity are divided by the greatest common divisor of the demands (rounding the capacity
/// down).
#[derive(Debug, Clone)]
pub(crate) struct CumulativeParameters {
    /// The jobs; for each [`Job`], the [`Job::id`] corresponds to its index in this structure
    pub(crate) jobs: KeyedVec<JobId, Job>,
    pub(crate) capacity: i32,
    pub(crate) options: CumulativeOptions,
    /// Indicates that the constraint is infeasible.
    ///
    /// This can occur when there is a job with a demand higher than the capacity.
    pub(crate) is_infeasible: bool,
    job_of_variable: HashMap<VariableId, JobId>,
}

impl CumulativeParameters {
    pub(crate) fn new(
        jobs: &[ArgJob],
        capacity: i32,
        options: CumulativeOptions,
    ) -> CumulativeParameters {
        let relevant_demands = jobs
            .iter()
            .filter(|job| job.duration > 0 && job.demand > 0)
            .map(|job| job.demand)
            .collect::<Vec<_>>();
        let is_infeasible = relevant_demands.iter().any(|&demand| demand > capacity);

        let normalise = Normalisation::compute(&relevant_demands, capacity, is_infeasible);

        let jobs = jobs
            .iter()
            .enumerate()
            .map(|(index, job)| Job {
                start_variable: job.start_time,
                duration: job.duration,
                demand: normalise.demand(job.demand),
                id: JobId::new(index as u32),
            })
            .collect::<KeyedVec<_, _>>();

        let mut job_of_variable = HashMap::default();
        for job in jobs.iter() {
            let _ = job_of_variable.entry(job.start_variable).or_insert(job.id);
        }

        CumulativeParameters {
            jobs,
            capacity: normalise.capacity(capacity),
            options,
            is_infeasible,
            job_of_variable,
        }
    }

    pub(crate) fn relevant_jobs(&self) -> impl Iterator<Item = &Job> + '_ {
        self.jobs.iter().filter(|job| job.is_relevant())
    }

    /// The job whose start variable is `variable`.
    pub(crate) fn job_of(&self, variable: VariableId) -> Option<JobId> {
        self.job_of_variable.get(&variable).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Normalisation {
    Unary,
    Divisor(i32),
}

impl Normalisation {
    fn compute(relevant_demands: &[i32], capacity: i32, is_infeasible: bool) -> Normalisation {
        if is_infeasible || relevant_demands.is_empty() {
            return Normalisation::Divisor(1);
        }

        let two_smallest = relevant_demands.iter().copied().k_smallest(2).collect::<Vec<_>>();
        if two_smallest.len() == 2 && two_smallest[0] + two_smallest[1] > capacity {
            return Normalisation::Unary;
        }

        let divisor = relevant_demands
            .iter()
            .fold(0, |divisor, &demand| num::integer::gcd(divisor, demand));
        Normalisation::Divisor(divisor.max(1))
    }

    fn demand(&self, demand: i32) -> i32 {
        match self {
            Normalisation::Unary => demand.min(1),
            Normalisation::Divisor(divisor) => demand / divisor,
        }
    }

    fn capacity(&self, capacity: i32) -> i32 {
        match self {
            Normalisation::Unary => 1,
            Normalisation::Divisor(divisor) => capacity / divisor,
        }
    }
}
