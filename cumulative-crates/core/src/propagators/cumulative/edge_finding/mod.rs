//! Contains the energy-based rules which work on (Theta-)Lambda trees: the overload check and
//! edge-finding.
//!
//! Both rules reason over the energy envelope of sets of jobs; the envelope of a set `Ω` is the
//! maximum over `Ω' ⊆ Ω` of `C * est(Ω') + e(Ω')`, where `e` is the energy (duration times
//! demand) of the jobs. If the envelope exceeds `C * lct(Ω)` then the jobs cannot fit in their
//! window. The trees compute this envelope in logarithmic time per insertion or removal.
//!
//! Edge-finding runs in both directions of time; the backward pass mirrors the time windows of
//! the jobs around the latest completion time so that the same code tightens upper bounds.
//!
//! # Bibliography
//! \[1\] P. Vilím, ‘Edge finding filtering algorithm for discrete cumulative resources in
//! O(kn log n)’, in International Conference on Principles and Practice of Constraint
//! Programming, 2009, pp. 802–816.
mod edge_finder;
mod overload_check;
mod theta_lambda_tree;
mod theta_tree;

pub(crate) use edge_finder::propagate_edge_finding;
pub(crate) use overload_check::check_overload;

use crate::containers::KeyedVec;
use crate::engine::ReadDomains;
use crate::propagators::cumulative::CumulativeParameters;
use crate::propagators::cumulative::JobId;

/// The direction of time in which a rule reasons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Lower bounds are tightened.
    Forward,
    /// Upper bounds are tightened; times `t` are mirrored to `horizon - t`.
    Backward { horizon: i32 },
}

impl Direction {
    /// The mirror of [`Direction::Forward`], around the latest completion time of the relevant
    /// jobs.
    pub(crate) fn backward<Domains: ReadDomains + ?Sized>(
        parameters: &CumulativeParameters,
        domains: &Domains,
    ) -> Direction {
        let horizon = parameters
            .relevant_jobs()
            .map(|job| job.lct(domains))
            .max()
            .unwrap_or_default();
        Direction::Backward { horizon }
    }

    /// Maps a time point from the frame of this direction to the original time and back.
    pub(crate) fn map_time(&self, time: i32) -> i32 {
        match self {
            Direction::Forward => time,
            Direction::Backward { horizon } => horizon - time,
        }
    }
}

/// A relevant job with its time window in the frame of a [`Direction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EnergyJob {
    pub(crate) id: JobId,
    pub(crate) est: i32,
    pub(crate) lct: i32,
    pub(crate) duration: i32,
    pub(crate) demand: i32,
}

impl EnergyJob {
    pub(crate) fn energy(&self) -> i64 {
        self.duration as i64 * self.demand as i64
    }
}

/// The relevant jobs of the constraint as seen in `direction`.
pub(crate) fn energy_jobs<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    domains: &Domains,
    direction: Direction,
) -> Vec<EnergyJob> {
    parameters
        .relevant_jobs()
        .map(|job| {
            let (est, lct) = match direction {
                Direction::Forward => (job.est(domains), job.lct(domains)),
                Direction::Backward { .. } => (
                    direction.map_time(job.lct(domains)),
                    direction.map_time(job.est(domains)),
                ),
            };
            EnergyJob {
                id: job.id,
                est,
                lct,
                duration: job.duration,
                demand: job.demand,
            }
        })
        .collect()
}

/// The layout shared by the Theta and Theta-Lambda trees: a complete binary tree stored in an
/// array where the leaves hold the jobs in order of non-decreasing earliest start time.
#[derive(Clone, Debug)]
struct TreeLayout {
    /// The jobs sorted by earliest start time (ties broken by id); the `k`-th job is stored in
    /// the `k`-th leaf.
    sorted_jobs: Vec<EnergyJob>,
    /// The position of the leaf of every job.
    leaf_of_job: KeyedVec<JobId, usize>,
    number_of_internal_nodes: usize,
}

impl TreeLayout {
    fn new(jobs: &[EnergyJob]) -> TreeLayout {
        let mut sorted_jobs = jobs.to_vec();
        sorted_jobs.sort_by_key(|job| (job.est, job.id));

        let mut number_of_leaves = 1;
        while number_of_leaves < sorted_jobs.len() {
            number_of_leaves <<= 1;
        }
        let number_of_internal_nodes = number_of_leaves - 1;

        let mut leaf_of_job = KeyedVec::default();
        for (index, job) in sorted_jobs.iter().enumerate() {
            leaf_of_job.accomodate(job.id, usize::MAX);
            leaf_of_job[job.id] = number_of_internal_nodes + index;
        }

        TreeLayout {
            sorted_jobs,
            leaf_of_job,
            number_of_internal_nodes,
        }
    }

    fn number_of_nodes(&self) -> usize {
        2 * self.number_of_internal_nodes + 1
    }

    fn leaf(&self, job: JobId) -> usize {
        self.leaf_of_job[job]
    }

    /// The job stored in the leaf at `position`.
    fn job_at(&self, position: usize) -> &EnergyJob {
        &self.sorted_jobs[position - self.number_of_internal_nodes]
    }

    fn is_leaf(&self, position: usize) -> bool {
        position >= self.number_of_internal_nodes
    }

    fn left_child(position: usize) -> usize {
        2 * position + 1
    }

    fn right_child(position: usize) -> usize {
        2 * position + 2
    }

    fn parent(position: usize) -> usize {
        (position - 1) / 2
    }
}
