//! Contains the linear relaxation of the cumulative constraint over time-indexed indicator
//! variables.
//!
//! A job `j` with indicators `x_{j,s}` (one if and only if `j` starts at `s`) is active at time
//! `t` exactly when `Σ_{s ∈ [t - p_j + 1, t]} x_{j,s} = 1`. Two families of rows are generated at
//! the time points where the resource can be overloaded:
//! - capacity rows `Σ_j c_j * active_j(t) <= C`, which are valid globally and therefore cached;
//! - cover cuts, which bound the number of jobs active at `t` by the size of a cover minus one
//!   and are local since the covers depend on the cores of the current sub-problem.
//!
//! Terms for start times outside the current domain of a job are left out; this only weakens a
//! row.
mod capacity_rows;
mod cover_cuts;

use std::collections::BTreeMap;

pub(crate) use capacity_rows::create_capacity_rows;
pub(crate) use cover_cuts::create_cover_cuts;

use super::ArgJob;
use crate::basic_types::SolutionValues;
use crate::engine::IndicatorLinking;
use crate::engine::ReadDomains;
use crate::engine::RowId;
use crate::engine::RowSink;
use crate::engine::VariableId;

/// The violation which a row needs before it is added as a cut.
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// A row `Σ coefficient * variable <= rhs` created by the relaxation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LinearRow {
    pub(crate) name: String,
    pub(crate) rhs: f64,
    pub(crate) local: bool,
    pub(crate) coefficients: Vec<(VariableId, f64)>,
}

impl LinearRow {
    pub(crate) fn activity(&self, solution: &impl SolutionValues) -> f64 {
        self.coefficients
            .iter()
            .map(|&(variable, coefficient)| coefficient * solution.value(variable))
            .sum()
    }

    pub(crate) fn is_violated_by(&self, solution: &impl SolutionValues) -> bool {
        self.activity(solution) > self.rhs + FEASIBILITY_TOLERANCE
    }

    /// Creates and commits the row in `sink`.
    pub(crate) fn create_in(&self, sink: &mut (impl RowSink + ?Sized)) -> RowId {
        let row = sink.create_row(&self.name, f64::NEG_INFINITY, self.rhs, self.local);
        for &(variable, coefficient) in self.coefficients.iter() {
            sink.add_coefficient(row, variable, coefficient);
        }
        sink.commit_row(row);
        row
    }
}

/// The relevant jobs whose window `[est, lct)` contains `time`.
fn jobs_which_can_run_at<'a, Domains: ReadDomains + ?Sized>(
    jobs: &'a [ArgJob],
    domains: &'a Domains,
    time: i32,
) -> impl Iterator<Item = &'a ArgJob> + 'a {
    jobs.iter().filter(move |job| {
        job.duration > 0
            && job.demand > 0
            && domains.lower_bound(job.start_time) <= time
            && time < domains.upper_bound(job.start_time) + job.duration
    })
}

/// The start events at which the demand of the jobs whose windows overlap exceeds the capacity.
fn overloadable_times<Domains: ReadDomains + ?Sized>(
    jobs: &[ArgJob],
    capacity: i32,
    domains: &Domains,
) -> Vec<i32> {
    let mut profile = BTreeMap::new();
    for job in jobs.iter().filter(|job| job.duration > 0 && job.demand > 0) {
        let est = domains.lower_bound(job.start_time);
        let lct = domains.upper_bound(job.start_time) + job.duration;
        *profile.entry(est).or_insert(0_i64) += job.demand as i64;
        *profile.entry(lct).or_insert(0_i64) -= job.demand as i64;
    }

    let mut usage = 0;
    profile
        .iter()
        .filter_map(|(&time, &delta)| {
            usage += delta;
            (delta > 0 && usage > capacity as i64).then_some(time)
        })
        .collect()
}

/// The indicators of `job` whose start time makes it active at `time`, within its domain.
fn activity_terms<Domains: ReadDomains + ?Sized>(
    job: &ArgJob,
    domains: &Domains,
    linking: &(impl IndicatorLinking + ?Sized),
    time: i32,
) -> Vec<VariableId> {
    let first = domains.lower_bound(job.start_time).max(time - job.duration + 1);
    let last = domains.upper_bound(job.start_time).min(time);
    (first..=last)
        .filter_map(|start| linking.indicator_for(job.start_time, start))
        .collect()
}
