use itertools::Itertools;
use log::trace;

use super::activity_terms;
use super::jobs_which_can_run_at;
use super::overloadable_times;
use super::LinearRow;
use crate::engine::IndicatorLinking;
use crate::engine::ReadDomains;
use crate::engine::VariableId;
use crate::propagators::cumulative::ArgJob;

/// Creates the cover cuts at the time points where the resource can be overloaded.
///
/// At time `t` the jobs whose core contains `t` leave a remaining capacity `R`; the other jobs
/// which can run at `t` (and have indicators) are the candidates. With the candidate demands
/// sorted:
/// - the smallest `k` demands whose sum exceeds `R` give a small cover: no `k` candidates can
///   run together, hence at most `k - 1` of all candidates are active;
/// - the largest `k` demands whose sum exceeds `R` give a big cover: at most `k - 1` of these
///   jobs are active.
pub(crate) fn create_cover_cuts<Domains: ReadDomains + ?Sized>(
    name: &str,
    jobs: &[ArgJob],
    capacity: i32,
    domains: &Domains,
    linking: &(impl IndicatorLinking + ?Sized),
) -> Vec<LinearRow> {
    let mut cuts = Vec::new();

    for time in overloadable_times(jobs, capacity, domains) {
        let mut remaining_capacity = capacity as i64;
        let mut candidates = Vec::new();
        for job in jobs_which_can_run_at(jobs, domains, time) {
            let lst = domains.upper_bound(job.start_time);
            let ect = domains.lower_bound(job.start_time) + job.duration;
            if lst <= time && time < ect {
                remaining_capacity -= job.demand as i64;
                continue;
            }
            let terms = activity_terms(job, domains, linking, time);
            if !terms.is_empty() {
                candidates.push((job.demand as i64, terms));
            }
        }

        let candidate_demand = candidates.iter().map(|(demand, _)| demand).sum::<i64>();
        if remaining_capacity < 0 || candidate_demand <= remaining_capacity {
            continue;
        }

        candidates.sort_by_key(|(demand, _)| *demand);

        let demands = candidates.iter().map(|(demand, _)| *demand);
        let small_cover = cover_size(demands.clone(), remaining_capacity);
        let big_cover = cover_size(demands.rev(), remaining_capacity);

        if let Some(size) = small_cover {
            cuts.push(cover_cut(
                format!("{name}_cover_small[{time}]"),
                candidates.iter().map(|(_, terms)| terms),
                size,
            ));
        }
        if let Some(size) = big_cover {
            cuts.push(cover_cut(
                format!("{name}_cover_big[{time}]"),
                candidates.iter().rev().take(size).map(|(_, terms)| terms),
                size,
            ));
        }
    }

    for cut in cuts.iter() {
        trace!("{}: {} terms <= {}", cut.name, cut.coefficients.len(), cut.rhs);
    }
    cuts
}

/// The length of the shortest prefix of `demands` whose sum exceeds `remaining_capacity`.
fn cover_size(demands: impl Iterator<Item = i64>, remaining_capacity: i64) -> Option<usize> {
    let mut sum = 0;
    demands.enumerate().find_map(|(index, demand)| {
        sum += demand;
        (sum > remaining_capacity).then_some(index + 1)
    })
}

fn cover_cut<'a>(
    name: String,
    terms: impl Iterator<Item = &'a Vec<VariableId>>,
    cover_size: usize,
) -> LinearRow {
    LinearRow {
        name,
        rhs: (cover_size - 1) as f64,
        local: true,
        coefficients: terms
            .flatten()
            .map(|&indicator| (indicator, 1.0))
            .collect_vec(),
    }
}
