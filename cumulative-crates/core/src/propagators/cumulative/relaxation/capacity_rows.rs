use log::trace;

use super::activity_terms;
use super::jobs_which_can_run_at;
use super::overloadable_times;
use super::LinearRow;
use crate::engine::IndicatorLinking;
use crate::engine::ReadDomains;
use crate::propagators::cumulative::ArgJob;

/// Creates one row `Σ_j c_j * active_j(t) <= C` for every time point `t` at which the
/// resource can be overloaded; jobs without indicators do not appear in the rows.
///
/// The rows use the given demands and capacity; they are not normalised.
pub(crate) fn create_capacity_rows<Domains: ReadDomains + ?Sized>(
    name: &str,
    jobs: &[ArgJob],
    capacity: i32,
    domains: &Domains,
    linking: &(impl IndicatorLinking + ?Sized),
) -> Vec<LinearRow> {
    let mut rows = Vec::new();

    for time in overloadable_times(jobs, capacity, domains) {
        let mut coefficients = Vec::new();
        let mut maximal_activity = 0;
        for job in jobs_which_can_run_at(jobs, domains, time) {
            let terms = activity_terms(job, domains, linking, time);
            if terms.is_empty() {
                continue;
            }
            maximal_activity += job.demand as i64;
            coefficients.extend(
                terms
                    .into_iter()
                    .map(|indicator| (indicator, job.demand as f64)),
            );
        }

        // The row cannot be violated
        if maximal_activity <= capacity as i64 {
            continue;
        }

        trace!("{name}: capacity row at {time} with {} terms", coefficients.len());
        rows.push(LinearRow {
            name: format!("{name}_capacity[{time}]"),
            rhs: capacity as f64,
            local: false,
            coefficients,
        });
    }

    rows
}
