use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::cumulative_assert_simple;
use crate::engine::BoundStore;
use crate::engine::ReadDomains;
use crate::predicate;
use crate::propagators::cumulative::explanations::core_times::explain_overload_at;
use crate::propagators::cumulative::propagation_context::PropagationContextMut;
use crate::propagators::cumulative::CumulativeParameters;
use crate::propagators::cumulative::CumulativeRule;
use crate::propagators::cumulative::InferenceRecord;
use crate::propagators::cumulative::ResourceProfile;

/// Creates the profile of the cores of all relevant jobs.
///
/// If the cores overload the resource, the conflict is explained by the cores which overlap at
/// the first overloaded time point.
pub(crate) fn create_time_table<Domains: ReadDomains + ?Sized>(
    parameters: &CumulativeParameters,
    domains: &Domains,
) -> Result<ResourceProfile, PropagatorConflict> {
    let mut profile = ResourceProfile::new(parameters.capacity);
    for job in parameters.relevant_jobs() {
        let Some((start, end)) = job.core(domains) else {
            continue;
        };
        if let Err(overload) = profile.insert_interval(start, end, job.demand) {
            return Err(PropagatorConflict::new(
                explain_overload_at(parameters, domains, overload.time),
                CumulativeRule::CoreTimes,
            ));
        }
    }
    Ok(profile)
}

/// Tightens the bounds of every relevant job to its earliest and latest start at which it fits
/// the profile of the other jobs.
///
/// The jobs are processed one by one: the core of a job is removed from the profile, its bounds
/// are tightened, and its (possibly larger) core is inserted again. A core created this way is
/// taken into account by the jobs which are processed after it but not by the ones before it;
/// reaching the fixpoint is left to the caller.
pub(crate) fn propagate_core_times<Store: BoundStore + ?Sized>(
    context: &mut PropagationContextMut<'_, Store>,
    parameters: &CumulativeParameters,
    profile: &mut ResourceProfile,
) -> PropagationStatus {
    for job in parameters.relevant_jobs() {
        let lower_bound = job.est(context.domains());
        let upper_bound = job.lst(context.domains());
        if let Some((start, end)) = job.core(context.domains()) {
            profile.delete_interval(start, end, job.demand);
        }

        // Without a feasible start the lower bound is pushed past the upper bound, which results
        // in a conflict
        let new_lower_bound = profile
            .earliest_feasible_start(lower_bound, upper_bound, job.duration, job.demand)
            .unwrap_or(upper_bound + 1);
        if new_lower_bound > lower_bound {
            let record = InferenceRecord::new(
                CumulativeRule::CoreTimes,
                job.id,
                lower_bound,
                new_lower_bound - 1 + job.duration,
            );
            context.post(predicate!(job.start_variable >= new_lower_bound), record)?;
        }

        let new_upper_bound = profile
            .latest_feasible_start(new_lower_bound, upper_bound, job.duration, job.demand)
            .unwrap_or(new_lower_bound);
        if new_upper_bound < upper_bound {
            let record = InferenceRecord::new(
                CumulativeRule::CoreTimes,
                job.id,
                new_upper_bound + 1,
                upper_bound + job.duration,
            );
            context.post(predicate!(job.start_variable <= new_upper_bound), record)?;
        }

        if let Some((start, end)) = job.core(context.domains()) {
            let result = profile.insert_interval(start, end, job.demand);
            cumulative_assert_simple!(
                result.is_ok(),
                "the core of a job placed at a feasible start cannot overload the profile"
            );
        }
    }
    Ok(())
}
