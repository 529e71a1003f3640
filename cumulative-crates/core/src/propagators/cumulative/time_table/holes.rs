use crate::basic_types::PropagationStatus;
use crate::cumulative_assert_simple;
use crate::engine::BoundStore;
use crate::engine::IndicatorLinking;
use crate::predicate;
use crate::propagators::cumulative::propagation_context::PropagationContextMut;
use crate::propagators::cumulative::CumulativeParameters;
use crate::propagators::cumulative::CumulativeRule;
use crate::propagators::cumulative::InferenceRecord;
use crate::propagators::cumulative::ResourceProfile;

/// Fixes to zero the indicator variables of start times at which the job does not fit the
/// profile of the other jobs.
///
/// Only jobs with indicator variables are considered; the start times at the bounds of a domain
/// are handled by [`super::propagate_core_times`], hence this only removes holes from the
/// interior of the domains.
pub(crate) fn propagate_core_time_holes<Store: BoundStore + ?Sized>(
    context: &mut PropagationContextMut<'_, Store>,
    linking: &impl IndicatorLinking,
    parameters: &CumulativeParameters,
    profile: &mut ResourceProfile,
) -> PropagationStatus {
    for job in parameters.relevant_jobs() {
        if linking.indicator_variables(job.start_variable).is_none() {
            continue;
        }

        let core = job.core(context.domains());
        if let Some((start, end)) = core {
            profile.delete_interval(start, end, job.demand);
        }

        for start_time in job.est(context.domains())..=job.lst(context.domains()) {
            if profile.is_feasible_start(start_time, job.duration, job.demand) {
                continue;
            }
            let Some(indicator) = linking.indicator_for(job.start_variable, start_time) else {
                continue;
            };
            let record = InferenceRecord::new(
                CumulativeRule::CoreTimeHoles,
                job.id,
                start_time,
                start_time + job.duration,
            );
            context.post(predicate!(indicator <= 0), record)?;
        }

        if let Some((start, end)) = core {
            let result = profile.insert_interval(start, end, job.demand);
            cumulative_assert_simple!(result.is_ok());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ReadDomains;
    use crate::engine::TestSolver;
    use crate::propagators::cumulative::explanations::create_explanation;
    use crate::propagators::cumulative::explanations::BoundChangeContext;
    use crate::propagators::cumulative::time_table::create_time_table;
    use crate::propagators::cumulative::ArgJob;
    use crate::propagators::cumulative::CumulativeOptions;

    #[test]
    fn indicators_of_conflicting_starts_are_fixed() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(3, 3);
        let b = solver.new_variable(0, 6);
        let indicators = solver.new_indicator_variables(b);
        let parameters = CumulativeParameters::new(
            &[ArgJob::new(a, 2, 1), ArgJob::new(b, 2, 1)],
            1,
            CumulativeOptions::default(),
        );

        let mut profile = create_time_table(&parameters, &solver).expect("no overload");
        let linking = solver.indicator_linking();
        let mut context = PropagationContextMut::new(&mut solver, &parameters);
        let result = propagate_core_time_holes(&mut context, &linking, &parameters, &mut profile);

        assert!(result.is_ok());
        // b cannot start at 2, 3, or 4 because of the core [3, 5) of a
        let fixed = indicators
            .iter()
            .map(|&indicator| solver.upper_bound(indicator))
            .collect::<Vec<_>>();
        assert_eq!(fixed, vec![1, 1, 0, 0, 0, 1, 1]);

        let change = solver.bound_changes()[0];
        let position = solver.position_of(change.predicate).expect("the change is on the trail");
        let snapshot = solver.domains_before(position);
        let explanation = create_explanation(
            &parameters,
            change.reason.expect("propagated by the constraint"),
            &BoundChangeContext::new(change.predicate, &snapshot),
        );
        assert_eq!(
            explanation.as_slice(),
            &[
                predicate!(indicators[2] <= 1),
                predicate!(a >= 2),
                predicate!(a <= 3)
            ]
        );
    }
}
