use log::debug;
use log::trace;
use log::warn;

use super::checker::first_violation;
use super::edge_finding::check_overload;
use super::edge_finding::propagate_edge_finding;
use super::edge_finding::Direction;
use super::energetic_reasoning::propagate_energetic_reasoning;
use super::explanations;
use super::explanations::BoundChangeContext;
use super::propagation_context::PropagationContextMut;
use super::redundancy::is_redundant;
use super::relaxation::create_capacity_rows;
use super::relaxation::create_cover_cuts;
use super::relaxation::LinearRow;
use super::time_table::create_time_table;
use super::time_table::propagate_core_time_holes;
use super::time_table::propagate_core_times;
use super::ArgJob;
use super::CapacityViolation;
use super::CumulativeOptions;
use super::CumulativeParameters;
use super::CumulativeRule;
use super::InferenceRecord;
use super::JobId;
use super::RowMaterialisation;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropositionalConjunction;
use crate::basic_types::SolutionValues;
use crate::containers::StorageKey;
use crate::create_statistics_struct;
use crate::engine::BoundStore;
use crate::engine::ConflictSink;
use crate::engine::IndicatorLinking;
use crate::engine::ReadDomains;
use crate::engine::RowId;
use crate::engine::RowSink;
use crate::engine::VariableId;
use crate::statistics::CumulativeMovingAverage;
use crate::statistics::MovingAverage;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// The statistics which are kept by a [`CumulativeConstraint`].
    CumulativeStatistics {
        num_propagation_calls: usize,
        num_redundant_calls: usize,
        num_conflicts: usize,
        num_conflicts_core_times: usize,
        num_conflicts_overload_check: usize,
        num_conflicts_edge_finding: usize,
        num_conflicts_energetic_reasoning: usize,
        num_bound_changes_core_times: usize,
        num_indicators_fixed: usize,
        num_bound_changes_edge_finding: usize,
        num_bound_changes_energetic_reasoning: usize,
        num_explained_bound_changes: usize,
        num_capacity_rows_added: usize,
        num_cover_cuts_added: usize,
        /// The number of predicates in the explanations of conflicts and bound changes.
        average_explanation_size: CumulativeMovingAverage<usize>,
    }
);

/// The outcome of [`CumulativeConstraint::propagate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationResult {
    /// Whether an infeasibility was detected; the conflict has then been reported to the
    /// [`ConflictSink`].
    pub cutoff: bool,
    pub num_bound_changes: usize,
    /// Whether the resource cannot be overloaded under the current bounds, in which case no rule
    /// was run.
    pub redundant: bool,
}

/// The outcome of [`CumulativeConstraint::separate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeparationResult {
    /// Whether the relaxation became infeasible by adding a row.
    pub cutoff: bool,
    pub num_rows_added: usize,
}

/// A capacity row together with its handle in the [`RowSink`].
#[derive(Clone, Debug)]
struct CachedRow {
    row: LinearRow,
    handle: RowId,
}

/// A cumulative resource constraint: at every time point, the summed demand of the jobs which
/// execute at that time point does not exceed the capacity.
///
/// The constraint does not own any domains; every operation receives the collaborators it
/// needs. Propagation runs, in order and stopping at the first conflict: the redundancy check,
/// core-time propagation, hole propagation on the indicator variables, the overload check,
/// forward and backward edge-finding, and energetic reasoning. Every bound change is tagged
/// with an [`InferenceRecord`] which [`CumulativeConstraint::explain_bound_change`] turns into a
/// reason on request.
#[derive(Debug)]
pub struct CumulativeConstraint {
    name: String,
    jobs: Vec<ArgJob>,
    capacity: i32,
    parameters: CumulativeParameters,
    capacity_rows: Option<Vec<CachedRow>>,
    rows_added_as_constraints: bool,
    statistics: CumulativeStatistics,
}

impl CumulativeConstraint {
    /// Creates the constraint; negative durations, demands, or capacities are rejected.
    pub fn new(
        name: impl Into<String>,
        jobs: &[ArgJob],
        capacity: i32,
        options: CumulativeOptions,
    ) -> Result<Self, ConstraintOperationError> {
        if capacity < 0 {
            return Err(ConstraintOperationError::NegativeCapacity(capacity));
        }
        for (index, job) in jobs.iter().enumerate() {
            if job.duration < 0 {
                return Err(ConstraintOperationError::NegativeDuration {
                    job: index,
                    duration: job.duration,
                });
            }
            if job.demand < 0 {
                return Err(ConstraintOperationError::NegativeDemand {
                    job: index,
                    demand: job.demand,
                });
            }
        }

        let name = name.into();
        let parameters = CumulativeParameters::new(jobs, capacity, options);
        if parameters.is_infeasible {
            warn!("{name}: a job has a demand exceeding the capacity {capacity}");
        }

        Ok(CumulativeConstraint {
            name,
            jobs: jobs.to_vec(),
            capacity,
            parameters,
            capacity_rows: None,
            rows_added_as_constraints: false,
            statistics: CumulativeStatistics::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn jobs(&self) -> &[ArgJob] {
        &self.jobs
    }

    pub fn start_variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.jobs.iter().map(|job| job.start_time)
    }

    pub fn durations(&self) -> impl Iterator<Item = i32> + '_ {
        self.jobs.iter().map(|job| job.duration)
    }

    pub fn demands(&self) -> impl Iterator<Item = i32> + '_ {
        self.jobs.iter().map(|job| job.demand)
    }

    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    pub fn options(&self) -> &CumulativeOptions {
        &self.parameters.options
    }

    pub fn statistics(&self) -> &CumulativeStatistics {
        &self.statistics
    }

    /// The job whose start time is `variable`; if several jobs share the variable, the first one.
    pub fn job_of_variable(&self, variable: VariableId) -> Option<JobId> {
        self.parameters.job_of(variable)
    }

    /// Runs the enabled reasoning rules until none of them changes a bound.
    ///
    /// A conflict is reported to the `solver` as a [`ConflictSink`]; the bound changes made
    /// before the conflict was found remain.
    pub fn propagate<Solver: BoundStore + ConflictSink + ?Sized>(
        &mut self,
        solver: &mut Solver,
        linking: &impl IndicatorLinking,
    ) -> PropagationResult {
        self.statistics.num_propagation_calls += 1;

        if self.parameters.is_infeasible {
            debug!("{}: infeasible demands", self.name);
            self.report_conflict(&mut *solver, &PropositionalConjunction::default(), None);
            return PropagationResult {
                cutoff: true,
                ..Default::default()
            };
        }

        if is_redundant(&self.parameters, &*solver) {
            debug!("{}: redundant under the current bounds", self.name);
            self.statistics.num_redundant_calls += 1;
            return PropagationResult {
                redundant: true,
                ..Default::default()
            };
        }

        let mut context = PropagationContextMut::new(&mut *solver, &self.parameters);
        let status = propagate_to_fixpoint(
            &mut context,
            linking,
            &self.parameters,
            &mut self.statistics,
        );
        let num_bound_changes = context.num_bound_changes();

        match status {
            Ok(()) => {
                debug!("{}: {num_bound_changes} bound changes", self.name);
                PropagationResult {
                    cutoff: false,
                    num_bound_changes,
                    redundant: false,
                }
            }
            Err(conflict) => {
                debug!(
                    "{}: conflict of size {} found by {:?}",
                    self.name,
                    conflict.conjunction.len(),
                    conflict.rule
                );
                self.report_conflict(&mut *solver, &conflict.conjunction, conflict.rule);
                PropagationResult {
                    cutoff: true,
                    num_bound_changes,
                    redundant: false,
                }
            }
        }
    }

    fn report_conflict(
        &mut self,
        sink: &mut (impl ConflictSink + ?Sized),
        conjunction: &PropositionalConjunction,
        rule: Option<CumulativeRule>,
    ) {
        self.statistics.num_conflicts += 1;
        match rule {
            Some(CumulativeRule::CoreTimes | CumulativeRule::CoreTimeHoles) => {
                self.statistics.num_conflicts_core_times += 1
            }
            Some(CumulativeRule::OverloadCheck) => {
                self.statistics.num_conflicts_overload_check += 1
            }
            Some(CumulativeRule::EdgeFinding) => self.statistics.num_conflicts_edge_finding += 1,
            Some(CumulativeRule::EnergeticReasoning) => {
                self.statistics.num_conflicts_energetic_reasoning += 1
            }
            None => {}
        }
        self.statistics
            .average_explanation_size
            .add_term(conjunction.len());
        sink.report_conflict(conjunction);
    }

    /// Creates the reason for a bound change made by this constraint.
    ///
    /// The `context` contains the changed predicate and the domains just before the change. Returns
    /// `None` if the record does not belong to the predicate.
    pub fn create_explanation<Domains: ReadDomains + ?Sized>(
        &self,
        record: InferenceRecord,
        context: &BoundChangeContext<'_, Domains>,
    ) -> Option<PropositionalConjunction> {
        if record.job().index() >= self.parameters.jobs.len()
            || record.rule() == CumulativeRule::OverloadCheck
        {
            return None;
        }
        let job = &self.parameters.jobs[record.job()];
        let variable = context.predicate.get_variable();
        if record.rule() != CumulativeRule::CoreTimeHoles && job.start_variable != variable {
            return None;
        }
        if record.rule() == CumulativeRule::CoreTimeHoles && context.predicate.is_lower_bound_predicate()
        {
            return None;
        }

        Some(explanations::create_explanation(
            &self.parameters,
            record,
            context,
        ))
    }

    /// Records the reason of a bound change made by this constraint in `sink`; returns whether a
    /// reason could be given.
    pub fn explain_bound_change<Domains: ReadDomains + ?Sized>(
        &mut self,
        record: InferenceRecord,
        context: &BoundChangeContext<'_, Domains>,
        sink: &mut (impl ConflictSink + ?Sized),
    ) -> bool {
        let Some(explanation) = self.create_explanation(record, context) else {
            debug!(
                "{}: {record:?} does not explain {}",
                self.name, context.predicate
            );
            return false;
        };

        self.statistics.num_explained_bound_changes += 1;
        self.statistics
            .average_explanation_size
            .add_term(explanation.len());
        for &predicate in explanation.iter() {
            sink.record_bound_in_reason(predicate);
        }
        true
    }

    /// Adds rows of the linear relaxation to `sink`.
    ///
    /// With a `solution`, only rows which it violates are added as cuts; without one, all rows
    /// are added. The capacity rows are created on the first call and reused afterwards; when
    /// they are materialised as constraints they are added only once.
    pub fn separate<Sink: RowSink + ?Sized, Values: SolutionValues>(
        &mut self,
        domains: &(impl ReadDomains + ?Sized),
        linking: &impl IndicatorLinking,
        sink: &mut Sink,
        solution: Option<&Values>,
    ) -> SeparationResult {
        let mut result = SeparationResult::default();
        if self.parameters.is_infeasible {
            return result;
        }
        let relaxation = self.parameters.options.relaxation;
        let should_add = |row: &LinearRow| match solution {
            Some(solution) => row.is_violated_by(solution),
            None => true,
        };

        if relaxation.use_capacity_rows {
            let rows = self.capacity_rows.get_or_insert_with(|| {
                create_capacity_rows(&self.name, &self.jobs, self.capacity, domains, linking)
                    .into_iter()
                    .map(|row| {
                        let handle = row.create_in(&mut *sink);
                        CachedRow { row, handle }
                    })
                    .collect()
            });

            match relaxation.materialisation {
                RowMaterialisation::Constraints => {
                    if !self.rows_added_as_constraints {
                        for cached in rows.iter() {
                            sink.add_row_as_constraint(cached.handle);
                            result.num_rows_added += 1;
                        }
                        self.rows_added_as_constraints = true;
                    }
                }
                RowMaterialisation::Cuts => {
                    for cached in rows.iter().filter(|cached| should_add(&cached.row)) {
                        trace!("{}: adding {}", self.name, cached.row.name);
                        result.num_rows_added += 1;
                        if sink.add_cut_to_relaxation(cached.handle) {
                            result.cutoff = true;
                            break;
                        }
                    }
                }
            }
            self.statistics.num_capacity_rows_added += result.num_rows_added;
        }

        if relaxation.use_cover_cuts && !result.cutoff {
            for cut in create_cover_cuts(&self.name, &self.jobs, self.capacity, domains, linking)
                .iter()
                .filter(|&cut| should_add(cut))
            {
                let handle = cut.create_in(&mut *sink);
                result.num_rows_added += 1;
                self.statistics.num_cover_cuts_added += 1;
                let is_infeasible = sink.add_cut_to_relaxation(handle);
                sink.release_row(handle);
                if is_infeasible {
                    result.cutoff = true;
                    break;
                }
            }
        }

        debug!(
            "{}: {} rows added{}",
            self.name,
            result.num_rows_added,
            if result.cutoff { ", relaxation infeasible" } else { "" }
        );
        result
    }

    /// Releases the cached capacity rows; they are created again by the next call to
    /// [`CumulativeConstraint::separate`].
    pub fn release_rows(&mut self, sink: &mut (impl RowSink + ?Sized)) {
        for cached in self.capacity_rows.take().into_iter().flatten() {
            sink.release_row(cached.handle);
        }
        self.rows_added_as_constraints = false;
    }

    /// Whether the start times in `solution` respect the capacity.
    pub fn check(&self, solution: &impl SolutionValues) -> bool {
        self.find_violation(solution).is_none()
    }

    /// The first time point at which `solution` overloads the resource.
    pub fn find_violation(&self, solution: &impl SolutionValues) -> Option<CapacityViolation> {
        first_violation(&self.jobs, self.capacity, solution)
    }

    /// Removes the jobs without duration or demand and returns how many were removed.
    ///
    /// The jobs are renumbered, hence the [`InferenceRecord`]s created before the removal can no
    /// longer be explained; this is meant to be used before propagation starts.
    pub fn remove_irrelevant_jobs(&mut self) -> usize {
        let num_jobs = self.jobs.len();
        self.jobs
            .retain(|job| job.duration > 0 && job.demand > 0);
        let num_removed = num_jobs - self.jobs.len();

        if num_removed > 0 {
            debug!("{}: removed {num_removed} irrelevant jobs", self.name);
            self.parameters =
                CumulativeParameters::new(&self.jobs, self.capacity, self.parameters.options);
        }
        num_removed
    }

    /// Creates a copy of the constraint in which every start variable is replaced by its image
    /// under `map`; returns `None` if a variable has no image.
    ///
    /// The copy has no cached rows and empty statistics.
    pub fn copy_with_variables(
        &self,
        name: impl Into<String>,
        map: impl Fn(VariableId) -> Option<VariableId>,
    ) -> Option<CumulativeConstraint> {
        let jobs = self
            .jobs
            .iter()
            .map(|job| Some(ArgJob::new(map(job.start_time)?, job.duration, job.demand)))
            .collect::<Option<Vec<_>>>()?;

        CumulativeConstraint::new(name, &jobs, self.capacity, self.parameters.options).ok()
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics
            .log(statistic_logger.attach_to_prefix(&self.name));
    }
}

/// Repeats the rules until a round changes no bound, so that a second call without external
/// changes does not change anything.
fn propagate_to_fixpoint<Store: BoundStore + ?Sized>(
    context: &mut PropagationContextMut<'_, Store>,
    linking: &impl IndicatorLinking,
    parameters: &CumulativeParameters,
    statistics: &mut CumulativeStatistics,
) -> PropagationStatus {
    loop {
        let before = context.num_bound_changes();
        propagate_rules(context, linking, parameters, statistics)?;
        if context.num_bound_changes() == before {
            return Ok(());
        }
        trace!("{} bound changes in round", context.num_bound_changes() - before);
    }
}

/// Runs the enabled rules in their fixed order, stopping at the first conflict.
fn propagate_rules<Store: BoundStore + ?Sized>(
    context: &mut PropagationContextMut<'_, Store>,
    linking: &impl IndicatorLinking,
    parameters: &CumulativeParameters,
    statistics: &mut CumulativeStatistics,
) -> PropagationStatus {
    let options = &parameters.options;

    if options.is_enabled(CumulativeRule::CoreTimes)
        || options.is_enabled(CumulativeRule::CoreTimeHoles)
    {
        let mut profile = create_time_table(parameters, context.domains())?;

        if options.is_enabled(CumulativeRule::CoreTimes) {
            let before = context.num_bound_changes();
            propagate_core_times(context, parameters, &mut profile)?;
            statistics.num_bound_changes_core_times += context.num_bound_changes() - before;
        }
        if options.is_enabled(CumulativeRule::CoreTimeHoles) {
            let before = context.num_bound_changes();
            propagate_core_time_holes(context, linking, parameters, &mut profile)?;
            statistics.num_indicators_fixed += context.num_bound_changes() - before;
        }
    }

    if options.is_enabled(CumulativeRule::OverloadCheck) {
        check_overload(parameters, context.domains())?;
    }

    if options.is_enabled(CumulativeRule::EdgeFinding) {
        let before = context.num_bound_changes();
        propagate_edge_finding(context, parameters, Direction::Forward)?;
        let backward = Direction::backward(parameters, context.domains());
        propagate_edge_finding(context, parameters, backward)?;
        statistics.num_bound_changes_edge_finding += context.num_bound_changes() - before;
    }

    if options.is_enabled(CumulativeRule::EnergeticReasoning) {
        let before = context.num_bound_changes();
        propagate_energetic_reasoning(context, parameters)?;
        statistics.num_bound_changes_energetic_reasoning += context.num_bound_changes() - before;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Solution;
    use crate::conjunction;
    use crate::engine::NoIndicatorVariables;
    use crate::engine::TestSolver;
    use crate::predicate;
    use crate::propagators::cumulative::CumulativeRelaxationOptions;

    fn constraint(jobs: &[ArgJob], capacity: i32) -> CumulativeConstraint {
        CumulativeConstraint::new("resource", jobs, capacity, CumulativeOptions::default())
            .expect("valid input")
    }

    fn relaxation_options(materialisation: RowMaterialisation) -> CumulativeOptions {
        CumulativeOptions {
            relaxation: CumulativeRelaxationOptions {
                use_capacity_rows: true,
                use_cover_cuts: false,
                materialisation,
            },
            ..Default::default()
        }
    }

    #[test]
    fn job_is_pushed_after_core_of_other_job() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 0);
        let b = solver.new_variable(0, 3);
        let mut cumulative = constraint(&[ArgJob::new(a, 2, 2), ArgJob::new(b, 2, 1)], 2);

        let result = cumulative.propagate(&mut solver, &NoIndicatorVariables);

        assert!(!result.cutoff);
        assert!(result.num_bound_changes >= 1);
        assert_eq!(solver.lower_bound(b), 2);
        assert_eq!(solver.upper_bound(b), 3);
        assert_eq!(cumulative.statistics().num_propagation_calls, 1);
    }

    #[test]
    fn too_many_jobs_in_window_is_a_conflict() {
        let mut solver = TestSolver::default();
        let jobs = (0..3)
            .map(|_| ArgJob::new(solver.new_variable(0, 1), 1, 2))
            .collect::<Vec<_>>();
        let mut cumulative = constraint(&jobs, 3);

        let result = cumulative.propagate(&mut solver, &NoIndicatorVariables);

        assert!(result.cutoff);
        assert_eq!(solver.conflicts().len(), 1);
        assert!(solver.holds(&solver.conflicts()[0]));
        assert_eq!(cumulative.statistics().num_conflicts, 1);
    }

    #[test]
    fn constraint_without_jobs_is_redundant() {
        let mut solver = TestSolver::default();
        let mut cumulative = constraint(&[], 1);

        let result = cumulative.propagate(&mut solver, &NoIndicatorVariables);

        assert_eq!(
            result,
            PropagationResult {
                cutoff: false,
                num_bound_changes: 0,
                redundant: true,
            }
        );
        assert!(solver.conflicts().is_empty());
    }

    #[test]
    fn demand_exceeding_capacity_is_an_unconditional_conflict() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 10);
        let mut cumulative = constraint(&[ArgJob::new(a, 2, 3)], 2);

        let result = cumulative.propagate(&mut solver, &NoIndicatorVariables);

        assert!(result.cutoff);
        assert_eq!(solver.conflicts(), &[PropositionalConjunction::default()]);
    }

    #[test]
    fn second_propagation_changes_nothing() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 2);
        let b = solver.new_variable(0, 8);
        let c = solver.new_variable(1, 9);
        let mut cumulative = constraint(
            &[
                ArgJob::new(a, 4, 2),
                ArgJob::new(b, 3, 1),
                ArgJob::new(c, 2, 2),
            ],
            2,
        );

        let first = cumulative.propagate(&mut solver, &NoIndicatorVariables);
        assert!(!first.cutoff);
        let second = cumulative.propagate(&mut solver, &NoIndicatorVariables);

        assert!(!second.cutoff);
        assert_eq!(second.num_bound_changes, 0);
    }

    #[test]
    fn negative_input_is_rejected() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 10);

        let error = CumulativeConstraint::new(
            "resource",
            &[ArgJob::new(a, 1, 1), ArgJob::new(a, -1, 1)],
            1,
            CumulativeOptions::default(),
        )
        .expect_err("negative duration");
        assert_eq!(
            error,
            ConstraintOperationError::NegativeDuration {
                job: 1,
                duration: -1
            }
        );

        let error = CumulativeConstraint::new(
            "resource",
            &[ArgJob::new(a, 1, -2)],
            1,
            CumulativeOptions::default(),
        )
        .expect_err("negative demand");
        assert_eq!(
            error,
            ConstraintOperationError::NegativeDemand { job: 0, demand: -2 }
        );

        let error = CumulativeConstraint::new("resource", &[], -1, CumulativeOptions::default())
            .expect_err("negative capacity");
        assert_eq!(error, ConstraintOperationError::NegativeCapacity(-1));
    }

    #[test]
    fn bound_change_is_explained_by_core() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 0);
        let b = solver.new_variable(0, 3);
        let mut cumulative = constraint(&[ArgJob::new(a, 2, 2), ArgJob::new(b, 2, 1)], 2);
        let _ = cumulative.propagate(&mut solver, &NoIndicatorVariables);

        let position = solver
            .position_of(predicate!(b >= 2))
            .expect("b was propagated");
        let change = solver.bound_changes()[position];
        let record = change.reason.expect("the change has a record");
        assert_eq!(record.rule(), CumulativeRule::CoreTimes);

        let snapshot = solver.domains_before(position);
        solver.begin_conflict_analysis();
        let explained = cumulative.explain_bound_change(
            record,
            &BoundChangeContext::new(change.predicate, &snapshot),
            &mut solver,
        );
        solver.submit_conflict();

        assert!(explained);
        assert_eq!(
            solver.conflicts()[0],
            conjunction!([b >= 0] & [a >= 0] & [a <= 0])
        );
    }

    #[test]
    fn record_of_other_job_is_not_explained() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 0);
        let b = solver.new_variable(0, 3);
        let mut cumulative = constraint(&[ArgJob::new(a, 2, 2), ArgJob::new(b, 2, 1)], 2);

        let record = InferenceRecord::new(CumulativeRule::CoreTimes, JobId::new(0), 0, 3);
        solver.begin_conflict_analysis();
        let explained = cumulative.explain_bound_change(
            record,
            &BoundChangeContext::new(predicate!(b >= 2), &solver.domains_before(0)),
            &mut solver,
        );

        assert!(!explained);
        let unknown_job = InferenceRecord::new(CumulativeRule::EdgeFinding, JobId::new(7), 0, 3);
        assert!(cumulative
            .create_explanation(
                unknown_job,
                &BoundChangeContext::new(predicate!(b >= 2), &solver)
            )
            .is_none());
    }

    #[test]
    fn check_detects_overloaded_time_point() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 5);
        let b = solver.new_variable(0, 5);
        let cumulative = constraint(&[ArgJob::new(a, 2, 2), ArgJob::new(b, 2, 1)], 2);

        let overlapping: Solution = [(a, 0), (b, 1)].into_iter().collect();
        let sequential: Solution = [(a, 0), (b, 2)].into_iter().collect();

        assert!(!cumulative.check(&overlapping));
        assert_eq!(
            cumulative.find_violation(&overlapping),
            Some(CapacityViolation { time: 1, usage: 3 })
        );
        assert!(cumulative.check(&sequential));
    }

    #[test]
    fn irrelevant_jobs_are_removed() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 5);
        let b = solver.new_variable(0, 5);
        let c = solver.new_variable(0, 5);
        let mut cumulative = constraint(
            &[
                ArgJob::new(a, 0, 1),
                ArgJob::new(b, 2, 1),
                ArgJob::new(c, 3, 0),
            ],
            1,
        );

        assert_eq!(cumulative.remove_irrelevant_jobs(), 2);
        assert_eq!(cumulative.jobs(), &[ArgJob::new(b, 2, 1)]);
        assert_eq!(cumulative.job_of_variable(b), Some(JobId::new(0)));
        assert_eq!(cumulative.job_of_variable(a), None);
        assert_eq!(cumulative.remove_irrelevant_jobs(), 0);
    }

    #[test]
    fn accessors_return_the_input() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 5);
        let b = solver.new_variable(0, 5);
        let cumulative = constraint(&[ArgJob::new(a, 2, 4), ArgJob::new(b, 3, 1)], 6);

        assert_eq!(cumulative.name(), "resource");
        assert_eq!(cumulative.start_variables().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(cumulative.durations().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(cumulative.demands().collect::<Vec<_>>(), vec![4, 1]);
        assert_eq!(cumulative.capacity(), 6);
    }

    #[test]
    fn capacity_rows_are_added_as_constraints_once() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 1);
        let b = solver.new_variable(0, 1);
        let _ = solver.new_indicator_variables(a);
        let _ = solver.new_indicator_variables(b);
        let linking = solver.indicator_linking();
        let mut cumulative = CumulativeConstraint::new(
            "resource",
            &[ArgJob::new(a, 2, 1), ArgJob::new(b, 2, 1)],
            1,
            relaxation_options(RowMaterialisation::Constraints),
        )
        .expect("valid input");

        let domains = solver.domains_before(solver.bound_changes().len());
        let first = cumulative.separate(&domains, &linking, &mut solver, None::<&Solution>);
        let second = cumulative.separate(&domains, &linking, &mut solver, None::<&Solution>);

        assert!(!first.cutoff);
        assert!(first.num_rows_added > 0);
        assert_eq!(first.num_rows_added, solver.rows().count());
        assert!(solver.rows().all(|row| row.is_constraint && !row.local));
        assert_eq!(second.num_rows_added, 0);

        cumulative.release_rows(&mut solver);
        assert!(solver.rows().all(|row| row.is_released));
    }

    #[test]
    fn only_violated_rows_are_added_as_cuts() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 1);
        let b = solver.new_variable(0, 1);
        let indicators_a = solver.new_indicator_variables(a);
        let indicators_b = solver.new_indicator_variables(b);
        let linking = solver.indicator_linking();
        let mut cumulative = CumulativeConstraint::new(
            "resource",
            &[ArgJob::new(a, 2, 1), ArgJob::new(b, 2, 1)],
            1,
            relaxation_options(RowMaterialisation::Cuts),
        )
        .expect("valid input");
        let domains = solver.domains_before(solver.bound_changes().len());

        let empty = Solution::default();
        let result = cumulative.separate(&domains, &linking, &mut solver, Some(&empty));
        assert_eq!(result, SeparationResult::default());

        let both_at_zero: Solution = [(indicators_a[0], 1), (indicators_b[0], 1)]
            .into_iter()
            .collect();
        let result = cumulative.separate(&domains, &linking, &mut solver, Some(&both_at_zero));
        assert!(!result.cutoff);
        assert!(result.num_rows_added > 0);
        assert!(solver
            .rows()
            .filter(|row| row.is_cut)
            .all(|row| row.activity(&both_at_zero) > row.rhs));

        solver.relaxation_is_infeasible = true;
        let result = cumulative.separate(&domains, &linking, &mut solver, Some(&both_at_zero));
        assert!(result.cutoff);
    }

    #[test]
    fn copy_maps_start_variables() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 5);
        let b = solver.new_variable(0, 5);
        let c = solver.new_variable(0, 5);
        let cumulative = constraint(&[ArgJob::new(a, 2, 1), ArgJob::new(b, 3, 1)], 1);

        let copy = cumulative
            .copy_with_variables("copy", |variable| Some(if variable == a { c } else { variable }))
            .expect("all variables are mapped");
        assert_eq!(copy.name(), "copy");
        assert_eq!(copy.jobs(), &[ArgJob::new(c, 2, 1), ArgJob::new(b, 3, 1)]);

        assert!(cumulative
            .copy_with_variables("copy", |variable| (variable == a).then_some(c))
            .is_none());
    }
}
