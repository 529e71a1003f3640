//! This module exposes an in-memory implementation of every collaborator of the cumulative
//! constraint. The [`TestSolver`] allows setting up specific scenarios under which to test the
//! operations of the constraint, and inspecting the bound changes, reasons, rows, and conflicts
//! which the constraint produced. The indicator variables are handed out separately through
//! [`TestSolver::indicator_linking`].
use super::BoundStore;
use super::ConflictSink;
use super::EmptyDomain;
use super::IndicatorMap;
use super::ReadDomains;
use super::RowId;
use super::RowSink;
use super::VariableId;
use crate::basic_types::PropositionalConjunction;
use crate::basic_types::SolutionValues;
use crate::containers::KeyedVec;
use crate::engine::predicates::Predicate;
use crate::propagators::cumulative::InferenceRecord;

/// A bound change on the trail of the [`TestSolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundChange {
    /// The new bound.
    pub predicate: Predicate,
    /// The bound of the same kind before the change.
    pub previous_bound: i32,
    /// The record passed along by the constraint; `None` for changes made by the test itself.
    pub reason: Option<InferenceRecord>,
}

/// A row created through the [`RowSink`] implementation of the [`TestSolver`].
#[derive(Clone, Debug, PartialEq)]
pub struct TestRow {
    pub name: String,
    pub lhs: f64,
    pub rhs: f64,
    pub local: bool,
    pub coefficients: Vec<(VariableId, f64)>,
    pub is_committed: bool,
    pub is_cut: bool,
    pub is_constraint: bool,
    pub is_released: bool,
}

impl TestRow {
    pub fn activity(&self, solution: &impl SolutionValues) -> f64 {
        self.coefficients
            .iter()
            .map(|&(variable, coefficient)| coefficient * solution.value(variable))
            .sum()
    }
}

/// A container for variables, and the sinks of rows and conflicts, which can be used to test the
/// cumulative constraint.
#[derive(Debug, Default)]
pub struct TestSolver {
    lower_bounds: KeyedVec<VariableId, i32>,
    upper_bounds: KeyedVec<VariableId, i32>,
    trail: Vec<BoundChange>,
    indicators: IndicatorMap,
    rows: KeyedVec<RowId, TestRow>,
    conflicts: Vec<PropositionalConjunction>,
    conflict_under_construction: Option<PropositionalConjunction>,
    /// When set, [`RowSink::add_cut_to_relaxation`] reports an infeasible relaxation.
    pub relaxation_is_infeasible: bool,
}

impl TestSolver {
    pub fn new_variable(&mut self, lb: i32, ub: i32) -> VariableId {
        assert!(lb <= ub, "cannot create the empty variable [{lb}, {ub}]");
        let _ = self.lower_bounds.push(lb);
        self.upper_bounds.push(ub)
    }

    /// Creates one 0/1 indicator for every start time in the domain of `start_variable` and links
    /// them to it.
    pub fn new_indicator_variables(&mut self, start_variable: VariableId) -> Vec<VariableId> {
        let offset = self.lower_bound(start_variable);
        let indicators = (offset..=self.upper_bound(start_variable))
            .map(|_| self.new_variable(0, 1))
            .collect::<Vec<_>>();
        self.indicators
            .link(start_variable, offset, indicators.clone());
        indicators
    }

    /// The indicators created by [`TestSolver::new_indicator_variables`].
    pub fn indicator_linking(&self) -> IndicatorMap {
        self.indicators.clone()
    }

    /// Sets the lower bound as if a decision was made; the change has no reason.
    pub fn set_lower_bound(&mut self, variable: VariableId, bound: i32) -> Result<(), EmptyDomain> {
        self.apply(Predicate::lower_bound(variable, bound), None)
            .map(|_| ())
    }

    /// Sets the upper bound as if a decision was made; the change has no reason.
    pub fn set_upper_bound(&mut self, variable: VariableId, bound: i32) -> Result<(), EmptyDomain> {
        self.apply(Predicate::upper_bound(variable, bound), None)
            .map(|_| ())
    }

    pub fn bound_changes(&self) -> &[BoundChange] {
        &self.trail
    }

    /// The position on the trail of the most recent change which made `predicate` true.
    pub fn position_of(&self, predicate: Predicate) -> Option<usize> {
        self.trail.iter().rposition(|change| {
            change.predicate.get_variable() == predicate.get_variable()
                && change.predicate.get_predicate_type() == predicate.get_predicate_type()
                && change.predicate.get_right_hand_side() == predicate.get_right_hand_side()
        })
    }

    /// The domains as they were just before the change at `trail_position`.
    pub fn domains_before(&self, trail_position: usize) -> DomainSnapshot {
        let mut snapshot = DomainSnapshot {
            lower_bounds: self.lower_bounds.clone(),
            upper_bounds: self.upper_bounds.clone(),
        };
        for change in self.trail[trail_position..].iter().rev() {
            let variable = change.predicate.get_variable();
            if change.predicate.is_lower_bound_predicate() {
                snapshot.lower_bounds[variable] = change.previous_bound;
            } else {
                snapshot.upper_bounds[variable] = change.previous_bound;
            }
        }
        snapshot
    }

    pub fn conflicts(&self) -> &[PropositionalConjunction] {
        &self.conflicts
    }

    pub fn rows(&self) -> impl Iterator<Item = &TestRow> {
        self.rows.iter()
    }

    pub fn row(&self, row: RowId) -> &TestRow {
        &self.rows[row]
    }

    /// Every predicate of the conjunction holds in the current domains.
    pub fn holds(&self, conjunction: &PropositionalConjunction) -> bool {
        conjunction.iter().all(|predicate| predicate.is_satisfied(self))
    }

    fn apply(
        &mut self,
        predicate: Predicate,
        reason: Option<InferenceRecord>,
    ) -> Result<bool, EmptyDomain> {
        let variable = predicate.get_variable();
        let bound = predicate.get_right_hand_side();
        let (current, opposite_is_crossed) = if predicate.is_lower_bound_predicate() {
            (
                self.lower_bounds[variable],
                bound > self.upper_bounds[variable],
            )
        } else {
            (
                self.upper_bounds[variable],
                bound < self.lower_bounds[variable],
            )
        };
        let improves = if predicate.is_lower_bound_predicate() {
            bound > current
        } else {
            bound < current
        };

        if !improves {
            return Ok(false);
        }
        if opposite_is_crossed {
            return Err(EmptyDomain);
        }

        if predicate.is_lower_bound_predicate() {
            self.lower_bounds[variable] = bound;
        } else {
            self.upper_bounds[variable] = bound;
        }
        self.trail.push(BoundChange {
            predicate,
            previous_bound: current,
            reason,
        });
        Ok(true)
    }
}

impl ReadDomains for TestSolver {
    fn lower_bound(&self, variable: VariableId) -> i32 {
        self.lower_bounds[variable]
    }

    fn upper_bound(&self, variable: VariableId) -> i32 {
        self.upper_bounds[variable]
    }
}

impl BoundStore for TestSolver {
    fn tighten_lower_bound(
        &mut self,
        variable: VariableId,
        new_lower_bound: i32,
        reason: InferenceRecord,
    ) -> Result<bool, EmptyDomain> {
        self.apply(Predicate::lower_bound(variable, new_lower_bound), Some(reason))
    }

    fn tighten_upper_bound(
        &mut self,
        variable: VariableId,
        new_upper_bound: i32,
        reason: InferenceRecord,
    ) -> Result<bool, EmptyDomain> {
        self.apply(Predicate::upper_bound(variable, new_upper_bound), Some(reason))
    }
}

impl RowSink for TestSolver {
    fn create_row(&mut self, name: &str, lhs: f64, rhs: f64, local: bool) -> RowId {
        self.rows.push(TestRow {
            name: name.to_owned(),
            lhs,
            rhs,
            local,
            coefficients: Vec::new(),
            is_committed: false,
            is_cut: false,
            is_constraint: false,
            is_released: false,
        })
    }

    fn add_coefficient(&mut self, row: RowId, variable: VariableId, coefficient: f64) {
        assert!(!self.rows[row].is_committed, "row {row:?} is already committed");
        self.rows[row].coefficients.push((variable, coefficient));
    }

    fn commit_row(&mut self, row: RowId) {
        self.rows[row].is_committed = true;
    }

    fn add_cut_to_relaxation(&mut self, row: RowId) -> bool {
        self.rows[row].is_cut = true;
        self.relaxation_is_infeasible
    }

    fn add_row_as_constraint(&mut self, row: RowId) {
        self.rows[row].is_constraint = true;
    }

    fn release_row(&mut self, row: RowId) {
        self.rows[row].is_released = true;
    }
}

impl ConflictSink for TestSolver {
    fn begin_conflict_analysis(&mut self) {
        self.conflict_under_construction = Some(PropositionalConjunction::default());
    }

    fn record_bound_in_reason(&mut self, predicate: Predicate) {
        self.conflict_under_construction
            .as_mut()
            .expect("conflict analysis was not started")
            .push(predicate);
    }

    fn submit_conflict(&mut self) {
        let conflict = self
            .conflict_under_construction
            .take()
            .expect("conflict analysis was not started");
        self.conflicts.push(conflict);
    }
}

/// The bounds of all variables of a [`TestSolver`] at an earlier point.
#[derive(Clone, Debug)]
pub struct DomainSnapshot {
    lower_bounds: KeyedVec<VariableId, i32>,
    upper_bounds: KeyedVec<VariableId, i32>,
}

impl ReadDomains for DomainSnapshot {
    fn lower_bound(&self, variable: VariableId) -> i32 {
        self.lower_bounds[variable]
    }

    fn upper_bound(&self, variable: VariableId) -> i32 {
        self.upper_bounds[variable]
    }
}
