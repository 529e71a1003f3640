use crate::basic_types::PropositionalConjunction;
use crate::engine::predicates::Predicate;

/// Receives conflicts and the reasons of bound changes for conflict analysis.
pub trait ConflictSink {
    fn begin_conflict_analysis(&mut self);

    fn record_bound_in_reason(&mut self, predicate: Predicate);

    fn submit_conflict(&mut self);

    /// Reports a complete conflict.
    fn report_conflict(&mut self, conjunction: &PropositionalConjunction) {
        self.begin_conflict_analysis();
        for &predicate in conjunction.iter() {
            self.record_bound_in_reason(predicate);
        }
        self.submit_conflict();
    }
}
