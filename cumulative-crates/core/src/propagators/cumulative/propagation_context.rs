use log::trace;

use super::explanations::create_explanation;
use super::explanations::BoundChangeContext;
use super::CumulativeParameters;
use super::InferenceRecord;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::engine::predicates::Predicate;
use crate::engine::BoundStore;
use crate::engine::ReadDomains;
use crate::predicate;

/// Posts the bound changes of the reasoning rules to the [`BoundStore`].
///
/// A tightening which would empty a domain becomes a conflict: the explanation of the tightening
/// (computed against the current domains, which the failed tightening left untouched) together
/// with the opposite bound of the variable.
#[derive(Debug)]
pub(crate) struct PropagationContextMut<'a, Store: BoundStore + ?Sized> {
    store: &'a mut Store,
    parameters: &'a CumulativeParameters,
    num_bound_changes: usize,
}

impl<'a, Store: BoundStore + ?Sized> PropagationContextMut<'a, Store> {
    pub(crate) fn new(store: &'a mut Store, parameters: &'a CumulativeParameters) -> Self {
        PropagationContextMut {
            store,
            parameters,
            num_bound_changes: 0,
        }
    }

    pub(crate) fn domains(&self) -> &Store {
        self.store
    }

    pub(crate) fn num_bound_changes(&self) -> usize {
        self.num_bound_changes
    }

    pub(crate) fn post(&mut self, predicate: Predicate, record: InferenceRecord) -> PropagationStatus {
        let variable = predicate.get_variable();
        let bound = predicate.get_right_hand_side();

        let result = if predicate.is_lower_bound_predicate() {
            self.store.tighten_lower_bound(variable, bound, record)
        } else {
            self.store.tighten_upper_bound(variable, bound, record)
        };

        match result {
            Ok(changed) => {
                if changed {
                    self.num_bound_changes += 1;
                    trace!("{} propagated {predicate}", record.rule());
                }
                Ok(())
            }
            Err(_) => {
                let context = BoundChangeContext::new(predicate, &*self.store);
                let mut conjunction = create_explanation(self.parameters, record, &context);
                conjunction.push(if predicate.is_lower_bound_predicate() {
                    predicate!(variable <= self.store.upper_bound(variable))
                } else {
                    predicate!(variable >= self.store.lower_bound(variable))
                });
                trace!("{} emptied the domain of {variable}", record.rule());
                Err(PropagatorConflict::new(conjunction, record.rule()))
            }
        }
    }
}
