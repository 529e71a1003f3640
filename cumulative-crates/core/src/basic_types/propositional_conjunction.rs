use std::ops::Deref;

use itertools::Itertools;

use crate::engine::predicates::Predicate;

/// A struct which represents a conjunction of [`Predicate`]s (e.g. it can represent `[x >= 5] /\ [y
/// <= 10]`).
#[derive(Clone, Default, Eq)]
pub struct PropositionalConjunction {
    predicates_in_conjunction: Vec<Predicate>,
}

impl Deref for PropositionalConjunction {
    type Target = [Predicate];

    fn deref(&self) -> &Self::Target {
        &self.predicates_in_conjunction
    }
}

impl PropositionalConjunction {
    pub fn new(predicates_in_conjunction: Vec<Predicate>) -> Self {
        PropositionalConjunction {
            predicates_in_conjunction,
        }
    }

    pub fn as_slice(&self) -> &[Predicate] {
        self.predicates_in_conjunction.as_slice()
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates_in_conjunction.push(predicate);
    }

    pub fn extend_and_remove_duplicates(
        mut self,
        additional_elements: impl Iterator<Item = Predicate>,
    ) -> PropositionalConjunction {
        self.predicates_in_conjunction = self
            .predicates_in_conjunction
            .into_iter()
            .chain(additional_elements)
            .unique()
            .collect();
        self
    }
}

impl Extend<Predicate> for PropositionalConjunction {
    fn extend<T: IntoIterator<Item = Predicate>>(&mut self, iter: T) {
        self.predicates_in_conjunction.extend(iter);
    }
}

impl IntoIterator for PropositionalConjunction {
    type Item = Predicate;

    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates_in_conjunction.into_iter()
    }
}

impl FromIterator<Predicate> for PropositionalConjunction {
    fn from_iter<T: IntoIterator<Item = Predicate>>(iter: T) -> Self {
        PropositionalConjunction::new(iter.into_iter().collect())
    }
}

impl From<Vec<Predicate>> for PropositionalConjunction {
    fn from(predicates: Vec<Predicate>) -> Self {
        PropositionalConjunction::new(predicates)
    }
}

impl std::fmt::Display for PropositionalConjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.predicates_in_conjunction.is_empty() {
            write!(f, "{{empty}}")
        } else {
            write!(f, "{}", self.predicates_in_conjunction.iter().join(" /\\ "))
        }
    }
}

impl std::fmt::Debug for PropositionalConjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Two conjunctions are equal when they contain the same predicates, regardless of order.
impl PartialEq for PropositionalConjunction {
    fn eq(&self, other: &Self) -> bool {
        if self.predicates_in_conjunction.len() != other.predicates_in_conjunction.len() {
            return false;
        }

        self.predicates_in_conjunction
            .iter()
            .all(|predicate| other.predicates_in_conjunction.contains(predicate))
    }
}

/// A macro which allows for the creation of a [`PropositionalConjunction`].
///
/// # Example
/// ```rust
/// # use cumulative_core::conjunction;
/// # use cumulative_core::variables::VariableId;
/// let x = VariableId::new(0);
/// let y = VariableId::new(1);
///
/// let conjunction = conjunction!([x >= 5] & [y <= 8]);
/// assert_eq!(conjunction.len(), 2);
/// ```
#[macro_export]
macro_rules! conjunction {
    (@to_conjunction $($body:tt)*) => {
        $crate::predicates::PropositionalConjunction::from($($body)*)
    };

    (@munch {$($body:tt)*} -> & [$($pred:tt)+] $($rest:tt)*) => {
        conjunction!(@munch {$crate::predicate![$($pred)+], $($body)*} -> $($rest)*)
    };

    (@munch {$($body:tt)*} -> ) => {
        conjunction!(@to_conjunction vec![$($body)*])
    };

    (@munch {$($body:tt)*} -> $($rest:tt)+) => {
        compile_error!("Incorrect usage of the macro")
    };

    ($($input:tt)+) => {
        conjunction!(@munch {} -> & $($input)*)
    };

    () => {
        conjunction!(@to_conjunction vec![])
    };
}

#[cfg(test)]
mod tests {
    use crate::conjunction;
    use crate::engine::VariableId;
    use crate::predicate;

    #[test]
    fn order_is_ignored_for_equality() {
        let x = VariableId::new(0);
        let y = VariableId::new(1);

        let conjunction_1 = conjunction!([x >= 5] & [y <= 7]);
        let conjunction_2 = conjunction!([y <= 7] & [x >= 5]);

        assert_eq!(conjunction_1, conjunction_2);
    }

    #[test]
    fn duplicates_are_removed_when_extending() {
        let x = VariableId::new(0);
        let y = VariableId::new(1);

        let conjunction = conjunction!([x >= 5]).extend_and_remove_duplicates(
            vec![predicate!(x >= 5), predicate!(y <= 2)].into_iter(),
        );

        assert_eq!(conjunction, conjunction!([x >= 5] & [y <= 2]));
    }
}
