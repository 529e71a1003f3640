use std::fmt::Debug;
use std::fmt::Display;

use crate::engine::ReadDomains;
use crate::engine::VariableId;

/// The kind of bound a [`Predicate`] states.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PredicateType {
    LowerBound,
    UpperBound,
}

/// A bound atomic constraint over a single variable, i.e. `[x >= v]` or `[x <= v]`.
///
/// Reasons for bound changes and conflicts are conjunctions of these predicates.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Predicate {
    variable: VariableId,
    predicate_type: PredicateType,
    right_hand_side: i32,
}

impl Predicate {
    pub const fn lower_bound(variable: VariableId, right_hand_side: i32) -> Self {
        Predicate {
            variable,
            predicate_type: PredicateType::LowerBound,
            right_hand_side,
        }
    }

    pub const fn upper_bound(variable: VariableId, right_hand_side: i32) -> Self {
        Predicate {
            variable,
            predicate_type: PredicateType::UpperBound,
            right_hand_side,
        }
    }

    pub fn get_variable(&self) -> VariableId {
        self.variable
    }

    pub fn get_predicate_type(&self) -> PredicateType {
        self.predicate_type
    }

    pub fn get_right_hand_side(&self) -> i32 {
        self.right_hand_side
    }

    pub fn is_lower_bound_predicate(&self) -> bool {
        self.predicate_type == PredicateType::LowerBound
    }

    pub fn is_upper_bound_predicate(&self) -> bool {
        self.predicate_type == PredicateType::UpperBound
    }

    /// Whether the predicate holds for the provided domains.
    pub fn is_satisfied(&self, domains: &(impl ReadDomains + ?Sized)) -> bool {
        match self.predicate_type {
            PredicateType::LowerBound => domains.lower_bound(self.variable) >= self.right_hand_side,
            PredicateType::UpperBound => domains.upper_bound(self.variable) <= self.right_hand_side,
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.predicate_type {
            PredicateType::LowerBound => write!(f, "[{} >= {}]", self.variable, self.right_hand_side),
            PredicateType::UpperBound => write!(f, "[{} <= {}]", self.variable, self.right_hand_side),
        }
    }
}

impl Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Creates predicates over a [`VariableId`].
pub trait PredicateConstructor {
    fn lower_bound_predicate(&self, bound: i32) -> Predicate;

    fn upper_bound_predicate(&self, bound: i32) -> Predicate;
}

impl PredicateConstructor for VariableId {
    fn lower_bound_predicate(&self, bound: i32) -> Predicate {
        Predicate::lower_bound(*self, bound)
    }

    fn upper_bound_predicate(&self, bound: i32) -> Predicate {
        Predicate::upper_bound(*self, bound)
    }
}

/// A macro which allows for the creation of a [`Predicate`].
///
/// # Example
/// ```rust
/// # use cumulative_core::predicate;
/// # use cumulative_core::predicates::PredicateType;
/// # use cumulative_core::variables::VariableId;
/// let x = VariableId::new(0);
///
/// let lower_bound_predicate = predicate!(x >= 2);
/// assert_eq!(lower_bound_predicate.get_predicate_type(), PredicateType::LowerBound);
///
/// let upper_bound_predicate = predicate!(x <= 3);
/// assert_eq!(upper_bound_predicate.get_right_hand_side(), 3);
/// ```
#[macro_export]
macro_rules! predicate {
    ($($var:ident).+$([$index:expr])? >= $bound:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.lower_bound_predicate($bound)
    }};
    ($($var:ident).+$([$index:expr])? <= $bound:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.upper_bound_predicate($bound)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_fields_are_matched() {
        struct Job {
            start_variable: VariableId,
        }
        let job = Job {
            start_variable: VariableId::new(3),
        };

        let predicate = predicate![job.start_variable >= 4];
        assert_eq!(predicate.get_variable(), VariableId::new(3));
        assert!(predicate.is_lower_bound_predicate());
        assert_eq!(predicate.get_right_hand_side(), 4);
    }

    #[test]
    fn display_shows_bound() {
        let x = VariableId::new(1);
        assert_eq!(predicate![x <= 7].to_string(), "[x1 <= 7]");
        assert_eq!(predicate![x >= -2].to_string(), "[x1 >= -2]");
    }
}
