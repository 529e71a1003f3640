use crate::containers::KeyedVec;
use crate::engine::VariableId;

/// Read access to the values of a (possibly fractional) solution.
pub trait SolutionValues {
    fn value(&self, variable: VariableId) -> f64;

    fn integer_value(&self, variable: VariableId) -> i32 {
        self.value(variable).round() as i32
    }
}

/// A dense assignment of values to variables; unassigned variables have value zero.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    values: KeyedVec<VariableId, f64>,
}

impl Solution {
    pub fn set(&mut self, variable: VariableId, value: f64) {
        self.values.accomodate(variable, 0.0);
        self.values[variable] = value;
    }

    pub fn with_value(mut self, variable: VariableId, value: f64) -> Self {
        self.set(variable, value);
        self
    }
}

impl SolutionValues for Solution {
    fn value(&self, variable: VariableId) -> f64 {
        if variable.id as usize >= self.values.len() {
            0.0
        } else {
            self.values[variable]
        }
    }
}

impl FromIterator<(VariableId, i32)> for Solution {
    fn from_iter<T: IntoIterator<Item = (VariableId, i32)>>(iter: T) -> Self {
        let mut solution = Solution::default();
        for (variable, value) in iter {
            solution.set(variable, value as f64);
        }
        solution
    }
}
