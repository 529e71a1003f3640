use std::fmt::Debug;
use std::fmt::Display;

use num::cast::AsPrimitive;
use num::traits::NumAssign;

use super::MovingAverage;

/// The average of all terms added so far.
#[derive(Default, Debug, Copy, Clone)]
pub struct CumulativeMovingAverage<Term> {
    sum: Term,
    num_terms: u64,
}

impl<Term> Display for CumulativeMovingAverage<Term>
where
    Term: Debug + NumAssign + AsPrimitive<f64>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl<Term> MovingAverage<Term> for CumulativeMovingAverage<Term>
where
    Term: Debug + NumAssign + AsPrimitive<f64>,
{
    fn add_term(&mut self, new_term: Term) {
        self.sum += new_term;
        self.num_terms += 1
    }

    fn value(&self) -> f64 {
        if self.num_terms > 0 {
            self.sum.as_() / (self.num_terms as f64)
        } else {
            0.0
        }
    }
}
