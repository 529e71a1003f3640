mod cumulative_moving_average;

pub use cumulative_moving_average::CumulativeMovingAverage;

/// An average over a stream of terms.
pub trait MovingAverage<Term> {
    fn add_term(&mut self, new_term: Term);

    fn value(&self) -> f64;
}
