use thiserror::Error;

/// Errors related to creating a cumulative constraint from malformed input.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    #[error("job {job} has negative duration {duration}")]
    NegativeDuration { job: usize, duration: i32 },
    #[error("job {job} has negative demand {demand}")]
    NegativeDemand { job: usize, demand: i32 },
    #[error("the capacity {0} is negative")]
    NegativeCapacity(i32),
}
