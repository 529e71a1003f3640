pub(crate) mod predicate;

pub use predicate::*;
