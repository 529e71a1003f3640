mod job;
mod parameters;
mod resource_profile;

pub use job::ArgJob;
pub(crate) use job::Job;
pub use job::JobId;
pub(crate) use parameters::*;
pub(crate) use resource_profile::*;
