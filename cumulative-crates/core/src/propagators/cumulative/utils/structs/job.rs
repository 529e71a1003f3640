use crate::containers::StorageKey;
use crate::engine::ReadDomains;
use crate::engine::VariableId;

/// The position of a job in the job array of its constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u32);

impl JobId {
    pub const fn new(id: u32) -> Self {
        JobId(id)
    }

    pub fn unpack(&self) -> u32 {
        self.0
    }
}

impl StorageKey for JobId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        JobId(index as u32)
    }
}

/// Structure which stores the data of a job as it is used by the reasoning rules; the demand is
/// the normalised demand (see [`super::CumulativeParameters`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Job {
    /// The variable representing the start time of the job
    pub(crate) start_variable: VariableId,
    pub(crate) duration: i32,
    /// How much of the resource the job uses during its non-preemptive execution
    pub(crate) demand: i32,
    pub(crate) id: JobId,
}

impl Job {
    /// Jobs without duration or without demand never use the resource.
    pub(crate) fn is_relevant(&self) -> bool {
        self.duration > 0 && self.demand > 0
    }

    pub(crate) fn energy(&self) -> i64 {
        self.duration as i64 * self.demand as i64
    }

    pub(crate) fn est(&self, domains: &(impl ReadDomains + ?Sized)) -> i32 {
        domains.lower_bound(self.start_variable)
    }

    pub(crate) fn lst(&self, domains: &(impl ReadDomains + ?Sized)) -> i32 {
        domains.upper_bound(self.start_variable)
    }

    pub(crate) fn ect(&self, domains: &(impl ReadDomains + ?Sized)) -> i32 {
        self.est(domains) + self.duration
    }

    pub(crate) fn lct(&self, domains: &(impl ReadDomains + ?Sized)) -> i32 {
        self.lst(domains) + self.duration
    }

    /// The interval `[lst, ect)` which the job occupies in every completion, if it is non-empty.
    pub(crate) fn core(&self, domains: &(impl ReadDomains + ?Sized)) -> Option<(i32, i32)> {
        let (lst, ect) = (self.lst(domains), self.ect(domains));
        (self.is_relevant() && lst < ect).then_some((lst, ect))
    }
}

/// The job which is passed as argument when creating the constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArgJob {
    /// The variable representing the start time of the job
    pub start_time: VariableId,
    pub duration: i32,
    pub demand: i32,
}

impl ArgJob {
    pub fn new(start_time: VariableId, duration: i32, demand: i32) -> Self {
        ArgJob {
            start_time,
            duration,
            demand,
        }
    }
}
