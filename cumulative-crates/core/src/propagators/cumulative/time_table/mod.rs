//! Contains the time-table reasoning of the cumulative constraint.
//!
//! The time-table (or resource profile) contains the cores of the jobs: a job with bounds
//! `[est, lst]` always executes during `[lst, est + duration)` if this interval is non-empty.
//! A job cannot start at a time point where its execution would overlap a part of the profile
//! whose remaining capacity is below its demand; [`propagate_core_times`] removes such start
//! times from the ends of the domains while [`propagate_core_time_holes`] removes them from the
//! middle through the indicator variables of the job.
mod core_times;
mod holes;

pub(crate) use core_times::create_time_table;
pub(crate) use core_times::propagate_core_times;
pub(crate) use holes::propagate_core_time_holes;
