use enumset::EnumSetType;

use super::JobId;

/// The reasoning rules of the cumulative constraint.
#[derive(Debug, Hash, EnumSetType)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CumulativeRule {
    /// Bounds tightened against the profile of the cores of the other jobs.
    CoreTimes,
    /// Indicator variables fixed to zero for start times which conflict with the cores.
    CoreTimeHoles,
    /// Detection of time windows whose jobs need more energy than the window provides.
    OverloadCheck,
    /// Edge-finding on the Theta-Lambda tree, forward and backward.
    EdgeFinding,
    /// Energetic reasoning over all windows spanned by earliest starts and latest completions.
    EnergeticReasoning,
}

impl std::fmt::Display for CumulativeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CumulativeRule::CoreTimes => write!(f, "core_times"),
            CumulativeRule::CoreTimeHoles => write!(f, "core_time_holes"),
            CumulativeRule::OverloadCheck => write!(f, "overload_check"),
            CumulativeRule::EdgeFinding => write!(f, "edge_finding"),
            CumulativeRule::EnergeticReasoning => write!(f, "energetic_reasoning"),
        }
    }
}

/// The tag attached to every bound change made by the constraint.
///
/// It names the rule which made the change, the job it was made for, and the time window
/// `[est, lct)` which the rule reasoned over. For core-time reasoning the window is the set of
/// time points covered by the forbidden placements; for edge-finding and energetic reasoning it is
/// the window whose energy was analysed. Windows are always stored in the original (unmirrored)
/// time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InferenceRecord {
    rule: CumulativeRule,
    job: JobId,
    est: i32,
    lct: i32,
}

impl InferenceRecord {
    pub fn new(rule: CumulativeRule, job: JobId, est: i32, lct: i32) -> Self {
        InferenceRecord {
            rule,
            job,
            est,
            lct,
        }
    }

    pub fn rule(&self) -> CumulativeRule {
        self.rule
    }

    pub fn job(&self) -> JobId {
        self.job
    }

    pub fn est(&self) -> i32 {
        self.est
    }

    pub fn lct(&self) -> i32 {
        self.lct
    }
}
