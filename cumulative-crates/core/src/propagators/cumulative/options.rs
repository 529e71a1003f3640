use enumset::EnumSet;

use super::CumulativeRule;

#[derive(Debug, Clone, Copy)]
pub struct CumulativeOptions {
    /// The reasoning rules which are run by [`super::CumulativeConstraint::propagate`]; they
    /// are always run in the order core times, core-time holes, overload check, edge-finding
    /// (forward then backward), energetic reasoning.
    pub rules: EnumSet<CumulativeRule>,
    /// Determines which type of explanations is used for the energy-based rules.
    pub explanation_type: CumulativeExplanationType,
    pub relaxation: CumulativeRelaxationOptions,
}

impl Default for CumulativeOptions {
    fn default() -> Self {
        Self {
            rules: EnumSet::all(),
            explanation_type: CumulativeExplanationType::default(),
            relaxation: CumulativeRelaxationOptions::default(),
        }
    }
}

impl CumulativeOptions {
    pub fn new(
        rules: EnumSet<CumulativeRule>,
        explanation_type: CumulativeExplanationType,
        relaxation: CumulativeRelaxationOptions,
    ) -> Self {
        Self {
            rules,
            explanation_type,
            relaxation,
        }
    }

    pub fn is_enabled(&self, rule: CumulativeRule) -> bool {
        self.rules.contains(rule)
    }
}

/// Determines how the explanations of overloads and edge-finding are created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CumulativeExplanationType {
    /// Every job whose window lies inside the analysed window is part of the explanation.
    Naive,
    /// Only the jobs with the largest energy which are needed for the inference are part of the
    /// explanation.
    #[default]
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CumulativeRelaxationOptions {
    /// Create one capacity row per time point which can be overloaded.
    pub use_capacity_rows: bool,
    /// Separate cover cuts at the time points which can be overloaded.
    pub use_cover_cuts: bool,
    pub materialisation: RowMaterialisation,
}

impl Default for CumulativeRelaxationOptions {
    fn default() -> Self {
        Self {
            use_capacity_rows: true,
            use_cover_cuts: true,
            materialisation: RowMaterialisation::default(),
        }
    }
}

/// How the capacity rows are handed to the relaxation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RowMaterialisation {
    /// As cutting planes which are only added when violated.
    #[default]
    Cuts,
    /// As standalone linear constraints, added once.
    Constraints,
}
