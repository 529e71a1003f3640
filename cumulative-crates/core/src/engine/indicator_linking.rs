use crate::containers::HashMap;
use crate::engine::VariableId;

/// Links a start-time variable to time-indexed 0/1 indicator variables, where the `k`-th
/// indicator is one if and only if the job starts at `time_offset + k`.
///
/// The linking itself is enforced elsewhere; the cumulative engine only fixes indicators to zero
/// (hole propagation) and uses them as columns of its relaxation rows.
pub trait IndicatorLinking {
    fn indicator_variables(&self, start_variable: VariableId) -> Option<&[VariableId]>;

    fn time_offset(&self, start_variable: VariableId) -> i32;

    /// The indicator of starting at `time`, if it exists.
    fn indicator_for(&self, start_variable: VariableId, time: i32) -> Option<VariableId> {
        let indicators = self.indicator_variables(start_variable)?;
        let index = time.checked_sub(self.time_offset(start_variable))?;
        usize::try_from(index)
            .ok()
            .and_then(|index| indicators.get(index).copied())
    }
}

/// Used when no job has indicator variables.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIndicatorVariables;

impl IndicatorLinking for NoIndicatorVariables {
    fn indicator_variables(&self, _start_variable: VariableId) -> Option<&[VariableId]> {
        None
    }

    fn time_offset(&self, _start_variable: VariableId) -> i32 {
        0
    }
}

/// Stores for every linked start-time variable the offset and the indicators of its start times.
#[derive(Clone, Debug, Default)]
pub struct IndicatorMap {
    indicators: HashMap<VariableId, (i32, Vec<VariableId>)>,
}

impl IndicatorMap {
    /// Links `indicators` to `start_variable`; the `k`-th indicator corresponds to starting at
    /// `time_offset + k`.
    pub fn link(&mut self, start_variable: VariableId, time_offset: i32, indicators: Vec<VariableId>) {
        let _ = self
            .indicators
            .insert(start_variable, (time_offset, indicators));
    }
}

impl IndicatorLinking for IndicatorMap {
    fn indicator_variables(&self, start_variable: VariableId) -> Option<&[VariableId]> {
        self.indicators
            .get(&start_variable)
            .map(|(_, indicators)| indicators.as_slice())
    }

    fn time_offset(&self, start_variable: VariableId) -> i32 {
        self.indicators
            .get(&start_variable)
            .map_or(0, |&(offset, _)| offset)
    }
}
