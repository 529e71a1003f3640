use crate::cumulative_assert_extreme;
use crate::cumulative_assert_simple;

/// Returned when inserting an interval makes the remaining capacity negative; `time` is the
/// first time point at which this happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ProfileOverload {
    pub(crate) time: i32,
}

/// A sparse ledger of the remaining capacity of the resource over time.
///
/// The time points are strictly increasing; the remaining capacity stored for time point `t_i`
/// holds on `[t_i, t_{i+1})`. The first time point is [`i32::MIN`] and the last one is the
/// sentinel [`i32::MAX`] whose remaining capacity is always 0 and which is never part of a
/// placement.
#[derive(Clone, Debug)]
pub(crate) struct ResourceProfile {
    capacity: i32,
    time_points: Vec<i32>,
    remaining_capacity: Vec<i32>,
}

impl ResourceProfile {
    pub(crate) fn new(capacity: i32) -> Self {
        ResourceProfile {
            capacity,
            time_points: vec![i32::MIN, i32::MAX],
            remaining_capacity: vec![capacity, 0],
        }
    }

    pub(crate) fn capacity(&self) -> i32 {
        self.capacity
    }

    /// The segments `(start, end, remaining capacity)` of the profile, excluding the sentinel.
    pub(crate) fn segments(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        self.time_points
            .windows(2)
            .zip(self.remaining_capacity.iter())
            .map(|(bounds, &remaining)| (bounds[0], bounds[1], remaining))
    }

    /// The remaining capacity on the segment containing `time`.
    pub(crate) fn remaining_capacity_at(&self, time: i32) -> i32 {
        let (position, _) = self.find_left(time);
        self.remaining_capacity[position]
    }

    /// Returns the position of the segment which contains `time` and whether `time` is one of the
    /// time points.
    fn find_left(&self, time: i32) -> (usize, bool) {
        match self.time_points.binary_search(&time) {
            Ok(position) => (position, true),
            // The first time point is i32::MIN so the position is never 0
            Err(position) => (position - 1, false),
        }
    }

    fn insert_time_point(&mut self, time: i32) -> usize {
        let (position, found) = self.find_left(time);
        if found {
            return position;
        }
        self.time_points.insert(position + 1, time);
        self.remaining_capacity
            .insert(position + 1, self.remaining_capacity[position]);
        position + 1
    }

    /// Lowers the remaining capacity on `[begin, end)` by `delta_demand`; a negative delta raises
    /// it again, which is how intervals are deleted.
    ///
    /// The whole interval is always updated; if the remaining capacity becomes negative somewhere,
    /// the first such time point is reported.
    pub(crate) fn insert_interval(
        &mut self,
        begin: i32,
        end: i32,
        delta_demand: i32,
    ) -> Result<(), ProfileOverload> {
        if begin >= end || delta_demand == 0 {
            return Ok(());
        }
        cumulative_assert_simple!(
            end < i32::MAX,
            "intervals end before the sentinel of the profile"
        );

        let first = self.insert_time_point(begin);
        let last = self.insert_time_point(end);

        let mut overload = None;
        for position in first..last {
            self.remaining_capacity[position] -= delta_demand;
            if self.remaining_capacity[position] < 0 && overload.is_none() {
                overload = Some(ProfileOverload {
                    time: self.time_points[position],
                });
            }
        }

        cumulative_assert_extreme!(self.time_points.windows(2).all(|w| w[0] < w[1]));
        overload.map_or(Ok(()), Err)
    }

    pub(crate) fn delete_interval(&mut self, begin: i32, end: i32, demand: i32) {
        let result = self.insert_interval(begin, end, -demand);
        cumulative_assert_simple!(result.is_ok(), "deleting an interval cannot overload");
    }

    /// Returns the first segment overlapping `[start, start + duration)` whose remaining
    /// capacity is below `demand`, scanning from `position`.
    fn first_conflict(&self, position: usize, start: i64, duration: i32, demand: i32) -> Option<usize> {
        let end = start + duration as i64;
        let last_segment = self.time_points.len() - 1;

        (position..last_segment)
            .take_while(|&index| (self.time_points[index] as i64) < end)
            .find(|&index| self.remaining_capacity[index] < demand)
    }

    /// Whether all segments under `[start, start + duration)` have at least `demand` remaining
    /// capacity.
    pub(crate) fn is_feasible_start(&self, start: i32, duration: i32, demand: i32) -> bool {
        if duration == 0 || demand == 0 {
            return true;
        }
        let (position, _) = self.find_left(start);
        self.first_conflict(position, start as i64, duration, demand)
            .is_none()
    }

    /// The earliest start in `[lb, ub]` at which the job fits the profile, or `None` if there is
    /// no such start.
    ///
    /// When a placement conflicts with a segment, the next candidate is the end of that segment;
    /// hence every segment is visited at most once.
    pub(crate) fn earliest_feasible_start(
        &self,
        lb: i32,
        ub: i32,
        duration: i32,
        demand: i32,
    ) -> Option<i32> {
        if lb > ub {
            return None;
        }
        if duration == 0 || demand == 0 {
            return Some(lb);
        }

        let mut start = lb as i64;
        let (mut position, _) = self.find_left(lb);
        loop {
            if start > ub as i64 {
                return None;
            }
            match self.first_conflict(position, start, duration, demand) {
                None => return Some(start as i32),
                Some(conflict) => {
                    position = conflict + 1;
                    start = self.time_points[position] as i64;
                }
            }
        }
    }

    /// The latest start in `[lb, ub]` at which the job fits the profile, or `None` if there is
    /// no such start; the symmetric scan of [`ResourceProfile::earliest_feasible_start`].
    pub(crate) fn latest_feasible_start(
        &self,
        lb: i32,
        ub: i32,
        duration: i32,
        demand: i32,
    ) -> Option<i32> {
        if lb > ub {
            return None;
        }
        if duration == 0 || demand == 0 {
            return Some(ub);
        }

        let mut start = ub as i64;
        loop {
            if start < lb as i64 {
                return None;
            }
            let last_time_point = start + duration as i64 - 1;
            let (mut position, _) = self.find_left(last_time_point as i32);

            let mut conflict = None;
            loop {
                if self.remaining_capacity[position] < demand {
                    conflict = Some(position);
                    break;
                }
                if self.time_points[position] as i64 <= start {
                    break;
                }
                position -= 1;
            }

            match conflict {
                None => return Some(start as i32),
                Some(position) => start = self.time_points[position] as i64 - duration as i64,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remaining_capacities(profile: &ResourceProfile) -> Vec<(i32, i32)> {
        profile
            .segments()
            .map(|(start, _, remaining)| (start, remaining))
            .collect()
    }

    #[test]
    fn inserting_lowers_remaining_capacity() {
        let mut profile = ResourceProfile::new(3);
        assert!(profile.insert_interval(2, 5, 2).is_ok());
        assert!(profile.insert_interval(4, 7, 1).is_ok());

        assert_eq!(
            remaining_capacities(&profile),
            vec![(i32::MIN, 3), (2, 1), (4, 0), (5, 2), (7, 3)]
        );
        assert_eq!(profile.remaining_capacity_at(4), 0);
        assert_eq!(profile.remaining_capacity_at(6), 2);
    }

    #[test]
    fn overload_reports_first_time_point() {
        let mut profile = ResourceProfile::new(2);
        assert!(profile.insert_interval(0, 4, 2).is_ok());

        let result = profile.insert_interval(1, 6, 1);
        assert_eq!(result, Err(ProfileOverload { time: 1 }));
        // The complete interval has been applied
        assert_eq!(profile.remaining_capacity_at(5), 1);
    }

    #[test]
    fn deleting_restores_capacity() {
        let mut profile = ResourceProfile::new(4);
        let intervals = [(0, 3, 2), (1, 5, 1), (-4, 2, 1)];
        for &(begin, end, demand) in &intervals {
            assert!(profile.insert_interval(begin, end, demand).is_ok());
        }
        for &(begin, end, demand) in &intervals {
            profile.delete_interval(begin, end, demand);
        }

        assert!(profile.segments().all(|(_, _, remaining)| remaining == 4));
    }

    #[test]
    fn earliest_start_jumps_over_conflicts() {
        let mut profile = ResourceProfile::new(2);
        assert!(profile.insert_interval(2, 4, 2).is_ok());
        assert!(profile.insert_interval(5, 6, 2).is_ok());

        assert_eq!(profile.earliest_feasible_start(0, 10, 2, 1), Some(0));
        assert_eq!(profile.earliest_feasible_start(1, 10, 2, 1), Some(6));
        assert_eq!(profile.earliest_feasible_start(1, 10, 1, 1), Some(1));
        assert_eq!(profile.earliest_feasible_start(3, 10, 1, 1), Some(4));
        assert_eq!(profile.earliest_feasible_start(1, 5, 2, 1), None);
    }

    #[test]
    fn latest_start_jumps_over_conflicts() {
        let mut profile = ResourceProfile::new(2);
        assert!(profile.insert_interval(2, 4, 2).is_ok());
        assert!(profile.insert_interval(5, 6, 2).is_ok());

        assert_eq!(profile.latest_feasible_start(0, 10, 2, 1), Some(10));
        assert_eq!(profile.latest_feasible_start(0, 5, 2, 1), Some(0));
        assert_eq!(profile.latest_feasible_start(0, 4, 1, 1), Some(4));
        assert_eq!(profile.latest_feasible_start(1, 5, 2, 1), None);
    }

    #[test]
    fn zero_duration_always_fits() {
        let mut profile = ResourceProfile::new(1);
        assert!(profile.insert_interval(0, 10, 1).is_ok());

        assert!(profile.is_feasible_start(5, 0, 1));
        assert_eq!(profile.earliest_feasible_start(3, 8, 0, 1), Some(3));
        assert_eq!(profile.latest_feasible_start(3, 8, 0, 1), Some(8));
    }
}
