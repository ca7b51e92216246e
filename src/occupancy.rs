//! Predicted obstacle occupancy along the reference line.

use crate::util::Interval;
use smallvec::SmallVec;

/// The longitudinal intervals blocked by predicted obstacles at one time step.
///
/// A step is rarely blocked by more than a couple of obstacles, so the
/// intervals are stored inline.
pub type BlockingIntervals = SmallVec<[Interval<f64>; 2]>;

/// Supplies predicted obstacle occupancy over a time window.
///
/// Implemented by the obstacle-mapping stage of the surrounding planner.
pub trait OccupancyMap {
    /// Returns one row per time step in `[start, end)` sampled at
    /// `resolution`, each holding the longitudinal intervals occupied by
    /// predicted obstacles at that step. Rows may be empty.
    fn blocking_intervals(&self, start: f64, end: f64, resolution: f64) -> Vec<BlockingIntervals>;
}

/// An occupancy map with no predicted obstacles.
pub struct EmptyOccupancy;

impl OccupancyMap for EmptyOccupancy {
    fn blocking_intervals(&self, start: f64, end: f64, resolution: f64) -> Vec<BlockingIntervals> {
        let steps = ((end - start) / resolution).ceil() as usize;
        vec![SmallVec::new(); steps]
    }
}
