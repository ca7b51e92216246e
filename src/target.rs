//! The goal descriptor for one planning cycle.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the planner wants the vehicle to achieve this cycle.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanningTarget {
    /// The desired cruise speed in m/s.
    pub cruise_speed: f64,
    /// The position along the reference line to stop at, if any, in m.
    pub stop_point: Option<f64>,
}

impl PlanningTarget {
    /// A target that cruises at `speed` for the whole horizon.
    pub const fn cruise(speed: f64) -> Self {
        Self {
            cruise_speed: speed,
            stop_point: None,
        }
    }

    /// A target that cruises at `speed` and stops at `stop_point`.
    pub const fn stop_at(speed: f64, stop_point: f64) -> Self {
        Self {
            cruise_speed: speed,
            stop_point: Some(stop_point),
        }
    }
}
