//! Configuration constants for trajectory evaluation.

use once_cell::sync::Lazy;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static DEFAULT: Lazy<EvaluatorConfig> = Lazy::new(EvaluatorConfig::default);

/// The read-only constants steering one evaluation cycle.
///
/// All values are supplied by the embedding planner. The defaults are
/// plausible for a passenger vehicle and are mainly useful in tests.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvaluatorConfig {
    /// The planning horizon in s.
    pub time_horizon: f64,
    /// The sampling resolution along the time axis in s.
    pub time_resolution: f64,
    /// The sampling resolution along the longitudinal axis in m.
    pub space_resolution: f64,
    /// How far ahead lateral behaviour is judged, in m.
    pub decision_horizon: f64,
    /// The bound used to normalise lateral offsets, in m.
    pub lat_offset_bound: f64,
    /// The bound used to normalise longitudinal jerk, in m/s^3.
    pub lon_jerk_bound: f64,
    /// The hardest available longitudinal deceleration, a negative number in m/s^2.
    pub lon_deceleration_bound: f64,
    /// The fraction of the deceleration bound considered comfortable.
    pub comfort_brake_factor: f64,
    /// Margin kept behind an obstacle when yielding, in m.
    pub yield_buffer: f64,
    /// Margin kept ahead of an obstacle when overtaking, in m.
    pub overtake_buffer: f64,
    /// Standard deviation of the Gaussian collision kernel, in m.
    pub collision_std: f64,
    /// Weight of the objective term in the aggregate cost.
    pub weight_objective: f64,
    /// Weight of the longitudinal comfort term in the aggregate cost.
    pub weight_lon_comfort: f64,
    /// Weight of the collision term in the aggregate cost.
    pub weight_collision: f64,
    /// Weight of the lateral offset term in the aggregate cost.
    pub weight_lat_offset: f64,
    /// Weight of the lateral comfort term in the aggregate cost.
    pub weight_lat_comfort: f64,
    /// Weight of guide-velocity tracking within the objective term.
    pub weight_target_speed: f64,
    /// Weight of longitudinal progress within the objective term.
    pub weight_dist_travelled: f64,
    /// Weight applied to offsets on the same side as the starting offset.
    pub weight_same_side: f64,
    /// Weight applied to offsets on the opposite side of the starting offset.
    pub weight_opposite_side: f64,
    /// Guard added to ratio denominators.
    pub epsilon: f64,
    /// Record per-term costs alongside the aggregate.
    pub track_components: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            time_horizon: 8.0,
            time_resolution: 0.1,
            space_resolution: 1.0,
            decision_horizon: 200.0,
            lat_offset_bound: 3.0,
            lon_jerk_bound: 4.0,
            lon_deceleration_bound: -4.5,
            comfort_brake_factor: 0.5,
            yield_buffer: 1.0,
            overtake_buffer: 5.0,
            collision_std: 0.5,
            weight_objective: 10.0,
            weight_lon_comfort: 1.0,
            weight_collision: 5.0,
            weight_lat_offset: 2.0,
            weight_lat_comfort: 10.0,
            weight_target_speed: 1.0,
            weight_dist_travelled: 10.0,
            weight_same_side: 1.0,
            weight_opposite_side: 10.0,
            epsilon: 1e-6,
            track_components: false,
        }
    }
}

impl EvaluatorConfig {
    /// A shared instance of the default configuration.
    pub fn shared_default() -> &'static Self {
        &DEFAULT
    }
}
