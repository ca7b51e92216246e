pub use config::EvaluatorConfig;
pub use cost::{
    collision_cost, evaluate_pair, lat_comfort_cost, lat_offset_cost, lon_comfort_cost,
    objective_cost, ComponentCosts, PairCost,
};
pub use curve::Curve1d;
#[cfg(feature = "debug")]
pub use debug::take_tuning_frame;
pub use guide::{guide_velocity, PiecewiseAccelerationProfile};
pub use occupancy::{BlockingIntervals, EmptyOccupancy, OccupancyMap};
pub use ranker::{FeasibilityCheck, TrajectoryRanker};
pub use target::PlanningTarget;
pub use util::Interval;

mod config;
mod cost;
mod curve;
mod debug;
mod guide;
mod occupancy;
mod ranker;
mod target;
mod util;
