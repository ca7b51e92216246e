//! Filtering, scoring and best-first ordering of candidate pairs.

use crate::config::EvaluatorConfig;
use crate::cost::{evaluate_pair, ComponentCosts, PairCost};
use crate::curve::Curve1d;
use crate::debug::record_pair_cost;
use crate::guide::guide_velocity;
use crate::occupancy::OccupancyMap;
use crate::target::PlanningTarget;
use itertools::iproduct;
use log::debug;
use ordered_float::OrderedFloat;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::rc::Rc;

/// Decides whether a longitudinal candidate is kinematically drivable.
///
/// Implemented by the surrounding planner's constraint checker; any
/// `Fn(&dyn Curve1d) -> bool` closure works too.
pub trait FeasibilityCheck {
    /// Returns true if the curve respects the vehicle's velocity,
    /// acceleration and jerk limits.
    fn is_feasible(&self, lon: &dyn Curve1d) -> bool;
}

impl<F: Fn(&dyn Curve1d) -> bool> FeasibilityCheck for F {
    fn is_feasible(&self, lon: &dyn Curve1d) -> bool {
        self(lon)
    }
}

/// A scored pair held in the ranked collection.
struct RankedPair {
    cost: PairCost,
    lon: Rc<dyn Curve1d>,
    lat: Rc<dyn Curve1d>,
}

impl PartialEq for RankedPair {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.cost.total) == OrderedFloat(other.cost.total)
    }
}

impl Eq for RankedPair {}

impl PartialOrd for RankedPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedPair {
    fn cmp(&self, other: &Self) -> Ordering {
        OrderedFloat(self.cost.total).cmp(&OrderedFloat(other.cost.total))
    }
}

/// Ranks every drivable candidate pair by aggregate cost, cheapest first.
///
/// Construction performs all filtering and scoring; afterwards the
/// collection is only drained. Only longitudinal candidates are filtered:
/// lateral candidates pair unconditionally with every surviving longitudinal
/// candidate.
pub struct TrajectoryRanker {
    /// The heap is a max-heap, so entries are reversed to pop the cheapest
    /// pair first.
    queue: BinaryHeap<Reverse<RankedPair>>,
}

impl TrajectoryRanker {
    /// Filters the longitudinal candidates and scores the cross-product of
    /// the surviving set with every lateral candidate.
    ///
    /// # Parameters
    /// * `init_s` - The initial longitudinal position, velocity and acceleration.
    /// * `target` - The goal of this planning cycle.
    /// * `lon_candidates` - The sampled longitudinal candidate curves.
    /// * `lat_candidates` - The sampled lateral candidate curves.
    /// * `occupancy` - Predicted obstacle occupancy along the path.
    /// * `check` - The external kinematic feasibility predicate.
    pub fn new(
        init_s: [f64; 3],
        target: &PlanningTarget,
        lon_candidates: &[Rc<dyn Curve1d>],
        lat_candidates: &[Rc<dyn Curve1d>],
        occupancy: &dyn OccupancyMap,
        check: &dyn FeasibilityCheck,
        cfg: &EvaluatorConfig,
    ) -> Self {
        let blocking = occupancy.blocking_intervals(0.0, cfg.time_horizon, cfg.time_resolution);
        let guide = guide_velocity(init_s, target, cfg);

        // A candidate whose end-of-horizon position passes the stop point
        // would overshoot the stop.
        let stop_point = target.stop_point.unwrap_or(f64::MAX);
        let drivable = lon_candidates
            .iter()
            .filter(|lon| lon.evaluate(0, cfg.time_horizon) <= stop_point)
            .filter(|lon| check.is_feasible(lon.as_ref()))
            .collect::<Vec<_>>();

        let mut queue = BinaryHeap::new();
        for (lon, lat) in iproduct!(&drivable, lat_candidates) {
            let cost = evaluate_pair(lon.as_ref(), lat.as_ref(), &guide, &blocking, cfg);
            record_pair_cost(&cost);
            queue.push(Reverse(RankedPair {
                cost,
                lon: Rc::clone(*lon),
                lat: Rc::clone(lat),
            }));
        }
        debug!(
            "ranked {} of {} candidate pairs",
            queue.len(),
            lon_candidates.len() * lat_candidates.len()
        );

        Self { queue }
    }

    /// Whether any candidate pairs remain.
    pub fn has_more_pairs(&self) -> bool {
        !self.queue.is_empty()
    }

    /// The number of candidate pairs remaining.
    pub fn num_pairs(&self) -> usize {
        self.queue.len()
    }

    /// Removes and returns the cheapest remaining pair.
    ///
    /// Panics if no pairs remain.
    pub fn pop_best_pair(&mut self) -> (Rc<dyn Curve1d>, Rc<dyn Curve1d>) {
        let Reverse(top) = self.queue.pop().expect("no candidate pairs remain");
        (top.lon, top.lat)
    }

    /// The aggregate cost of the cheapest remaining pair.
    ///
    /// Panics if no pairs remain.
    pub fn best_cost(&self) -> f64 {
        let Reverse(top) = self.queue.peek().expect("no candidate pairs remain");
        top.cost.total
    }

    /// The recorded per-term costs of the cheapest remaining pair.
    ///
    /// Panics if no pairs remain or if component tracking is disabled.
    pub fn best_components(&self) -> &ComponentCosts {
        let Reverse(top) = self.queue.peek().expect("no candidate pairs remain");
        top.cost
            .components
            .as_ref()
            .expect("component tracking is disabled")
    }
}
