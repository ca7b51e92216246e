//! Synthesis of the longitudinal guide velocity.
//!
//! The guide is an idealized speed profile, either cruising at the target
//! speed or braking to a requested stop point, sampled over the planning
//! horizon. It is consumed only by the objective cost term.

use crate::config::EvaluatorConfig;
use crate::curve::Curve1d;
use crate::target::PlanningTarget;

/// One constant-acceleration piece of a profile.
#[derive(Clone, Copy, Debug)]
struct Segment {
    /// Time at which the segment starts, from the profile start, in s.
    start_t: f64,
    /// Time at which the segment ends, from the profile start, in s.
    end_t: f64,
    /// Position at the start of the segment in m.
    start_s: f64,
    /// Velocity at the start of the segment in m/s.
    start_v: f64,
    /// The segment's constant acceleration in m/s^2.
    acc: f64,
}

/// A longitudinal motion profile assembled from constant-acceleration
/// segments appended end to end.
///
/// The profile is a [Curve1d] over time: order 0 yields position, 1 velocity,
/// 2 acceleration and 3 jerk (always zero). Queries past the last segment
/// extrapolate it.
#[derive(Clone, Debug)]
pub struct PiecewiseAccelerationProfile {
    start_s: f64,
    start_v: f64,
    segments: Vec<Segment>,
}

impl PiecewiseAccelerationProfile {
    /// Creates an empty profile starting at position `start_s` with velocity
    /// `start_v`.
    pub fn new(start_s: f64, start_v: f64) -> Self {
        Self {
            start_s,
            start_v,
            segments: vec![],
        }
    }

    /// Appends a segment with the given constant acceleration and duration.
    pub fn append(&mut self, acc: f64, duration: f64) {
        let (start_t, start_s, start_v) = match self.segments.last() {
            Some(seg) => {
                let dt = seg.end_t - seg.start_t;
                (
                    seg.end_t,
                    seg.start_s + seg.start_v * dt + 0.5 * seg.acc * dt * dt,
                    seg.start_v + seg.acc * dt,
                )
            }
            None => (0.0, self.start_s, self.start_v),
        };
        self.segments.push(Segment {
            start_t,
            end_t: start_t + duration,
            start_s,
            start_v,
            acc,
        });
    }

    /// The segment containing `t`, or the last segment for `t` past the end.
    fn segment_at(&self, t: f64) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|seg| t < seg.end_t)
            .or_else(|| self.segments.last())
    }
}

impl Curve1d for PiecewiseAccelerationProfile {
    fn evaluate(&self, order: usize, param: f64) -> f64 {
        let seg = match self.segment_at(param) {
            Some(seg) => seg,
            None => {
                // An empty profile holds its start state.
                return match order {
                    0 => self.start_s,
                    1 => self.start_v,
                    _ => 0.0,
                };
            }
        };
        let dt = param - seg.start_t;
        match order {
            0 => seg.start_s + seg.start_v * dt + 0.5 * seg.acc * dt * dt,
            1 => seg.start_v + seg.acc * dt,
            2 => seg.acc,
            _ => 0.0,
        }
    }

    fn param_length(&self) -> f64 {
        self.segments.last().map(|seg| seg.end_t).unwrap_or(0.0)
    }
}

/// Builds the guide velocity: one sample per time step over `[0, horizon)`.
///
/// Without a stop point the guide cruises at the target speed for the whole
/// horizon. With a stop point it keeps cruising and brakes at the comfortable
/// deceleration when the stop is far enough away to allow that, and otherwise
/// brakes immediately at whatever constant deceleration reaches the stop
/// position exactly. Only the initial position of `init_s` participates; the
/// guide always starts from the cruise speed.
pub fn guide_velocity(init_s: [f64; 3], target: &PlanningTarget, cfg: &EvaluatorConfig) -> Vec<f64> {
    let cruise_v = target.cruise_speed;
    let mut profile = PiecewiseAccelerationProfile::new(init_s[0], cruise_v);

    match target.stop_point {
        None => profile.append(0.0, cfg.time_horizon),
        Some(stop_s) => {
            let comfort_a = cfg.lon_deceleration_bound * cfg.comfort_brake_factor;
            let dist = stop_s - init_s[0];
            let mut stop_a = cfg.lon_deceleration_bound;
            if dist > cfg.epsilon {
                stop_a = -cruise_v * cruise_v * 0.5 / dist;
            }
            if stop_a > comfort_a {
                // The stop is far enough away to brake at the comfortable
                // rate; cruise until the braking segment ends exactly there.
                let stop_t = cruise_v / -comfort_a;
                let stop_dist = 0.5 * cruise_v * stop_t;
                let cruise_t = (dist - stop_dist) / cruise_v;
                profile.append(0.0, cruise_t);
                profile.append(comfort_a, stop_t);
            } else {
                let stop_t = cruise_v / -stop_a;
                profile.append(stop_a, stop_t);
            }
            let len = profile.param_length();
            if len < cfg.time_horizon {
                profile.append(0.0, cfg.time_horizon - len);
            }
        }
    }

    (0..)
        .map(|i| i as f64 * cfg.time_resolution)
        .take_while(|t| *t < cfg.time_horizon)
        .map(|t| profile.evaluate(1, t).max(0.0))
        .collect()
}
