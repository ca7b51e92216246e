//! The cost terms used to score a candidate trajectory pair.
//!
//! Every term is a pure function of the candidate curve(s) and read-only
//! per-cycle context, returning a finite non-negative scalar. Several terms
//! aggregate normalized samples as sum-of-squares over sum-of-absolutes,
//! which penalizes occasional large spikes more than many small ones while
//! staying bounded by the largest sample.

use crate::config::EvaluatorConfig;
use crate::curve::Curve1d;
use crate::occupancy::BlockingIntervals;
use arrayvec::ArrayVec;

/// The per-term costs recorded for offline weight tuning, in order:
/// objective, longitudinal comfort, longitudinal collision, lateral offset.
///
/// Lateral comfort contributes to the aggregate but is not recorded here;
/// consumers tuning weights against these records must account for the
/// missing term.
pub type ComponentCosts = ArrayVec<f64, 4>;

/// The outcome of scoring one candidate pair.
#[derive(Clone, Debug)]
pub struct PairCost {
    /// The weighted aggregate of all five cost terms.
    pub total: f64,
    /// The recorded per-term costs, present in component-tracking mode.
    pub components: Option<ComponentCosts>,
}

/// The time steps spanning the planning horizon.
fn time_steps(cfg: &EvaluatorConfig) -> impl Iterator<Item = f64> + '_ {
    (0..)
        .map(|i| i as f64 * cfg.time_resolution)
        .take_while(|t| *t < cfg.time_horizon)
}

/// Scores a candidate pair against the guide velocity and the blocking
/// intervals, recording per-term costs when component tracking is enabled.
pub fn evaluate_pair(
    lon: &dyn Curve1d,
    lat: &dyn Curve1d,
    guide_velocity: &[f64],
    blocking: &[BlockingIntervals],
    cfg: &EvaluatorConfig,
) -> PairCost {
    let objective = objective_cost(lon, guide_velocity, cfg);
    let lon_comfort = lon_comfort_cost(lon, cfg);
    let collision = collision_cost(lon, blocking, cfg);

    // The candidate's own longitudinal reach bounds how far along the path
    // lateral behaviour is worth judging.
    let horizon = cfg
        .decision_horizon
        .min(lon.evaluate(0, lon.param_length()));
    let s_samples = (0..)
        .map(|i| i as f64 * cfg.space_resolution)
        .take_while(|s| *s < horizon)
        .collect::<Vec<_>>();
    let lat_offset = lat_offset_cost(lat, &s_samples, cfg);

    let lat_comfort = lat_comfort_cost(lon, lat, cfg);

    let total = objective * cfg.weight_objective
        + lon_comfort * cfg.weight_lon_comfort
        + collision * cfg.weight_collision
        + lat_offset * cfg.weight_lat_offset
        + lat_comfort * cfg.weight_lat_comfort;

    let components = cfg
        .track_components
        .then(|| [objective, lon_comfort, collision, lat_offset].into_iter().collect());

    PairCost { total, components }
}

/// Cost of missing the objective: a t²-weighted average deviation from the
/// guide velocity, blended with a term rewarding longitudinal progress.
pub fn objective_cost(lon: &dyn Curve1d, guide_velocity: &[f64], cfg: &EvaluatorConfig) -> f64 {
    let t_max = lon.param_length();
    let dist = lon.evaluate(0, t_max) - lon.evaluate(0, 0.0);

    let mut deviation_sum = 0.0;
    let mut weight_sum = 0.0;
    for (i, ref_v) in guide_velocity.iter().enumerate() {
        let t = i as f64 * cfg.time_resolution;
        let deviation = ref_v - lon.evaluate(1, t);
        deviation_sum += t * t * deviation.abs();
        weight_sum += t * t;
    }
    let speed_cost = deviation_sum / (weight_sum + cfg.epsilon);
    let progress_cost = 1.0 / (1.0 + dist);

    (speed_cost * cfg.weight_target_speed + progress_cost * cfg.weight_dist_travelled)
        / (cfg.weight_target_speed + cfg.weight_dist_travelled)
}

/// Cost of longitudinal jerk over the horizon.
pub fn lon_comfort_cost(lon: &dyn Curve1d, cfg: &EvaluatorConfig) -> f64 {
    let mut sqr_sum = 0.0;
    let mut abs_sum = 0.0;
    for t in time_steps(cfg) {
        let cost = lon.evaluate(3, t) / cfg.lon_jerk_bound;
        sqr_sum += cost * cost;
        abs_sum += cost.abs();
    }
    sqr_sum / (abs_sum + cfg.epsilon)
}

/// Cost of passing close to predicted obstacle occupancy.
///
/// Each blocking interval is expanded by the yield buffer below and the
/// overtake buffer above; the candidate's distance to the expanded interval
/// (zero inside it) feeds a Gaussian kernel, so threading through or near an
/// occupancy window scores the full peak while clearly leading or trailing
/// it decays smoothly towards zero.
pub fn collision_cost(
    lon: &dyn Curve1d,
    blocking: &[BlockingIntervals],
    cfg: &EvaluatorConfig,
) -> f64 {
    let mut sqr_sum = 0.0;
    let mut abs_sum = 0.0;
    for (i, intervals) in blocking.iter().enumerate() {
        if intervals.is_empty() {
            continue;
        }
        let t = i as f64 * cfg.time_resolution;
        let s = lon.evaluate(0, t);
        for interval in intervals {
            let buffered = interval.expand(cfg.yield_buffer, cfg.overtake_buffer);
            let dist = buffered.distance(s).max(0.0);
            let cost = (-dist * dist / (2.0 * cfg.collision_std * cfg.collision_std)).exp();
            sqr_sum += cost * cost;
            abs_sum += cost;
        }
    }
    sqr_sum / (abs_sum + cfg.epsilon)
}

/// Cost of lateral offset from the reference line at the given longitudinal
/// sample positions. Samples on the opposite side of the starting offset
/// take the heavier opposite-side weight, discouraging oscillation around
/// the reference line.
pub fn lat_offset_cost(lat: &dyn Curve1d, s_samples: &[f64], cfg: &EvaluatorConfig) -> f64 {
    let start_offset = lat.evaluate(0, 0.0);
    let mut sqr_sum = 0.0;
    let mut abs_sum = 0.0;
    for s in s_samples {
        let offset = lat.evaluate(0, *s);
        let cost = offset / cfg.lat_offset_bound;
        let weight = if offset * start_offset < 0.0 {
            cfg.weight_opposite_side
        } else {
            cfg.weight_same_side
        };
        sqr_sum += weight * cost * cost;
        abs_sum += weight * cost.abs();
    }
    sqr_sum / (abs_sum + cfg.epsilon)
}

/// Worst-case lateral acceleration induced by tracking the lateral offset at
/// the longitudinal speed of the paired candidate. A single sharp peak is
/// the safety-relevant quantity, so the maximum is taken rather than an
/// average.
pub fn lat_comfort_cost(lon: &dyn Curve1d, lat: &dyn Curve1d, cfg: &EvaluatorConfig) -> f64 {
    let mut max_cost: f64 = 0.0;
    for t in time_steps(cfg) {
        let s = lon.evaluate(0, t);
        let s_dot = lon.evaluate(1, t);
        let s_ddot = lon.evaluate(2, t);
        let cost = lat.evaluate(2, s) * s_dot * s_dot + lat.evaluate(1, s) * s_ddot;
        max_cost = max_cost.max(cost.abs());
    }
    max_cost
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::guide::{guide_velocity, PiecewiseAccelerationProfile};
    use crate::target::PlanningTarget;
    use crate::util::Interval;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};
    use smallvec::smallvec;

    /// A polynomial curve given by its coefficients from the constant term up.
    struct Poly {
        coeffs: Vec<f64>,
        length: f64,
    }

    impl Poly {
        fn new(coeffs: &[f64], length: f64) -> Self {
            Self {
                coeffs: coeffs.to_vec(),
                length,
            }
        }
    }

    impl Curve1d for Poly {
        fn evaluate(&self, order: usize, param: f64) -> f64 {
            self.coeffs
                .iter()
                .enumerate()
                .skip(order)
                .map(|(i, c)| {
                    let falling: f64 = (i - order + 1..=i).map(|j| j as f64).product();
                    c * falling * param.powi((i - order) as i32)
                })
                .sum()
        }

        fn param_length(&self) -> f64 {
            self.length
        }
    }

    fn no_blocking(cfg: &EvaluatorConfig) -> Vec<BlockingIntervals> {
        let steps = (cfg.time_horizon / cfg.time_resolution).ceil() as usize;
        vec![BlockingIntervals::new(); steps]
    }

    fn cruise_profile(speed: f64, cfg: &EvaluatorConfig) -> PiecewiseAccelerationProfile {
        let mut profile = PiecewiseAccelerationProfile::new(0.0, speed);
        profile.append(0.0, cfg.time_horizon);
        profile
    }

    #[test]
    fn zero_jerk_candidate_has_no_comfort_cost() {
        let cfg = EvaluatorConfig::default();
        let lon = cruise_profile(10.0, &cfg);
        assert_eq!(lon_comfort_cost(&lon, &cfg), 0.0);
    }

    #[test]
    fn constant_jerk_candidate_scores_its_normalized_jerk() {
        let cfg = EvaluatorConfig::default();
        // s(t) = 10 t + 0.5 t^3 has constant jerk 3, i.e. 0.75 of the bound.
        let lon = Poly::new(&[0.0, 10.0, 0.0, 0.5], cfg.time_horizon);
        assert_approx_eq!(lon_comfort_cost(&lon, &cfg), 0.75, 1e-6);
    }

    #[test]
    fn matched_cruise_objective_is_progress_only() {
        let cfg = EvaluatorConfig::default();
        let target = PlanningTarget::cruise(10.0);
        let guide = guide_velocity([0.0, 10.0, 0.0], &target, &cfg);
        let lon = cruise_profile(10.0, &cfg);

        // The speed term vanishes; 80 m of progress leaves 1/81 of the
        // distance term.
        let expected = (1.0 / 81.0) * cfg.weight_dist_travelled
            / (cfg.weight_target_speed + cfg.weight_dist_travelled);
        assert_approx_eq!(objective_cost(&lon, &guide, &cfg), expected, 1e-9);
    }

    #[test]
    fn slower_candidate_scores_worse_objective() {
        let cfg = EvaluatorConfig::default();
        let target = PlanningTarget::cruise(10.0);
        let guide = guide_velocity([0.0, 10.0, 0.0], &target, &cfg);

        let matched = objective_cost(&cruise_profile(10.0, &cfg), &guide, &cfg);
        let slower = objective_cost(&cruise_profile(6.0, &cfg), &guide, &cfg);
        assert!(slower > matched);
    }

    #[test]
    fn collision_cost_peaks_inside_blocked_interval() {
        let mut cfg = EvaluatorConfig::default();
        cfg.yield_buffer = 0.0;
        cfg.overtake_buffer = 0.0;
        cfg.collision_std = 2.0;
        let steps = (cfg.time_horizon / cfg.time_resolution).ceil() as usize;
        let blocking: Vec<BlockingIntervals> = vec![smallvec![Interval::new(20.0, 25.0)]; steps];

        let inside = collision_cost(&Poly::new(&[22.0], cfg.time_horizon), &blocking, &cfg);
        let clear = collision_cost(&Poly::new(&[50.0], cfg.time_horizon), &blocking, &cfg);

        // Zero distance at every step scores the full kernel peak.
        assert_approx_eq!(inside, 1.0, 1e-6);
        assert!(clear < 1e-12);
    }

    #[test]
    fn collision_cost_decreases_with_separation() {
        let mut cfg = EvaluatorConfig::default();
        cfg.yield_buffer = 0.0;
        cfg.overtake_buffer = 0.0;
        cfg.collision_std = 2.0;
        let steps = (cfg.time_horizon / cfg.time_resolution).ceil() as usize;
        let blocking: Vec<BlockingIntervals> = vec![smallvec![Interval::new(20.0, 25.0)]; steps];

        let costs = [28.0, 35.0, 50.0].map(|pos| {
            collision_cost(&Poly::new(&[pos], cfg.time_horizon), &blocking, &cfg)
        });
        assert!(costs[0] > costs[1]);
        assert!(costs[1] > costs[2]);
    }

    #[test]
    fn buffers_extend_the_danger_zone() {
        let mut cfg = EvaluatorConfig::default();
        cfg.collision_std = 2.0;
        let steps = (cfg.time_horizon / cfg.time_resolution).ceil() as usize;
        let blocking: Vec<BlockingIntervals> = vec![smallvec![Interval::new(20.0, 25.0)]; steps];

        // 19.5 m sits inside [20 - yield, 25 + overtake]; 31 m trails the
        // buffered upper edge by 1 m.
        let in_buffer = collision_cost(&Poly::new(&[19.5], cfg.time_horizon), &blocking, &cfg);
        let past_buffer = collision_cost(&Poly::new(&[31.0], cfg.time_horizon), &blocking, &cfg);
        assert_approx_eq!(in_buffer, 1.0, 1e-6);
        assert_approx_eq!(past_buffer, (-1.0f64 / 8.0).exp(), 1e-4);
    }

    #[test]
    fn opposite_side_offsets_take_the_heavier_weight() {
        struct SignFlip;

        impl Curve1d for SignFlip {
            fn evaluate(&self, order: usize, param: f64) -> f64 {
                match order {
                    0 if param < 5.0 => 1.0,
                    0 => -2.0,
                    _ => 0.0,
                }
            }

            fn param_length(&self) -> f64 {
                10.0
            }
        }

        let cfg = EvaluatorConfig::default();
        let samples: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let cost = lat_offset_cost(&SignFlip, &samples, &cfg);

        // Five samples of +1 m take the same-side weight, five of -2 m the
        // opposite-side weight; bound 3 m, weights 1 and 10.
        let expected = (5.0 * (1.0 / 9.0) + 50.0 * (4.0 / 9.0))
            / (5.0 * (1.0 / 3.0) + 50.0 * (2.0 / 3.0));
        assert_approx_eq!(cost, expected, 1e-6);
    }

    #[test]
    fn centred_lateral_curve_is_free() {
        let cfg = EvaluatorConfig::default();
        let samples: Vec<f64> = (0..50).map(|i| i as f64).collect();
        assert_eq!(lat_offset_cost(&Poly::new(&[0.0], 50.0), &samples, &cfg), 0.0);
    }

    #[test]
    fn lat_comfort_takes_the_worst_sample() {
        let cfg = EvaluatorConfig::default();
        let lon = cruise_profile(10.0, &cfg);
        // l(s) = 0.01 s^2 at a constant 10 m/s: cost = l'' v^2 = 2 everywhere.
        let lat = Poly::new(&[0.0, 0.0, 0.01], 100.0);
        assert_approx_eq!(lat_comfort_cost(&lon, &lat, &cfg), 2.0, 1e-9);
    }

    #[test]
    fn random_pairs_stay_finite_and_non_negative() {
        let mut cfg = EvaluatorConfig::default();
        cfg.track_components = true;
        let mut rng = rand::rngs::StdRng::from_seed(*b"cost terms stay finite forever..");
        let target = PlanningTarget::cruise(10.0);
        let guide = guide_velocity([0.0, 10.0, 0.0], &target, &cfg);
        let blocking = no_blocking(&cfg);

        for _ in 0..20 {
            let mut lon = PiecewiseAccelerationProfile::new(0.0, rng.gen_range(5.0..15.0));
            lon.append(rng.gen_range(-1.0..1.0), 0.5 * cfg.time_horizon);
            lon.append(rng.gen_range(-1.0..1.0), 0.5 * cfg.time_horizon);
            let lat = Poly::new(
                &[
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-0.05..0.05),
                    rng.gen_range(-0.002..0.002),
                ],
                cfg.decision_horizon,
            );

            let cost = evaluate_pair(&lon, &lat, &guide, &blocking, &cfg);
            assert!(cost.total.is_finite() && cost.total >= 0.0);
            let components = cost.components.expect("tracking is enabled");
            assert_eq!(components.len(), 4);
            assert!(components.iter().all(|c| c.is_finite() && *c >= 0.0));
        }
    }
}
