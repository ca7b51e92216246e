//! The one-dimensional curve abstraction shared by all candidate trajectories.

/// A scalar function of one parameter, evaluable together with its derivatives.
///
/// Longitudinal candidates map time to position along the reference line and
/// must support derivative orders 0 through 3 (position, velocity,
/// acceleration, jerk). Lateral candidates map longitudinal position to
/// lateral offset and must support orders 0 through 2.
///
/// The evaluator may sample a curve beyond `param_length()`: the stop-point
/// filter probes longitudinal candidates at the full horizon, and lateral
/// candidates are probed at whatever positions the paired longitudinal curve
/// reaches. Implementations must extrapolate rather than panic.
pub trait Curve1d {
    /// Evaluates the `order`-th derivative of the curve at `param`.
    fn evaluate(&self, order: usize, param: f64) -> f64;

    /// The length of the parameter domain over which the curve was fitted.
    fn param_length(&self) -> f64;
}

impl<T: Curve1d + ?Sized> Curve1d for &T {
    fn evaluate(&self, order: usize, param: f64) -> f64 {
        (&**self).evaluate(order, param)
    }

    fn param_length(&self) -> f64 {
        (&**self).param_length()
    }
}
