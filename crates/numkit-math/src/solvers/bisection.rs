//! Bisection root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Step-by-step bisection of a bracketing interval.
///
/// Each [`step`](Bisector::step) halves the interval, keeping the half whose
/// endpoints still have opposite signs. Hitting an exact zero finishes the
/// search immediately.
///
/// # Example
///
/// ```rust
/// use numkit_math::solvers::Bisector;
///
/// let mut bisector = Bisector::new(|x: f64| x * x - 2.0, 1.0, 2.0).unwrap();
/// while !bisector.is_bounded(1e-8) {
///     bisector.step();
/// }
/// assert!((bisector.root() - std::f64::consts::SQRT_2).abs() <= 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct Bisector<F> {
    f: F,
    lo: f64,
    hi: f64,
    lo_positive: bool,
    done: bool,
    iterations: u32,
}

impl<F> Bisector<F>
where
    F: Fn(f64) -> f64,
{
    /// Starts bisecting `[a, b]`; the bounds may be given in either order.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::InvalidBracket`] unless `f(a)` and `f(b)` have
    /// opposite signs or one of them is exactly zero.
    pub fn new(f: F, a: f64, b: f64) -> MathResult<Self> {
        let lo = a.min(b);
        let hi = a.max(b);

        let f_lo = f(lo);
        if f_lo == 0.0 {
            return Ok(Self::finished(f, lo));
        }
        let f_hi = f(hi);
        if f_hi == 0.0 {
            return Ok(Self::finished(f, hi));
        }

        if f_lo.is_nan() || f_hi.is_nan() || f_lo.signum() == f_hi.signum() {
            return Err(MathError::InvalidBracket {
                a: lo,
                b: hi,
                fa: f_lo,
                fb: f_hi,
            });
        }

        Ok(Self {
            f,
            lo,
            hi,
            lo_positive: f_lo > 0.0,
            done: false,
            iterations: 0,
        })
    }

    fn finished(f: F, root: f64) -> Self {
        Self {
            f,
            lo: root,
            hi: root,
            lo_positive: false,
            done: true,
            iterations: 0,
        }
    }

    /// Halves the interval. Does nothing once an exact root was found.
    pub fn step(&mut self) {
        if self.done {
            return;
        }

        let mid = self.root();
        let value = (self.f)(mid);
        self.iterations += 1;

        if value == 0.0 {
            self.lo = mid;
            self.hi = mid;
            self.done = true;
        } else if (value > 0.0) == self.lo_positive {
            self.lo = mid;
        } else {
            self.hi = mid;
        }
    }

    /// Returns true once an exact root was found.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Current root estimate: the midpoint of the interval.
    pub fn root(&self) -> f64 {
        if self.done {
            self.lo
        } else {
            (self.lo + self.hi) / 2.0
        }
    }

    /// Returns true once the interval spans adjacent floats, so halving it
    /// can no longer move either end.
    pub fn is_exhausted(&self) -> bool {
        let mid = self.root();
        !self.done && (mid <= self.lo || mid >= self.hi)
    }

    /// Returns true if the estimate is within `e` of every point in the interval.
    pub fn is_bounded(&self, e: f64) -> bool {
        (self.hi - self.lo) / 2.0 <= e
    }

    /// Current bracketing interval.
    pub fn interval(&self) -> (f64, f64) {
        (self.lo, self.hi)
    }

    /// Number of steps taken.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Function value at the current estimate.
    pub fn residual(&self) -> f64 {
        (self.f)(self.root())
    }
}

/// Bisection root-finding algorithm.
///
/// Halves the bracket until its half-width drops below `config.tolerance`.
///
/// Requires: `f(a) * f(b) < 0` (opposite signs at endpoints), or an exact zero
/// at one endpoint.
///
/// # Example
///
/// ```rust
/// use numkit_math::solvers::{bisection, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
///
/// let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut bisector = Bisector::new(f, a, b)?;

    while !bisector.is_done() && !bisector.is_bounded(config.tolerance) {
        if bisector.iterations() >= config.max_iterations {
            return Err(MathError::convergence_failed(
                config.max_iterations,
                bisector.residual().abs(),
            ));
        }
        bisector.step();
    }

    Ok(SolverResult {
        root: bisector.root(),
        iterations: bisector.iterations(),
        residual: bisector.residual(),
    })
}

/// Runs `steps` halvings and returns the estimate.
///
/// Stops early on an exact root, or once the interval can no longer shrink.
pub fn bisection_steps<F>(f: F, a: f64, b: f64, steps: u32) -> MathResult<f64>
where
    F: Fn(f64) -> f64,
{
    let mut bisector = Bisector::new(f, a, b)?;
    for _ in 0..steps {
        if bisector.is_done() || bisector.is_exhausted() {
            break;
        }
        bisector.step();
    }
    Ok(bisector.root())
}

/// Runs enough halvings that the final interval is strictly narrower than
/// `precision`, or as narrow as `f64` allows.
///
/// # Errors
///
/// [`MathError::InvalidInput`] if `precision` is not positive and finite, plus
/// the errors of [`Bisector::new`].
pub fn bisection_precision<F>(f: F, a: f64, b: f64, precision: f64) -> MathResult<f64>
where
    F: Fn(f64) -> f64,
{
    if precision <= 0.0 || !precision.is_finite() {
        return Err(MathError::invalid_input(format!(
            "precision must be positive and finite, got {precision}"
        )));
    }
    bisection_steps(f, a, b, steps_for_precision(a, b, precision))
}

/// Smallest `n` with `|b - a| / 2^n < precision`.
///
/// Saturates for ratios beyond `f64` range; [`bisection_steps`] stops once the
/// interval is exhausted.
fn steps_for_precision(a: f64, b: f64, precision: f64) -> u32 {
    let ratio = (b - a).abs() / precision;
    if ratio < 1.0 {
        0
    } else {
        (ratio.log2().floor() as u32).saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;

        let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
        assert!(result.residual.abs() < 1e-9);
    }

    #[test]
    fn test_reversed_bracket() {
        let f = |x: f64| x * x - 2.0;

        // Reversed bracket should still work
        let result = bisection(f, 2.0, 1.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;

        // Both endpoints have same sign
        let result = bisection(f, 2.0, 3.0, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x - 1.0;

        let result = bisection(f, 0.0, 1.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_exact_root_at_midpoint() {
        let f = |x: f64| x - 0.5;

        let mut bisector = Bisector::new(f, 0.0, 1.0).unwrap();
        bisector.step();

        assert!(bisector.is_done());
        assert_eq!(bisector.root(), 0.5);
        assert_eq!(bisector.interval(), (0.5, 0.5));

        // Further steps are no-ops
        bisector.step();
        assert_eq!(bisector.iterations(), 1);
    }

    #[test]
    fn test_negative_root() {
        let f = |x: f64| x + 1.0;

        let result = bisection(f, -2.0, 0.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, -1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_decreasing_function() {
        let f = |x: f64| 3.0 - x;

        let root = bisection_precision(f, 0.0, 10.0, 1e-9).unwrap();

        assert!((root - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_steps() {
        let f = |x: f64| x - 0.3;

        // [0, 1] -> [0, 0.5] -> [0.25, 0.5], estimate 0.375
        let root = bisection_steps(f, 0.0, 1.0, 2).unwrap();
        assert_eq!(root, 0.375);

        assert_eq!(bisection_steps(f, 0.0, 1.0, 0).unwrap(), 0.5);
    }

    #[test]
    fn test_steps_for_precision() {
        // Exact powers of two need one more halving to be strictly narrower
        assert_eq!(steps_for_precision(0.0, 1.0, 0.25), 3);
        assert_eq!(steps_for_precision(0.0, 1.0, 1.0), 1);
        assert_eq!(steps_for_precision(0.0, 1.0, 0.3), 2);
        assert_eq!(steps_for_precision(0.0, 1.0, 2.0), 0);
        assert_eq!(steps_for_precision(4.0, 0.0, 1.0), 3);
    }

    #[test]
    fn test_subnormal_precision_stops_at_adjacent_floats() {
        let f = |x: f64| 3.0 * x - 1.0;

        assert_eq!(steps_for_precision(-1.0, 1.0, 5e-324), u32::MAX);

        let root = bisection_precision(f, -1.0, 1.0, 5e-324).unwrap();
        assert!((root - 1.0 / 3.0).abs() <= f64::EPSILON);
    }

    #[test]
    fn test_exhausted_interval() {
        let f = |x: f64| x - 0.1;

        let mut bisector = Bisector::new(f, 0.0, 1.0).unwrap();
        while !bisector.is_done() && !bisector.is_exhausted() {
            assert!(bisector.iterations() < 100);
            bisector.step();
        }

        let (lo, hi) = bisector.interval();
        assert!(lo <= 0.1 && 0.1 <= hi);
        if !bisector.is_done() {
            assert_eq!(f64::from_bits(lo.to_bits() + 1), hi);
        }
    }

    #[test]
    fn test_invalid_precision() {
        let f = |x: f64| x;
        assert!(bisection_precision(f, -1.0, 1.0, 0.0).is_err());
        assert!(bisection_precision(f, -1.0, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_iteration_limit() {
        let f = |x: f64| x * x - 2.0;
        let config = SolverConfig::new(1e-12, 5);

        let result = bisection(f, 1.0, 2.0, &config);

        assert!(matches!(result, Err(MathError::ConvergenceFailed { iterations: 5, .. })));
    }
}
