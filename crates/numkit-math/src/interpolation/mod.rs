//! Piecewise cubic interpolation.
//!
//! A [`CubicSpline`] is built one knot at a time. Every knot carries a target
//! slope chosen by a [`SlopeStyle`], and every segment between two knots is the
//! [`CubicPolynomial`] matching both endpoint values and both endpoint slopes
//! (a cubic Hermite fit). The result is continuous in value and first
//! derivative.
//!
//! # Slope Styles
//!
//! | Style | Interior slope | Notes |
//! |-------|----------------|-------|
//! | Standard | mean of the two adjacent secants | default |
//! | MidArc | secant through the two neighbors | ignores the knot's own y |
//! | Monotone | limited to preserve monotonicity | not implemented, returns `Unsupported` |
//!
//! Boundary knots always take their single adjacent secant slope.

mod cubic_spline;
mod polynomial;
mod slope;

pub use cubic_spline::{CubicSpline, Knot};
pub use polynomial::CubicPolynomial;
pub use slope::SlopeStyle;

use crate::error::MathResult;

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}
