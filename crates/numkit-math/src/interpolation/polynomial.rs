//! Cubic polynomials in the monomial basis.

use crate::summation::{accumulate, KahanSum};

/// A polynomial of degree at most three, `a + b·x + c·x² + d·x³`.
///
/// # Example
///
/// ```rust
/// use numkit_math::interpolation::CubicPolynomial;
///
/// // 1 + x^2
/// let p = CubicPolynomial::new(1.0, 0.0, 1.0, 0.0);
/// assert_eq!(p.eval(2.0), 5.0);
/// assert_eq!(p.deriv(2.0), 4.0);
/// assert!((p.integ(0.0, 3.0) - 12.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CubicPolynomial {
    coefficients: [f64; 4],
}

impl CubicPolynomial {
    /// Creates the polynomial `a + b·x + c·x² + d·x³`.
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            coefficients: [a, b, c, d],
        }
    }

    /// Creates a polynomial from `[a, b, c, d]`, lowest degree first.
    #[must_use]
    pub fn from_coefficients(coefficients: [f64; 4]) -> Self {
        Self { coefficients }
    }

    /// Returns `[a, b, c, d]`, lowest degree first.
    pub fn coefficients(&self) -> [f64; 4] {
        self.coefficients
    }

    /// Evaluates the polynomial at x.
    ///
    /// The four monomial terms are combined with compensated summation, which
    /// keeps precision when large terms of opposite sign nearly cancel.
    pub fn eval(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.coefficients;
        accumulate::<KahanSum, _>([a, b * x, c * x * x, d * x * x * x])
    }

    /// Evaluates the first derivative at x.
    pub fn deriv(&self, x: f64) -> f64 {
        let [_, b, c, d] = self.coefficients;
        b + 2.0 * c * x + 3.0 * d * x * x
    }

    /// Returns the definite integral over `[x1, x2]`.
    ///
    /// Reversed bounds give the negated integral.
    pub fn integ(&self, x1: f64, x2: f64) -> f64 {
        self.antiderivative(x2) - self.antiderivative(x1)
    }

    fn antiderivative(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.coefficients;
        let x2 = x * x;
        let x3 = x2 * x;
        let x4 = x3 * x;
        a * x + b * x2 / 2.0 + c * x3 / 3.0 + d * x4 / 4.0
    }
}

impl From<[f64; 4]> for CubicPolynomial {
    fn from(coefficients: [f64; 4]) -> Self {
        Self::from_coefficients(coefficients)
    }
}
