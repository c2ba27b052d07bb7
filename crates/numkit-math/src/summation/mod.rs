//! Compensated summation.
//!
//! Naive left-to-right addition loses the low-order bits of every term that is
//! much smaller than the running total. Kahan summation carries those lost bits
//! in a separate compensation term and feeds them back into the next addition,
//! bounding the accumulated error independently of the number of terms.
//!
//! - [`KahanSum`]: running sum of `f64` values
//! - [`ComplexKahanSum`]: running sum of `Complex<f64>` values
//! - [`kahan_sum`]: one-shot compensated sum of a slice
//! - [`accumulate`]: one-shot sum through any [`Accumulator`]

use std::ops::AddAssign;

use nalgebra::Complex;

/// A running sum that reports its current total after every addition.
pub trait Accumulator {
    /// The summed value type.
    type Value;

    /// Adds a value and returns the new running sum.
    fn add(&mut self, value: Self::Value) -> Self::Value;

    /// Returns the current running sum.
    fn sum(&self) -> Self::Value;
}

/// Kahan-compensated running sum of `f64` values.
///
/// # Example
///
/// ```rust
/// use numkit_math::summation::KahanSum;
///
/// let mut sum = KahanSum::new();
/// for _ in 0..10 {
///     sum.add(0.1);
/// }
/// assert_eq!(sum.sum(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KahanSum {
    sum: f64,
    compensation: f64,
}

impl KahanSum {
    /// Creates an accumulator with a starting sum of zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value and returns the new running sum.
    pub fn add(&mut self, value: f64) -> f64 {
        let corrected = value - self.compensation;
        let total = self.sum + corrected;
        self.compensation = (total - self.sum) - corrected;
        self.sum = total;
        self.sum
    }

    /// Returns the current running sum.
    pub fn sum(&self) -> f64 {
        self.sum
    }
}

impl Accumulator for KahanSum {
    type Value = f64;

    fn add(&mut self, value: f64) -> f64 {
        KahanSum::add(self, value)
    }

    fn sum(&self) -> f64 {
        KahanSum::sum(self)
    }
}

impl AddAssign<f64> for KahanSum {
    fn add_assign(&mut self, value: f64) {
        self.add(value);
    }
}

impl Extend<f64> for KahanSum {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl FromIterator<f64> for KahanSum {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut sum = Self::new();
        sum.extend(iter);
        sum
    }
}

/// Feeds every value into a fresh `A` and returns the total.
///
/// ```rust
/// use numkit_math::summation::{accumulate, KahanSum};
///
/// assert_eq!(accumulate::<KahanSum, _>([0.1; 10]), 1.0);
/// ```
pub fn accumulate<A, I>(values: I) -> A::Value
where
    A: Accumulator + Default,
    I: IntoIterator<Item = A::Value>,
{
    let mut acc = A::default();
    for value in values {
        acc.add(value);
    }
    acc.sum()
}

/// Returns the compensated sum of a slice.
pub fn kahan_sum(values: &[f64]) -> f64 {
    accumulate::<KahanSum, _>(values.iter().copied())
}

/// Kahan-compensated running sum of complex values.
///
/// Real and imaginary parts are compensated independently.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComplexKahanSum {
    re: KahanSum,
    im: KahanSum,
}

impl ComplexKahanSum {
    /// Creates an accumulator with a starting sum of zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value and returns the new running sum.
    pub fn add(&mut self, value: Complex<f64>) -> Complex<f64> {
        self.re.add(value.re);
        self.im.add(value.im);
        self.sum()
    }

    /// Returns the current running sum.
    pub fn sum(&self) -> Complex<f64> {
        Complex::new(self.re.sum(), self.im.sum())
    }
}

impl Accumulator for ComplexKahanSum {
    type Value = Complex<f64>;

    fn add(&mut self, value: Complex<f64>) -> Complex<f64> {
        ComplexKahanSum::add(self, value)
    }

    fn sum(&self) -> Complex<f64> {
        ComplexKahanSum::sum(self)
    }
}

impl FromIterator<Complex<f64>> for ComplexKahanSum {
    fn from_iter<I: IntoIterator<Item = Complex<f64>>>(iter: I) -> Self {
        let mut sum = Self::new();
        for value in iter {
            sum.add(value);
        }
        sum
    }
}
