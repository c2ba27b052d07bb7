//! Slope policies for Hermite cubic splines.

use std::fmt;
use std::str::FromStr;

use crate::error::{MathError, MathResult};
use crate::interpolation::Knot;

/// Rule assigning a target first derivative to each knot of a spline.
///
/// The slope at a knot depends only on that knot and its immediate neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlopeStyle {
    /// Mean of the two adjacent secant slopes.
    #[default]
    Standard,

    /// Secant through the two neighbors, ignoring the knot's own ordinate.
    ///
    /// Damps local noise in the derivative; values still pass through every
    /// knot.
    MidArc,

    /// Slopes limited so the spline keeps the data's monotonicity.
    ///
    /// Not implemented: computing a slope with this style returns
    /// [`MathError::Unsupported`].
    Monotone,
}

impl SlopeStyle {
    /// All styles, in tag order.
    pub const ALL: [SlopeStyle; 3] = [Self::Standard, Self::MidArc, Self::Monotone];

    /// Returns the style name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::MidArc => "mid-arc",
            Self::Monotone => "monotone",
        }
    }

    /// Computes the slope at `knots[index]`.
    ///
    /// `knots` must be sorted by x and `index` in bounds. With fewer than two
    /// knots the slope is zero. Boundary knots take their one adjacent secant.
    pub fn slope(&self, knots: &[Knot], index: usize) -> MathResult<f64> {
        let interior: fn(&Knot, &Knot, &Knot) -> f64 = match self {
            Self::Standard => |prev: &Knot, here: &Knot, next: &Knot| {
                (secant(prev, here) + secant(here, next)) / 2.0
            },
            Self::MidArc => |prev: &Knot, _: &Knot, next: &Knot| secant(prev, next),
            Self::Monotone => {
                return Err(MathError::unsupported("monotone cubic spline slopes"));
            }
        };

        let n = knots.len();
        if n < 2 {
            return Ok(0.0);
        }
        if index == 0 {
            return Ok(secant(&knots[0], &knots[1]));
        }
        if index == n - 1 {
            return Ok(secant(&knots[n - 2], &knots[n - 1]));
        }

        Ok(interior(&knots[index - 1], &knots[index], &knots[index + 1]))
    }
}

fn secant(lo: &Knot, hi: &Knot) -> f64 {
    (hi.y - lo.y) / (hi.x - lo.x)
}

impl fmt::Display for SlopeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SlopeStyle {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "midarc" | "mid-arc" | "mid_arc" => Ok(Self::MidArc),
            "monotone" => Ok(Self::Monotone),
            other => Err(MathError::invalid_configuration(format!(
                "unknown slope style: {other:?}"
            ))),
        }
    }
}

impl TryFrom<u8> for SlopeStyle {
    type Error = MathError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(tag))
            .copied()
            .ok_or_else(|| MathError::invalid_configuration(format!("unknown slope style: {tag}")))
    }
}
