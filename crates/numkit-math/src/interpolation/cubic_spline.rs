//! Hermite cubic splines built by incremental insertion.

use nalgebra::{Matrix4, Vector4};

use crate::error::{MathError, MathResult};
use crate::interpolation::{CubicPolynomial, Interpolator, SlopeStyle};
use crate::linear_algebra::{LinearSolver, LuSolver};
use crate::summation::{accumulate, KahanSum};

/// A data point the spline passes through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knot {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

impl Knot {
    /// Creates a knot.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Knot {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Piecewise cubic Hermite spline, continuous up to the first derivative.
///
/// Knots are added one at a time and kept sorted by x. Each knot carries a
/// target slope chosen by the spline's [`SlopeStyle`]; each segment between
/// consecutive knots is the cubic matching both endpoint values and both
/// endpoint slopes. Adding a knot only recomputes the slopes of the new knot
/// and its two neighbors, and refits the (at most four) segments touching them.
///
/// Queries outside the knot range extrapolate with the nearest boundary
/// segment. An empty spline is zero everywhere; a single knot gives a constant.
///
/// # Example
///
/// ```rust
/// use numkit_math::interpolation::{CubicSpline, SlopeStyle};
///
/// let mut spline = CubicSpline::new(SlopeStyle::Standard);
/// spline.add(0.0, 0.0).unwrap();
/// spline.add(2.0, 0.0).unwrap();
/// spline.add(1.0, 1.0).unwrap();
///
/// assert!((spline.eval(1.0) - 1.0).abs() < 1e-12);
/// assert!(spline.deriv(1.0).abs() < 1e-12);
/// assert!((spline.integ(0.0, 2.0) - 7.0 / 6.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSpline<S = LuSolver> {
    style: SlopeStyle,
    solver: S,
    knots: Vec<Knot>,
    slopes: Vec<f64>,
    segments: Vec<CubicPolynomial>,
}

/// Slopes and segment fits computed for an insertion but not yet applied.
struct StagedInsert {
    /// `(knot index, slope)`, indices after insertion.
    slopes: Vec<(usize, f64)>,
    /// `(segment index, polynomial)`, indices after insertion.
    segments: Vec<(usize, CubicPolynomial)>,
}

impl CubicSpline<LuSolver> {
    /// Creates an empty spline using the default LU solver.
    #[must_use]
    pub fn new(style: SlopeStyle) -> Self {
        Self::with_solver(style, LuSolver::default())
    }

    /// Creates a spline by adding each point in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`CubicSpline::add`].
    pub fn from_points<I>(style: SlopeStyle, points: I) -> MathResult<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut spline = Self::new(style);
        for (x, y) in points {
            spline.add(x, y)?;
        }
        Ok(spline)
    }
}

impl<S: LinearSolver> CubicSpline<S> {
    /// Creates an empty spline that fits segments with `solver`.
    #[must_use]
    pub fn with_solver(style: SlopeStyle, solver: S) -> Self {
        Self {
            style,
            solver,
            knots: Vec::new(),
            slopes: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Returns the slope style.
    pub fn style(&self) -> SlopeStyle {
        self.style
    }

    /// Returns the number of knots.
    pub fn len(&self) -> usize {
        self.knots.len()
    }

    /// Returns true if no knots have been added.
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// Returns the knots, sorted by x.
    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    /// Returns the slope at each knot.
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }

    /// Returns the segment polynomials; segment `i` spans knots `i` and `i + 1`.
    pub fn segments(&self) -> &[CubicPolynomial] {
        &self.segments
    }

    /// Adds a knot.
    ///
    /// The knot is placed before any existing knot with the same x. The call
    /// either completes fully or leaves the spline unchanged.
    ///
    /// # Errors
    ///
    /// - [`MathError::InvalidInput`] if `x` or `y` is not finite, or a segment
    ///   fit overflows
    /// - [`MathError::Unsupported`] for [`SlopeStyle::Monotone`]
    /// - [`MathError::SingularSystem`] if a segment system is too badly
    ///   conditioned to fit reliably, which is always the case when `x`
    ///   duplicates an existing knot. Segments are fitted in absolute
    ///   coordinates, so closely spaced knots far from the origin also fail.
    pub fn add(&mut self, x: f64, y: f64) -> MathResult<()> {
        if !x.is_finite() || !y.is_finite() {
            return Err(MathError::invalid_input(format!(
                "knot ({x}, {y}) must be finite"
            )));
        }

        let index = self.knots.partition_point(|k| k.x < x);
        self.knots.insert(index, Knot::new(x, y));

        match self.stage(index) {
            Ok(staged) => {
                self.commit(index, staged);
                log::debug!(
                    "added knot ({x}, {y}) at index {index}, {} knots",
                    self.knots.len()
                );
                Ok(())
            }
            Err(err) => {
                self.knots.remove(index);
                log::warn!("rejected knot ({x}, {y}): {err}");
                Err(err)
            }
        }
    }

    /// Computes every slope and segment touched by a knot just inserted at
    /// `index`, without modifying the spline.
    fn stage(&self, index: usize) -> MathResult<StagedInsert> {
        let n = self.knots.len();
        let has_left = index > 0;
        let has_right = index + 1 < n;

        let mut slopes = Vec::with_capacity(3);
        slopes.push((index, self.style.slope(&self.knots, index)?));
        if has_left {
            slopes.push((index - 1, self.style.slope(&self.knots, index - 1)?));
        }
        if has_right {
            slopes.push((index + 1, self.style.slope(&self.knots, index + 1)?));
        }

        // Segments whose endpoints include a knot with a new slope
        let mut targets = Vec::with_capacity(4);
        if has_left {
            targets.push(index - 1);
            if index > 1 {
                targets.push(index - 2);
            }
        }
        if has_right {
            targets.push(index);
            if index + 2 < n {
                targets.push(index + 1);
            }
        }

        let slope_at = |k: usize| -> f64 {
            match slopes.iter().find(|(j, _)| *j == k) {
                Some(&(_, slope)) => slope,
                None if k < index => self.slopes[k],
                None => self.slopes[k - 1],
            }
        };

        let mut segments = Vec::with_capacity(targets.len());
        for segment in targets {
            let poly = self.refit(segment, slope_at(segment), slope_at(segment + 1))?;
            segments.push((segment, poly));
        }

        if let Some((segment, _)) = segments
            .iter()
            .find(|(_, poly)| !poly.coefficients().iter().all(|c| c.is_finite()))
        {
            return Err(MathError::invalid_input(format!(
                "segment {segment} fit is not finite"
            )));
        }

        Ok(StagedInsert { slopes, segments })
    }

    fn commit(&mut self, index: usize, staged: StagedInsert) {
        self.slopes.insert(index, 0.0);
        for (k, slope) in staged.slopes {
            self.slopes[k] = slope;
        }

        if self.knots.len() > 1 {
            let position = index.min(self.segments.len());
            self.segments.insert(position, CubicPolynomial::default());
        }
        for (segment, poly) in staged.segments {
            self.segments[segment] = poly;
        }
    }

    /// Fits the cubic on `[x_i, x_{i+1}]` matching values and the given slopes.
    fn refit(&self, segment: usize, slope0: f64, slope1: f64) -> MathResult<CubicPolynomial> {
        let Knot { x: x0, y: y0 } = self.knots[segment];
        let Knot { x: x1, y: y1 } = self.knots[segment + 1];

        #[rustfmt::skip]
        let system = Matrix4::new(
            1.0, x0,  x0 * x0,   x0 * x0 * x0,
            1.0, x1,  x1 * x1,   x1 * x1 * x1,
            0.0, 1.0, 2.0 * x0,  3.0 * x0 * x0,
            0.0, 1.0, 2.0 * x1,  3.0 * x1 * x1,
        );
        let rhs = Vector4::new(y0, y1, slope0, slope1);

        let coeffs = self.solver.solve(&system, &rhs)?;
        log::trace!("refit segment {segment} on [{x0}, {x1}]");

        Ok(CubicPolynomial::new(coeffs[0], coeffs[1], coeffs[2], coeffs[3]))
    }

    /// Index of the segment used for x, clamped to the boundary segments.
    ///
    /// Requires at least one segment.
    fn segment_index(&self, x: f64) -> usize {
        self.knots
            .partition_point(|k| k.x < x)
            .saturating_sub(1)
            .min(self.segments.len() - 1)
    }

    /// Evaluates the spline at x.
    pub fn eval(&self, x: f64) -> f64 {
        match self.knots.as_slice() {
            [] => 0.0,
            [only] => only.y,
            _ => self.segments[self.segment_index(x)].eval(x),
        }
    }

    /// Evaluates the first derivative at x.
    pub fn deriv(&self, x: f64) -> f64 {
        if self.segments.is_empty() {
            return 0.0;
        }
        self.segments[self.segment_index(x)].deriv(x)
    }

    /// Returns the definite integral over `[x1, x2]`.
    ///
    /// Reversed bounds give the negated integral.
    pub fn integ(&self, x1: f64, x2: f64) -> f64 {
        if x1 == x2 {
            return 0.0;
        }
        if x1 > x2 {
            return -self.integ(x2, x1);
        }

        match self.knots.as_slice() {
            [] => 0.0,
            [only] => only.y * (x2 - x1),
            _ => {
                let start = self.segment_index(x1);
                let end = self.segment_index(x2);

                accumulate::<KahanSum, _>((start..=end).map(|i| {
                    let lo = if i == start { x1 } else { self.knots[i].x };
                    let hi = if i == end { x2 } else { self.knots[i + 1].x };
                    self.segments[i].integ(lo, hi)
                }))
            }
        }
    }
}

impl<S: LinearSolver + Send + Sync> Interpolator for CubicSpline<S> {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        Ok(self.eval(x))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        Ok(self.deriv(x))
    }

    fn allows_extrapolation(&self) -> bool {
        true
    }

    /// NaN for an empty spline.
    fn min_x(&self) -> f64 {
        self.knots.first().map_or(f64::NAN, |k| k.x)
    }

    /// NaN for an empty spline.
    fn max_x(&self) -> f64 {
        self.knots.last().map_or(f64::NAN, |k| k.x)
    }
}
