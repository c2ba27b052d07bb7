//! Linear algebra utilities.
//!
//! Small dense systems with compile-time dimensions, solved by LU
//! decomposition with partial pivoting. Spline segment fitting goes through the
//! [`LinearSolver`] trait so any conforming solver can be substituted.

use nalgebra::{SMatrix, SVector};

use crate::error::{MathError, MathResult};

/// Default minimum reciprocal condition number accepted by [`LuSolver`].
///
/// Hermite segment fits accepted at this level reproduce their knots to about
/// `1e-4` relative accuracy in the worst case, usually far better.
pub const DEFAULT_RCOND_TOLERANCE: f64 = 1e-12;

/// Solves square systems `A·x = b`.
pub trait LinearSolver {
    /// Returns `x` such that `A·x = b`.
    ///
    /// Fails with [`MathError::SingularSystem`] when `A` is numerically singular.
    fn solve<const N: usize>(
        &self,
        a: &SMatrix<f64, N, N>,
        b: &SVector<f64, N>,
    ) -> MathResult<SVector<f64, N>>;
}

/// LU factorization `P·A = L·U` of a square matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct LuDecomposition<const N: usize> {
    /// Unit lower triangular factor.
    pub l: SMatrix<f64, N, N>,
    /// Upper triangular factor.
    pub u: SMatrix<f64, N, N>,
    /// `permutation[i]` is the row of `A` that ended up in row `i`.
    pub permutation: [usize; N],
}

impl<const N: usize> LuDecomposition<N> {
    /// Solves `A·x = b` using the stored factors.
    pub fn solve(&self, b: &SVector<f64, N>) -> SVector<f64, N> {
        // Solve Ly = Pb (forward substitution, unit diagonal)
        let mut y = SVector::<f64, N>::zeros();
        for i in 0..N {
            let mut sum = b[self.permutation[i]];
            for j in 0..i {
                sum -= self.l[(i, j)] * y[j];
            }
            y[i] = sum;
        }

        // Solve Ux = y (back substitution)
        let mut x = SVector::<f64, N>::zeros();
        for i in (0..N).rev() {
            let mut sum = y[i];
            for j in i + 1..N {
                sum -= self.u[(i, j)] * x[j];
            }
            x[i] = sum / self.u[(i, i)];
        }

        x
    }

    /// Returns `A⁻¹`, one column per unit right-hand side.
    pub fn inverse(&self) -> SMatrix<f64, N, N> {
        let mut inverse = SMatrix::<f64, N, N>::zeros();
        for j in 0..N {
            let unit = SVector::<f64, N>::from_fn(|i, _| if i == j { 1.0 } else { 0.0 });
            inverse.set_column(j, &self.solve(&unit));
        }
        inverse
    }

    /// Reciprocal 1-norm condition number of `matrix` after scaling each of its
    /// columns to unit maximum magnitude.
    ///
    /// `matrix` must be the matrix these factors were computed from. Column
    /// scaling makes the measure independent of the units of each unknown, so
    /// it tracks how many digits the solution keeps rather than how large the
    /// entries are. Returns 0 when the inverse is not finite.
    pub fn scaled_rcond(&self, matrix: &SMatrix<f64, N, N>) -> f64 {
        let scales: [f64; N] = std::array::from_fn(|j| matrix.column(j).amax());
        let inverse = self.inverse();

        let mut norm = 0.0_f64;
        let mut inverse_norm = 0.0_f64;
        for j in 0..N {
            norm = norm.max(matrix.column(j).lp_norm(1) / scales[j]);

            // (A·D⁻¹)⁻¹ = D·A⁻¹
            let column: f64 = (0..N).map(|i| scales[i] * inverse[(i, j)].abs()).sum();
            if !column.is_finite() {
                return 0.0;
            }
            inverse_norm = inverse_norm.max(column);
        }

        1.0 / (norm * inverse_norm)
    }
}

/// Performs LU decomposition with partial pivoting.
///
/// Fails only when elimination meets an exactly zero (or NaN) pivot; use
/// [`LuDecomposition::scaled_rcond`] to judge near-singular systems.
pub fn lu_decomposition<const N: usize>(
    matrix: &SMatrix<f64, N, N>,
) -> MathResult<LuDecomposition<N>> {
    let mut l = SMatrix::<f64, N, N>::identity();
    let mut u = *matrix;
    let mut permutation: [usize; N] = std::array::from_fn(|i| i);

    for k in 0..N {
        // Partial pivoting: bring the largest remaining entry of column k up
        let mut pivot_row = k;
        for i in k + 1..N {
            if u[(i, k)].abs() > u[(pivot_row, k)].abs() {
                pivot_row = i;
            }
        }

        let pivot = u[(pivot_row, k)].abs();
        if pivot.is_nan() || pivot == 0.0 {
            return Err(MathError::SingularSystem {
                rcond: 0.0,
                tolerance: 0.0,
            });
        }

        if pivot_row != k {
            u.swap_rows(k, pivot_row);
            permutation.swap(k, pivot_row);
            for j in 0..k {
                let tmp = l[(k, j)];
                l[(k, j)] = l[(pivot_row, j)];
                l[(pivot_row, j)] = tmp;
            }
        }

        for i in k + 1..N {
            let factor = u[(i, k)] / u[(k, k)];
            l[(i, k)] = factor;

            for j in k..N {
                u[(i, j)] -= factor * u[(k, j)];
            }
        }
    }

    Ok(LuDecomposition { l, u, permutation })
}

/// Dense LU solver with partial pivoting.
///
/// A system is rejected as [`MathError::SingularSystem`] when its column-scaled
/// reciprocal condition number is at or below the solver's tolerance.
///
/// # Example
///
/// ```rust
/// use nalgebra::{Matrix2, Vector2};
/// use numkit_math::linear_algebra::{LinearSolver, LuSolver};
///
/// let a = Matrix2::new(2.0, 1.0, 1.0, 3.0);
/// let b = Vector2::new(5.0, 5.0);
///
/// let x = LuSolver::default().solve(&a, &b).unwrap();
/// assert!((x[0] - 2.0).abs() < 1e-12);
/// assert!((x[1] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuSolver {
    rcond_tolerance: f64,
}

impl Default for LuSolver {
    fn default() -> Self {
        Self {
            rcond_tolerance: DEFAULT_RCOND_TOLERANCE,
        }
    }
}

impl LuSolver {
    /// Creates a solver with the default condition tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum accepted reciprocal condition number.
    #[must_use]
    pub fn with_rcond_tolerance(mut self, rcond_tolerance: f64) -> Self {
        self.rcond_tolerance = rcond_tolerance;
        self
    }

    /// Returns the minimum accepted reciprocal condition number.
    pub fn rcond_tolerance(&self) -> f64 {
        self.rcond_tolerance
    }
}

impl LinearSolver for LuSolver {
    fn solve<const N: usize>(
        &self,
        a: &SMatrix<f64, N, N>,
        b: &SVector<f64, N>,
    ) -> MathResult<SVector<f64, N>> {
        let lu = lu_decomposition(a)?;

        let rcond = lu.scaled_rcond(a);
        if rcond.is_nan() || rcond <= self.rcond_tolerance {
            return Err(MathError::SingularSystem {
                rcond,
                tolerance: self.rcond_tolerance,
            });
        }

        Ok(lu.solve(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix2, Matrix3, Matrix4, Vector2, Vector3, Vector4};

    #[test]
    fn test_lu_decomposition() {
        let a = Matrix3::new(2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0);

        let lu = lu_decomposition(&a).unwrap();

        // Verify L * U = P * A
        let product = lu.l * lu.u;
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(
                    product[(i, j)],
                    a[(lu.permutation[i], j)],
                    epsilon = 1e-10
                );
            }
        }
        // Largest first-column entry is 8.0 in row 2
        assert_eq!(lu.permutation[0], 2);
    }

    #[test]
    fn test_solve_linear_system() {
        let a = Matrix2::new(2.0, 1.0, 1.0, 3.0);
        let b = Vector2::new(5.0, 5.0);

        let x = LuSolver::default().solve(&a, &b).unwrap();

        assert_relative_eq!(x[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_leading_entry_needs_pivot() {
        // Without row exchange the first pivot would be zero
        let a = Matrix3::new(0.0, 1.0, 2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 0.0);
        let b = Vector3::new(8.0, 4.0, 4.0);

        let x = LuSolver::default().solve(&a, &b).unwrap();

        let residual = a * x - b;
        assert!(residual.amax() < 1e-12);
    }

    #[test]
    fn test_singular_matrix() {
        let a = Matrix3::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 0.0, 1.0);
        let b = Vector3::new(1.0, 2.0, 3.0);

        let err = LuSolver::default().solve(&a, &b).unwrap_err();
        assert!(err.is_singular());
    }

    #[test]
    fn test_zero_matrix_is_singular() {
        let a = Matrix2::<f64>::zeros();
        let b = Vector2::new(1.0, 1.0);

        match LuSolver::default().solve(&a, &b) {
            Err(MathError::SingularSystem { rcond, .. }) => assert_eq!(rcond, 0.0),
            other => panic!("Expected SingularSystem, got {:?}", other),
        }
    }

    #[test]
    fn test_hermite_system() {
        // p(x) = 1 + 2x - x^2 + 0.5x^3 on [1, 3]
        let (x0, x1) = (1.0_f64, 3.0_f64);
        let p = |x: f64| 1.0 + 2.0 * x - x * x + 0.5 * x * x * x;
        let dp = |x: f64| 2.0 - 2.0 * x + 1.5 * x * x;

        #[rustfmt::skip]
        let a = Matrix4::new(
            1.0, x0, x0 * x0, x0 * x0 * x0,
            1.0, x1, x1 * x1, x1 * x1 * x1,
            0.0, 1.0, 2.0 * x0, 3.0 * x0 * x0,
            0.0, 1.0, 2.0 * x1, 3.0 * x1 * x1,
        );
        let b = Vector4::new(p(x0), p(x1), dp(x0), dp(x1));

        let x = LuSolver::default().solve(&a, &b).unwrap();

        assert_relative_eq!(x[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-10);
        assert_relative_eq!(x[2], -1.0, epsilon = 1e-10);
        assert_relative_eq!(x[3], 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_nearly_dependent_columns() {
        let a = Matrix2::new(1.0, 1.0, 1.0, 1.0 + 1e-6);
        let b = Vector2::new(2.0, 2.0 + 1e-6);

        // rcond is about 2.5e-7
        let x = LuSolver::default().solve(&a, &b).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-8);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-8);

        let strict = LuSolver::new().with_rcond_tolerance(1e-6);
        assert_eq!(strict.rcond_tolerance(), 1e-6);
        assert!(strict.solve(&a, &b).unwrap_err().is_singular());
    }

    #[test]
    fn test_column_scale_does_not_matter() {
        // Badly scaled but perfectly conditioned once columns are normalized
        let a = Matrix2::new(1.0, 0.0, 0.0, 1e-20);
        let lu = lu_decomposition(&a).unwrap();
        assert_relative_eq!(lu.scaled_rcond(&a), 1.0);

        let x = LuSolver::default().solve(&a, &Vector2::new(1.0, 1e-20)).unwrap();
        assert_relative_eq!(x[1], 1.0);
    }

    #[test]
    fn test_scaled_rcond_follows_knot_spacing() {
        #[rustfmt::skip]
        let hermite = |x0: f64, x1: f64| {
            Matrix4::new(
                1.0, x0, x0 * x0, x0 * x0 * x0,
                1.0, x1, x1 * x1, x1 * x1 * x1,
                0.0, 1.0, 2.0 * x0, 3.0 * x0 * x0,
                0.0, 1.0, 2.0 * x1, 3.0 * x1 * x1,
            )
        };
        let rcond = |a: Matrix4<f64>| lu_decomposition(&a).unwrap().scaled_rcond(&a);

        // Same magnitude, wider spacing: better conditioned
        assert!(rcond(hermite(1e4, 1e4 + 100.0)) > 1e3 * rcond(hermite(1e4, 1e4 + 1.0)));
        // Same spacing, further from the origin: worse conditioned
        assert!(rcond(hermite(1e4, 1e4 + 1.0)) < rcond(hermite(10.0, 11.0)));

        let solver = LuSolver::default();
        let b = Vector4::new(0.0, 1.0, 0.5, -0.5);
        assert!(solver.solve(&hermite(1e4, 1e4 + 1.0), &b).unwrap_err().is_singular());
        assert!(solver.solve(&hermite(1e3, 1e3 + 10.0), &b).is_ok());
    }
}
