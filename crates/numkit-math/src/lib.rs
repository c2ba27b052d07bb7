//! # Numkit Math
//!
//! Small numerical-analysis toolkit built around incremental cubic spline
//! interpolation.
//!
//! This crate provides:
//!
//! - **Interpolation**: Hermite cubic splines with selectable slope styles,
//!   grown one knot at a time with local recomputation
//! - **Summation**: Kahan-compensated accumulators
//! - **Linear Algebra**: LU solver for small fixed-size systems
//! - **Solvers**: Bisection root finding
//!
//! ## Design Philosophy
//!
//! - **Local Updates**: Adding a knot touches only its neighborhood
//! - **Numerical Stability**: Compensated sums, pivoted elimination
//! - **Explicit Failure**: Singular fits and unsupported styles are errors, never NaN

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod solvers;
pub mod summation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{CubicPolynomial, CubicSpline, Interpolator, Knot, SlopeStyle};
    pub use crate::linear_algebra::{LinearSolver, LuSolver};
    pub use crate::solvers::{
        bisection, bisection_precision, bisection_steps, Bisector, SolverConfig, SolverResult,
    };
    pub use crate::summation::{accumulate, kahan_sum, Accumulator, ComplexKahanSum, KahanSum};
}

pub use error::{MathError, MathResult};
