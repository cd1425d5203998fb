//! Bracketing and open root finders that keep a step-by-step trace.
//!
//! ┌ [`bisection`]      : halves a sign-changing bracket, capped runs still succeed
//! └ [`newton_raphson`] : tangent steps with a numeric derivative, capped runs fail
//!
//! Both evaluate the user's [`Expression`] through [`eval_at`] so any
//! evaluation failure carries the offending `x`.

use log::{debug, trace, warn};
use mathexpr::Expression;
use serde::Serialize;

use crate::error::{finite, Error, InputError};

pub const BISECTION_FORMULA: &str = "c = (a + b) / 2";
pub const NEWTON_FORMULA: &str = "x_{n+1} = x_n - f(x_n) / f'(x_n)";

/// Relative step of the symmetric difference used for f'(x) in Newton-Raphson.
pub const DERIVATIVE_STEP: f64 = 1e-7;

/// Stopping rule shared by the iterative methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criteria {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria { tolerance: 1e-6, max_iterations: 100 }
    }
}

impl Criteria {
    pub fn validate(self) -> Result<Self, InputError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(InputError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(InputError::InvalidMaxIter(0.0));
        }
        Ok(self)
    }
}

fn midpoint(a: f64, b: f64) -> f64 {
    a / 2.0 + b / 2.0
}

pub(crate) fn eval_at(expr: &Expression, x: f64) -> Result<f64, Error> {
    expr.eval(x).map_err(|source| Error::Evaluation { x, source })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BisectionStep {
    pub iteration: usize,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub f_c: f64,
    pub error: f64,
}

/// Outcome of [`bisection`]. `converged` is false when the iteration cap
/// (or the float resolution of the bracket) stopped the run first; `root`
/// is then the last midpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BisectionReport {
    pub root: f64,
    pub iterations: usize,
    pub converged: bool,
    pub steps: Vec<BisectionStep>,
}

/// Finds a root of `expr` inside `[a, b]` by repeated halving.
///
/// Requires `a < b` and a sign change between `f(a)` and `f(b)`; an endpoint
/// where `f` is exactly zero is returned right away with no steps.
/// Each step records the bracket it started from, the midpoint `c`, `f(c)`
/// and the half width `|b - a| / 2`. Stops when `|f(c)| < tolerance` or the
/// half width drops below it.
///
/// # Errors
/// - [`InputError::InvalidBounds`] when `a >= b` or either is not finite
/// - [`Error::InvalidInterval`] when `f(a)` and `f(b)` share a sign
/// - [`Error::Evaluation`] when `f` cannot be evaluated at a probe point
pub fn bisection(
    expr: &Expression,
    mut a: f64,
    mut b: f64,
    criteria: Criteria,
) -> Result<BisectionReport, Error> {
    let criteria = criteria.validate()?;
    if !(a.is_finite() && b.is_finite()) || a >= b {
        return Err(InputError::InvalidBounds { a, b }.into());
    }
    debug!("bisection of '{}' on [{}, {}] with {:?}", expr, a, b, criteria);

    let mut fa = eval_at(expr, a)?;
    let fb = eval_at(expr, b)?;
    for (endpoint, value) in [(a, fa), (b, fb)] {
        if value == 0.0 {
            return Ok(BisectionReport { root: endpoint, iterations: 0, converged: true, steps: Vec::new() });
        }
    }
    if fa.signum() == fb.signum() {
        return Err(Error::InvalidInterval { a, b, fa, fb });
    }

    let mut steps: Vec<BisectionStep> = Vec::new();
    for iteration in 1..=criteria.max_iterations {
        let c = midpoint(a, b);
        if c <= a || c >= b {
            warn!("bisection bracket [{}, {}] cannot be split further", a, b);
            break;
        }
        let f_c = eval_at(expr, c)?;
        // halves first, b - a alone overflows on brackets wider than f64::MAX
        let error = b / 2.0 - a / 2.0;
        let step = BisectionStep { iteration, a, b, c, f_c, error };
        trace!("{:?}", step);
        steps.push(step);

        if f_c.abs() < criteria.tolerance || error < criteria.tolerance {
            debug!("bisection converged to {} after {} iterations", c, iteration);
            return Ok(BisectionReport { root: c, iterations: iteration, converged: true, steps });
        }
        if f_c.signum() == fa.signum() {
            a = c;
            fa = f_c;
        } else {
            b = c;
        }
    }

    let root = steps.last().map_or(midpoint(a, b), |s| s.c);
    warn!(
        "bisection stopped after {} iterations without reaching tolerance {}",
        steps.len(),
        criteria.tolerance
    );
    Ok(BisectionReport { root, iterations: steps.len(), converged: false, steps })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewtonStep {
    pub iteration: usize,
    pub x_n: f64,
    pub f_x: f64,
    pub df_x: f64,
    pub x_next: f64,
    pub error: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewtonReport {
    pub root: f64,
    pub iterations: usize,
    pub steps: Vec<NewtonStep>,
}

/// Symmetric difference `(f(x+h) - f(x-h)) / 2h` with `h` scaled to `|x|`.
pub fn derivative(expr: &Expression, x: f64) -> Result<f64, Error> {
    let h = DERIVATIVE_STEP * x.abs().max(1.0);
    Ok((eval_at(expr, x + h)? - eval_at(expr, x - h)?) / (2.0 * h))
}

/// Newton-Raphson iteration from `x0`, `x_{n+1} = x_n - f(x_n)/f'(x_n)`.
///
/// The derivative is estimated numerically with [`derivative`]. Each step
/// records `x_n`, `f(x_n)`, `f'(x_n)`, `x_{n+1}` and `|x_{n+1} - x_n|`;
/// the run stops once that step is below the tolerance.
///
/// # Errors
/// - [`Error::DerivativeZero`] when `|f'(x_n)|` is below machine epsilon
/// - [`Error::NonConvergence`] when the cap is hit above tolerance, or the
///   iterate leaves the finite range
/// - [`Error::Evaluation`] when `f` cannot be evaluated at an iterate
pub fn newton_raphson(expr: &Expression, x0: f64, criteria: Criteria) -> Result<NewtonReport, Error> {
    let criteria = criteria.validate()?;
    let mut x_n = finite("x0", x0)?;
    debug!("newton-raphson of '{}' from {} with {:?}", expr, x0, criteria);

    let mut steps: Vec<NewtonStep> = Vec::new();
    for iteration in 1..=criteria.max_iterations {
        let f_x = eval_at(expr, x_n)?;
        let df_x = derivative(expr, x_n)?;
        if df_x.abs() < f64::EPSILON {
            return Err(Error::DerivativeZero { x: x_n, df: df_x });
        }
        let x_next = x_n - f_x / df_x;
        let error = (x_next - x_n).abs();
        if !x_next.is_finite() {
            return Err(Error::NonConvergence { iterations: iteration, error });
        }
        let step = NewtonStep { iteration, x_n, f_x, df_x, x_next, error };
        trace!("{:?}", step);
        steps.push(step);

        if error < criteria.tolerance {
            debug!("newton-raphson converged to {} after {} iterations", x_next, iteration);
            return Ok(NewtonReport { root: x_next, iterations: iteration, steps });
        }
        x_n = x_next;
    }

    let error = steps.last().map_or(f64::INFINITY, |s| s.error);
    Err(Error::NonConvergence { iterations: criteria.max_iterations, error })
}
