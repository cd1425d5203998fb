//! Error taxonomy shared by every method.
//!
//! ┌ [`Error`]      : what a request can fail with
//! │  ├ parse / evaluation failures of the user's formula
//! │  ├ method specific failures (bracket, derivative, convergence, spacing)
//! │  └ [`InputError`]
//! └ [`InputError`] : malformed or inconsistent request values
//!
//! `Display` of each variant is the message shown to the user.

use mathexpr::{EvalError, ParseError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid function: {0}")]
    Parse(#[from] ParseError),

    #[error("cannot evaluate f({x}): {source}")]
    Evaluation { x: f64, source: EvalError },

    #[error("f(a) and f(b) must have opposite signs: f({a}) = {fa}, f({b}) = {fb}")]
    InvalidInterval { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("derivative too small at x = {x} (f'(x) = {df}), method fails")]
    DerivativeZero { x: f64, df: f64 },

    #[error("no convergence after {iterations} iterations, last step was {error:e}")]
    NonConvergence { iterations: usize, error: f64 },

    #[error("points must be equally spaced: spacing {got} before index {index} differs from h = {h}")]
    UnequalSpacing { index: usize, h: f64, got: f64 },

    #[error(transparent)]
    Input(#[from] InputError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("x and y arrays must have same length, got {x_len} and {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("need at least {need} points, got {got}")]
    InsufficientPoints { need: usize, got: usize },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("'{field}' is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("tolerance must be finite and > 0, got {0}")]
    InvalidTolerance(f64),

    #[error("step h must be finite and > 0, got {0}")]
    InvalidStep(f64),

    #[error("invalid bracket: need a < b, got [{a}, {b}]")]
    InvalidBounds { a: f64, b: f64 },

    #[error("max_iterations must be a whole number >= 1, got {0}")]
    InvalidMaxIter(f64),

    #[error("max_iterations {value} exceeds the limit of {limit}")]
    MaxIterTooLarge { value: f64, limit: usize },

    #[error("duplicate x value {x} at index {index}")]
    DuplicateX { index: usize, x: f64 },

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("invalid request: {0}")]
    Malformed(String),
}

pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NonFinite { name, value })
    }
}
