//! JSON request handling for the calculator endpoints.
//!
//! [`handle`] takes an endpoint name and a JSON body, runs one method and
//! answers with a status and a JSON body. Failures of any kind become
//! `{"error": "<message>"}`.

use log::debug;
use mathexpr::Expression;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::config::Config;
use crate::differences::{
    data_differences, function_differences, BACKWARD_FORMULA, CENTRAL_FORMULA, FORWARD_FORMULA,
};
use crate::error::{Error, InputError};
use crate::errorcalc::{error_metrics, ABSOLUTE_FORMULA, PERCENTAGE_FORMULA, RELATIVE_FORMULA};
use crate::findroot::{bisection, newton_raphson, Criteria, BISECTION_FORMULA, NEWTON_FORMULA};
use crate::interpolate::{
    newton_forward, FIRST_DERIVATIVE_FORMULA, INTERPOLATION_FORMULA, SECOND_DERIVATIVE_FORMULA,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Bisection,
    NewtonRaphson,
    FiniteDifferences,
    NewtonForwardDiff,
    ErrorCalculation,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Bisection,
        Endpoint::NewtonRaphson,
        Endpoint::FiniteDifferences,
        Endpoint::NewtonForwardDiff,
        Endpoint::ErrorCalculation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Bisection => "bisection",
            Endpoint::NewtonRaphson => "newton-raphson",
            Endpoint::FiniteDifferences => "finite-differences",
            Endpoint::NewtonForwardDiff => "newton-forward-diff",
            Endpoint::ErrorCalculation => "error-calculation",
        }
    }

    /// Runs the method behind this endpoint on a JSON request body.
    pub fn call(&self, body: &str, cfg: &Config) -> Result<Value, Error> {
        match self {
            Endpoint::Bisection => run_bisection(decode(body)?, cfg),
            Endpoint::NewtonRaphson => run_newton(decode(body)?, cfg),
            Endpoint::FiniteDifferences => run_differences(decode(body)?, cfg),
            Endpoint::NewtonForwardDiff => run_interpolation(decode(body)?, cfg),
            Endpoint::ErrorCalculation => run_error(decode(body)?),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Accepts `bisection`, `/bisection/` and `/api/bisection/`.
impl FromStr for Endpoint {
    type Err = String;
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let name = path.trim().trim_matches('/');
        let name = name.strip_prefix("api/").unwrap_or(name);
        Endpoint::ALL
            .iter()
            .find(|e| e.name() == name)
            .copied()
            .ok_or_else(|| format!("unknown endpoint '{}'", path.trim()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn ok(body: Value) -> Self {
        Response { status: 200, body }
    }

    pub fn error(status: u16, message: impl fmt::Display) -> Self {
        Response { status, body: json!({ "error": message.to_string() }) }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// 200 with the method's result, 400 when the request or the method fails,
/// 404 for an unknown endpoint.
pub fn handle(path: &str, body: &str, cfg: &Config) -> Response {
    let endpoint = match path.parse::<Endpoint>() {
        Ok(endpoint) => endpoint,
        Err(msg) => return Response::error(404, msg),
    };
    debug!("{} request: {}", endpoint, body);
    match endpoint.call(body, cfg) {
        Ok(value) => Response::ok(value),
        Err(e) => {
            debug!("{} failed: {}", endpoint, e);
            Response::error(400, e)
        }
    }
}

/// A request number, sent either as a JSON number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Numeric {
    fn value(&self, field: &'static str) -> Result<f64, InputError> {
        match self {
            Numeric::Number(v) => Ok(*v),
            Numeric::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| InputError::NotANumber { field, value: s.clone() }),
            Numeric::Other(v) => Err(InputError::NotANumber { field, value: v.to_string() }),
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, InputError> {
    serde_json::from_str(body).map_err(|e| InputError::Malformed(e.to_string()))
}

fn required(value: &Option<Numeric>, field: &'static str) -> Result<f64, InputError> {
    value.as_ref().ok_or(InputError::MissingField(field))?.value(field)
}

fn optional(value: &Option<Numeric>, field: &'static str) -> Result<Option<f64>, InputError> {
    value.as_ref().map(|v| v.value(field)).transpose()
}

fn values(list: &Option<Vec<Numeric>>, field: &'static str) -> Result<Vec<f64>, InputError> {
    list.as_ref()
        .ok_or(InputError::MissingField(field))?
        .iter()
        .map(|v| v.value(field))
        .collect()
}

fn expression(function: &Option<String>) -> Result<Expression, Error> {
    match function.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(mathexpr::parse(text)?),
        _ => Err(InputError::MissingField("function").into()),
    }
}

/// Request overrides on top of the configured stopping rule.
fn criteria(
    tolerance: &Option<Numeric>,
    max_iterations: &Option<Numeric>,
    cfg: &Config,
) -> Result<Criteria, InputError> {
    let mut criteria = cfg.criteria();
    if let Some(tolerance) = optional(tolerance, "tolerance")? {
        criteria.tolerance = tolerance;
    }
    if let Some(cap) = optional(max_iterations, "max_iterations")? {
        if !(cap.is_finite() && cap >= 1.0 && cap.fract() == 0.0) {
            return Err(InputError::InvalidMaxIter(cap));
        }
        if cap > cfg.max_iterations_limit as f64 {
            return Err(InputError::MaxIterTooLarge { value: cap, limit: cfg.max_iterations_limit });
        }
        criteria.max_iterations = cap as usize;
    }
    criteria.validate()
}

#[derive(Debug, Deserialize)]
struct BisectionRequest {
    function: Option<String>,
    a: Option<Numeric>,
    b: Option<Numeric>,
    tolerance: Option<Numeric>,
    max_iterations: Option<Numeric>,
}

fn run_bisection(req: BisectionRequest, cfg: &Config) -> Result<Value, Error> {
    let expr = expression(&req.function)?;
    let a = required(&req.a, "a")?;
    let b = required(&req.b, "b")?;
    let criteria = criteria(&req.tolerance, &req.max_iterations, cfg)?;
    let report = bisection(&expr, a, b, criteria)?;
    Ok(json!({
        "root": report.root,
        "iterations": report.iterations,
        "converged": report.converged,
        "formula": BISECTION_FORMULA,
        "steps": report.steps,
    }))
}

#[derive(Debug, Deserialize)]
struct NewtonRequest {
    function: Option<String>,
    x0: Option<Numeric>,
    tolerance: Option<Numeric>,
    max_iterations: Option<Numeric>,
}

fn run_newton(req: NewtonRequest, cfg: &Config) -> Result<Value, Error> {
    let expr = expression(&req.function)?;
    let x0 = required(&req.x0, "x0")?;
    let criteria = criteria(&req.tolerance, &req.max_iterations, cfg)?;
    let report = newton_raphson(&expr, x0, criteria)?;
    Ok(json!({
        "root": report.root,
        "iterations": report.iterations,
        "formula": NEWTON_FORMULA,
        "steps": report.steps,
    }))
}

#[derive(Debug, Deserialize)]
struct DifferencesRequest {
    function: Option<String>,
    x_value: Option<Numeric>,
    h: Option<Numeric>,
    x_values: Option<Vec<Numeric>>,
    y_values: Option<Vec<Numeric>>,
}

/// Function mode when `function` is given, data mode otherwise.
fn run_differences(req: DifferencesRequest, cfg: &Config) -> Result<Value, Error> {
    let has_function = req.function.as_deref().map_or(false, |f| !f.trim().is_empty());
    if has_function {
        let expr = expression(&req.function)?;
        let x = required(&req.x_value, "x_value")?;
        let h = optional(&req.h, "h")?.unwrap_or(cfg.step);
        let result = function_differences(&expr, x, h)?;
        return Ok(json!(result));
    }
    if req.x_values.is_none() && req.y_values.is_none() {
        return Err(InputError::Malformed(
            "provide either 'function' or 'x_values' and 'y_values'".to_string(),
        )
        .into());
    }
    let xs = values(&req.x_values, "x_values")?;
    let ys = values(&req.y_values, "y_values")?;
    let h = optional(&req.h, "h")?;
    let result = data_differences(&xs, &ys, h, &cfg.spacing())?;
    Ok(json!({
        "h": result.h,
        "results": result.results,
        "formulas": {
            "forward": FORWARD_FORMULA,
            "backward": BACKWARD_FORMULA,
            "central": CENTRAL_FORMULA,
        },
    }))
}

#[derive(Debug, Deserialize)]
struct InterpolationRequest {
    x_values: Option<Vec<Numeric>>,
    y_values: Option<Vec<Numeric>>,
    x_target: Option<Numeric>,
}

fn run_interpolation(req: InterpolationRequest, cfg: &Config) -> Result<Value, Error> {
    let xs = values(&req.x_values, "x_values")?;
    let ys = values(&req.y_values, "y_values")?;
    let x_target = required(&req.x_target, "x_target")?;
    let r = newton_forward(&xs, &ys, x_target, &cfg.spacing())?;
    Ok(json!({
        "interpolated_value": r.interpolated_value,
        "first_derivative": r.first_derivative,
        "second_derivative": r.second_derivative,
        "x_target": r.x_target,
        "u": r.u,
        "h": r.h,
        "difference_table": r.difference_table,
        "formulas": {
            "interpolation": INTERPOLATION_FORMULA,
            "first_derivative": FIRST_DERIVATIVE_FORMULA,
            "second_derivative": SECOND_DERIVATIVE_FORMULA,
        },
    }))
}

#[derive(Debug, Deserialize)]
struct ErrorRequest {
    true_value: Option<Numeric>,
    approximate_value: Option<Numeric>,
}

fn run_error(req: ErrorRequest) -> Result<Value, Error> {
    let true_value = required(&req.true_value, "true_value")?;
    let approximate = required(&req.approximate_value, "approximate_value")?;
    let m = error_metrics(true_value, approximate);
    Ok(json!({
        "absolute_error": m.absolute_error,
        "relative_error": m.relative_error,
        "percentage_error": m.percentage_error,
        "formulas": {
            "absolute": ABSOLUTE_FORMULA,
            "relative": RELATIVE_FORMULA,
            "percentage": PERCENTAGE_FORMULA,
        },
    }))
}
