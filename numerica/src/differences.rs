//! Forward, backward and central difference estimates of f'(x), either from
//! a formula or from equally spaced samples.

use log::debug;
use mathexpr::Expression;
use serde::Serialize;

use crate::data::{check_points, Spacing};
use crate::error::{finite, Error, InputError};
use crate::findroot::eval_at;

pub const FORWARD_FORMULA: &str = "f'(x) ≈ (f(x+h) - f(x)) / h";
pub const BACKWARD_FORMULA: &str = "f'(x) ≈ (f(x) - f(x-h)) / h";
pub const CENTRAL_FORMULA: &str = "f'(x) ≈ (f(x+h) - f(x-h)) / (2h)";

/// The reference derivative is a central difference at `h * REFERENCE_STEP_RATIO`.
/// It stands in for the exact derivative, it is still an approximation.
pub const REFERENCE_STEP_RATIO: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub formula: &'static str,
    pub value: f64,
    pub error: f64,
}

impl Estimate {
    fn new(formula: &'static str, value: f64, reference: f64) -> Self {
        Estimate { formula, value, error: (reference - value).abs() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDifferences {
    pub function: String,
    pub x: f64,
    pub h: f64,
    pub true_derivative: f64,
    pub forward: Estimate,
    pub backward: Estimate,
    pub central: Estimate,
}

/// All three difference quotients of `expr` at `x` with step `h`, each with
/// its distance to the fine-step reference derivative.
pub fn function_differences(expr: &Expression, x: f64, h: f64) -> Result<FunctionDifferences, Error> {
    let x = finite("x_value", x)?;
    if !(h.is_finite() && h > 0.0) {
        return Err(InputError::InvalidStep(h).into());
    }
    debug!("finite differences of '{}' at x = {} with h = {}", expr, x, h);

    let f_x = eval_at(expr, x)?;
    let f_right = eval_at(expr, x + h)?;
    let f_left = eval_at(expr, x - h)?;

    let fine = h * REFERENCE_STEP_RATIO;
    let reference = (eval_at(expr, x + fine)? - eval_at(expr, x - fine)?) / (2.0 * fine);

    Ok(FunctionDifferences {
        function: expr.source().to_string(),
        x,
        h,
        true_derivative: reference,
        forward: Estimate::new(FORWARD_FORMULA, (f_right - f_x) / h, reference),
        backward: Estimate::new(BACKWARD_FORMULA, (f_x - f_left) / h, reference),
        central: Estimate::new(CENTRAL_FORMULA, (f_right - f_left) / (2.0 * h), reference),
    })
}

/// Estimates at one sample, `None` where a needed neighbour is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointDifferences {
    pub x: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backward: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub central: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataDifferences {
    pub h: f64,
    pub results: Vec<PointDifferences>,
}

/// Difference quotients at every sample of `(xs, ys)`.
///
/// Without an explicit `h` the step is inferred from `xs`, which must then
/// be equally spaced (a lone sample gets `h = 1`). Every sample is reported;
/// the first has no backward or central value, the last no forward or central.
pub fn data_differences(
    xs: &[f64],
    ys: &[f64],
    h: Option<f64>,
    spacing: &Spacing,
) -> Result<DataDifferences, Error> {
    check_points(xs, ys)?;
    let h = match h {
        Some(h) if h.is_finite() && h != 0.0 => h,
        Some(h) => return Err(InputError::InvalidStep(h).into()),
        None if xs.len() == 1 => 1.0,
        None => spacing.uniform_step(xs)?,
    };
    debug!("finite differences over {} samples with h = {}", xs.len(), h);

    let n = ys.len();
    let results = (0..n)
        .map(|i| {
            let right = (i + 1 < n).then(|| ys[i + 1]);
            let left = (i > 0).then(|| ys[i - 1]);
            PointDifferences {
                x: xs[i],
                forward: right.map(|r| (r - ys[i]) / h),
                backward: left.map(|l| (ys[i] - l) / h),
                central: left.zip(right).map(|(l, r)| (r - l) / (2.0 * h)),
            }
        })
        .collect();
    Ok(DataDifferences { h, results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathexpr::parse;
    use std::f64::consts::E;

    #[test]
    fn exp_at_one() {
        let expr = parse("exp(x)").unwrap();
        let d = function_differences(&expr, 1.0, 0.1).unwrap();
        assert_eq!(d.function, "exp(x)");
        assert!((d.true_derivative - E).abs() < 1e-6);
        assert!((d.central.value - E).abs() < 1e-2);
        // forward/backward are O(h), central O(h^2)
        assert!(d.forward.value > E && d.backward.value < E);
        assert!(d.forward.error > 0.1 && d.forward.error < 0.2);
        assert!(d.backward.error > 0.1 && d.backward.error < 0.2);
        assert!(d.central.error < 0.01);
        assert!(d.central.error * 10.0 < d.forward.error);
        assert_eq!(d.forward.formula, FORWARD_FORMULA);
    }

    #[test]
    fn central_error_shrinks_quadratically() {
        let expr = parse("sin(x)").unwrap();
        let coarse = function_differences(&expr, 0.7, 0.1).unwrap();
        let fine = function_differences(&expr, 0.7, 0.05).unwrap();
        let ratio = coarse.central.error / fine.central.error;
        assert!(ratio > 3.5 && ratio < 4.5, "ratio {}", ratio);
        let ratio = coarse.forward.error / fine.forward.error;
        assert!(ratio > 1.7 && ratio < 2.3, "ratio {}", ratio);
    }

    #[test]
    fn function_mode_validation() {
        let expr = parse("x").unwrap();
        assert_eq!(
            function_differences(&expr, 1.0, 0.0),
            Err(InputError::InvalidStep(0.0).into())
        );
        assert_eq!(
            function_differences(&expr, 1.0, -0.1),
            Err(InputError::InvalidStep(-0.1).into())
        );
        let expr = parse("sqrt(x)").unwrap();
        assert!(matches!(
            function_differences(&expr, 0.0, 0.1),
            Err(Error::Evaluation { .. })
        ));
    }

    #[test]
    fn data_mode_marks_missing_neighbours() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.0, 4.0, 9.0];
        let d = data_differences(&xs, &ys, None, &Spacing::default()).unwrap();
        assert_eq!(d.h, 1.0);
        assert_eq!(d.results.len(), 4);
        assert_eq!(d.results[0], PointDifferences {
            x: 0.0, forward: Some(1.0), backward: None, central: None,
        });
        assert_eq!(d.results[1], PointDifferences {
            x: 1.0, forward: Some(3.0), backward: Some(1.0), central: Some(2.0),
        });
        assert_eq!(d.results[3], PointDifferences {
            x: 3.0, forward: None, backward: Some(5.0), central: None,
        });
    }

    #[test]
    fn data_mode_step_handling() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 1.0, 9.0];
        assert!(matches!(
            data_differences(&xs, &ys, None, &Spacing::default()),
            Err(Error::UnequalSpacing { .. })
        ));
        // an explicit step is taken as given
        let d = data_differences(&xs, &ys, Some(2.0), &Spacing::default()).unwrap();
        assert_eq!(d.results[1].central, Some(2.25));

        let single = data_differences(&[5.0], &[25.0], None, &Spacing::default()).unwrap();
        assert_eq!(single.h, 1.0);
        assert_eq!(single.results[0].forward, None);
        assert_eq!(single.results[0].backward, None);
    }

    #[test]
    fn data_mode_validation() {
        assert_eq!(
            data_differences(&[0.0, 1.0], &[1.0], None, &Spacing::default()),
            Err(InputError::LengthMismatch { x_len: 2, y_len: 1 }.into())
        );
        assert_eq!(
            data_differences(&[], &[], None, &Spacing::default()),
            Err(InputError::Empty("x_values").into())
        );
        assert_eq!(
            data_differences(&[0.0, 1.0], &[1.0, 2.0], Some(0.0), &Spacing::default()),
            Err(InputError::InvalidStep(0.0).into())
        );
    }
}
