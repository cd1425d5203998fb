//! Newton forward-difference interpolation on equally spaced samples.
//!
//! With `u = (x - x_0) / h` the interpolant is
//!
//! ```text
//! P(u) = Σ_{k=0}^{n-1} C(u, k) Δ^k y_0,   C(u, k) = u(u-1)...(u-k+1) / k!
//! ```
//!
//! Derivatives come from differentiating each `C(u, k)` exactly and applying
//! `d/dx = (1/h) d/du`.

use log::{debug, warn};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::data::{check_points, Spacing};
use crate::error::{finite, Error};

pub const INTERPOLATION_FORMULA: &str = "f(x) = f(x₀) + uΔf(x₀) + u(u-1)/2! Δ²f(x₀) + ...";
pub const FIRST_DERIVATIVE_FORMULA: &str = "f'(x) = (1/h)[Δf₀ + (2u-1)/2 Δ²f₀ + ...]";
pub const SECOND_DERIVATIVE_FORMULA: &str = "f''(x) = (1/h²)[Δ²f₀ + (u-1) Δ³f₀ + ...]";

/// Triangular table of forward differences, `rows[i][k] = Δ^k y_i` for
/// `i + k < n`.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceTable {
    rows: Vec<Vec<f64>>,
}

impl DifferenceTable {
    pub fn new(ys: &[f64]) -> Self {
        let n = ys.len();
        let mut rows: Vec<Vec<f64>> = ys.iter().map(|&y| vec![y]).collect();
        for k in 1..n {
            for i in 0..n - k {
                let delta = rows[i + 1][k - 1] - rows[i][k - 1];
                rows[i].push(delta);
            }
        }
        DifferenceTable { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `Δ^k y_i`, absent outside the triangle.
    pub fn get(&self, i: usize, k: usize) -> Option<f64> {
        self.rows.get(i).and_then(|row| row.get(k)).copied()
    }

    /// `Δ^k y_0` for every order k, the coefficients of the series.
    pub fn leading(&self) -> &[f64] {
        self.rows.first().map(|row| row.as_slice()).unwrap_or(&[])
    }

    pub fn row(&self, i: usize) -> &[f64] {
        self.rows.get(i).map(|row| row.as_slice()).unwrap_or(&[])
    }
}

/// Value, first and second u-derivative of `Σ C(u, k) leading[k]`.
pub fn forward_series(leading: &[f64], u: f64) -> (f64, f64, f64) {
    // C(u,k) and its first two derivatives built by the product rule
    let (mut c, mut dc, mut d2c) = (1.0, 0.0, 0.0);
    let (mut value, mut first, mut second) = (0.0, 0.0, 0.0);
    for (k, delta) in leading.iter().enumerate() {
        if k > 0 {
            let m = u - (k - 1) as f64;
            let kf = k as f64;
            d2c = (d2c * m + 2.0 * dc) / kf;
            dc = (dc * m + c) / kf;
            c = c * m / kf;
        }
        value += c * delta;
        first += dc * delta;
        second += d2c * delta;
    }
    (value, first, second)
}

/// One line of the rendered table: `{"x": x_i, "Δ^0y": y_i, "Δ^1y": ..}`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub x: f64,
    pub differences: Vec<f64>,
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.differences.len() + 1))?;
        map.serialize_entry("x", &self.x)?;
        for (k, delta) in self.differences.iter().enumerate() {
            map.serialize_entry(&format!("Δ^{}y", k), delta)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Interpolation {
    pub interpolated_value: f64,
    pub first_derivative: f64,
    pub second_derivative: f64,
    pub x_target: f64,
    pub u: f64,
    pub h: f64,
    pub difference_table: Vec<TableRow>,
}

/// Newton forward-difference interpolation of `(xs, ys)` at `x_target`.
///
/// `xs` must hold at least two equally spaced points. Targets outside
/// `[x_0, x_{n-1}]` are extrapolated without complaint, accuracy there is
/// the caller's concern.
pub fn newton_forward(
    xs: &[f64],
    ys: &[f64],
    x_target: f64,
    spacing: &Spacing,
) -> Result<Interpolation, Error> {
    check_points(xs, ys)?;
    let x_target = finite("x_target", x_target)?;
    let h = spacing.uniform_step(xs)?;

    let table = DifferenceTable::new(ys);
    let u = (x_target - xs[0]) / h;
    let (lo, hi) = (xs[0].min(xs[xs.len() - 1]), xs[0].max(xs[xs.len() - 1]));
    if x_target < lo || x_target > hi {
        warn!("x_target {} is outside [{}, {}], extrapolating", x_target, lo, hi);
    }
    debug!("newton forward over {} points at u = {}", xs.len(), u);

    let (value, du, d2u) = forward_series(table.leading(), u);
    let difference_table = xs
        .iter()
        .enumerate()
        .map(|(i, &x)| TableRow { x, differences: table.row(i).to_vec() })
        .collect();

    Ok(Interpolation {
        interpolated_value: value,
        first_derivative: du / h,
        second_derivative: d2u / (h * h),
        x_target,
        u,
        h,
        difference_table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;

    macro_rules! fuzzy_eq {
        ($lhs:expr, $rhs:expr) => { assert!(($lhs - $rhs).abs() < 1.0e-10, "{} != {}", $lhs, $rhs) }
    }

    const XS: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];
    const YS: [f64; 5] = [1.0, 2.0, 5.0, 10.0, 17.0];

    #[test]
    fn table_is_triangular() {
        let table = DifferenceTable::new(&YS);
        assert_eq!(table.len(), 5);
        assert_eq!(table.leading(), &[1.0, 1.0, 2.0, 0.0, 0.0]);
        assert_eq!(table.row(1), &[2.0, 3.0, 2.0, 0.0]);
        assert_eq!(table.row(4), &[17.0]);
        assert_eq!(table.get(2, 2), Some(2.0));
        assert_eq!(table.get(2, 3), None);
        assert_eq!(table.get(9, 0), None);
        for i in 0..5 {
            assert_eq!(table.row(i).len(), 5 - i);
        }
    }

    #[test]
    fn quadratic_target() {
        let r = newton_forward(&XS, &YS, 2.5, &Spacing::default()).unwrap();
        fuzzy_eq!(r.interpolated_value, 7.25);
        fuzzy_eq!(r.first_derivative, 5.0);
        fuzzy_eq!(r.second_derivative, 2.0);
        assert_eq!(r.u, 2.5);
        assert_eq!(r.h, 1.0);
        assert_eq!(r.difference_table.len(), 5);
        assert_eq!(r.difference_table[3], TableRow { x: 3.0, differences: vec![10.0, 7.0] });
    }

    #[test]
    fn reproduces_nodes() {
        for (&x, &y) in XS.iter().zip(YS.iter()) {
            let r = newton_forward(&XS, &YS, x, &Spacing::default()).unwrap();
            assert_eq!(r.interpolated_value, y);
        }
    }

    #[test]
    fn cubic_with_scaled_step() {
        // y = x^3 sampled at h = 0.5
        let xs = [1.0, 1.5, 2.0, 2.5];
        let ys: Vec<f64> = xs.iter().map(|x: &f64| x.powi(3)).collect();
        let r = newton_forward(&xs, &ys, 1.75, &Spacing::default()).unwrap();
        fuzzy_eq!(r.interpolated_value, 1.75f64.powi(3));
        fuzzy_eq!(r.first_derivative, 3.0 * 1.75 * 1.75);
        fuzzy_eq!(r.second_derivative, 6.0 * 1.75);
    }

    #[test]
    fn extrapolation_is_allowed() {
        let r = newton_forward(&XS, &YS, 6.0, &Spacing::default()).unwrap();
        fuzzy_eq!(r.interpolated_value, 37.0);
    }

    #[test]
    fn unequal_spacing_fails() {
        let xs = [0.0, 1.0, 3.0, 4.0];
        let ys = [1.0, 2.0, 10.0, 17.0];
        assert!(matches!(
            newton_forward(&xs, &ys, 2.0, &Spacing::default()),
            Err(Error::UnequalSpacing { .. })
        ));
    }

    #[test]
    fn input_validation() {
        assert_eq!(
            newton_forward(&[0.0, 1.0], &[1.0], 0.5, &Spacing::default()),
            Err(InputError::LengthMismatch { x_len: 2, y_len: 1 }.into())
        );
        assert_eq!(
            newton_forward(&[0.0], &[1.0], 0.5, &Spacing::default()),
            Err(InputError::InsufficientPoints { need: 2, got: 1 }.into())
        );
    }

    #[test]
    fn table_row_serializes_as_flat_map() {
        let row = TableRow { x: 1.0, differences: vec![2.0, 3.0] };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, serde_json::json!({"x": 1.0, "Δ^0y": 2.0, "Δ^1y": 3.0}));
    }
}
