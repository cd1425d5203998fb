//! Validation shared by the methods that work on sampled data.

use crate::error::{finite, Error, InputError};

/// How far consecutive spacings may drift from the first one and still
/// count as equal: `|d_i - h| <= atol + rtol * |h|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing { rtol: 1e-5, atol: 1e-8 }
    }
}

impl Spacing {
    /// The common step of `xs`, failing when consecutive spacings differ.
    pub fn uniform_step(&self, xs: &[f64]) -> Result<f64, Error> {
        if xs.len() < 2 {
            return Err(InputError::InsufficientPoints { need: 2, got: xs.len() }.into());
        }
        let h = xs[1] - xs[0];
        if h == 0.0 {
            return Err(InputError::DuplicateX { index: 1, x: xs[1] }.into());
        }
        for (index, pair) in xs.windows(2).enumerate().skip(1) {
            let got = pair[1] - pair[0];
            if (got - h).abs() > self.atol + self.rtol * h.abs() {
                return Err(Error::UnequalSpacing { index: index + 1, h, got });
            }
        }
        Ok(h)
    }
}

/// Both arrays non-empty, of equal length and finite.
pub fn check_points(xs: &[f64], ys: &[f64]) -> Result<(), InputError> {
    if xs.is_empty() {
        return Err(InputError::Empty("x_values"));
    }
    if ys.is_empty() {
        return Err(InputError::Empty("y_values"));
    }
    if xs.len() != ys.len() {
        return Err(InputError::LengthMismatch { x_len: xs.len(), y_len: ys.len() });
    }
    for &x in xs {
        finite("x_values", x)?;
    }
    for &y in ys {
        finite("y_values", y)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_step_accepts_float_noise() {
        let xs = [0.1, 0.2, 0.30000000000000004, 0.4];
        let h = Spacing::default().uniform_step(&xs).unwrap();
        assert!((h - 0.1).abs() < 1e-12);
        assert_eq!(Spacing::default().uniform_step(&[3.0, 2.0, 1.0]), Ok(-1.0));
    }

    #[test]
    fn uniform_step_rejects_gaps() {
        match Spacing::default().uniform_step(&[0.0, 1.0, 3.0, 4.0]) {
            Err(Error::UnequalSpacing { index, h, got }) => {
                assert_eq!(index, 2);
                assert_eq!(h, 1.0);
                assert_eq!(got, 2.0);
            }
            other => panic!("expected UnequalSpacing, got {:?}", other),
        }
        assert_eq!(
            Spacing::default().uniform_step(&[1.0, 1.0]),
            Err(InputError::DuplicateX { index: 1, x: 1.0 }.into())
        );
        assert_eq!(
            Spacing::default().uniform_step(&[1.0]),
            Err(InputError::InsufficientPoints { need: 2, got: 1 }.into())
        );
    }

    #[test]
    fn check_points_validates_shape() {
        assert_eq!(check_points(&[], &[]), Err(InputError::Empty("x_values")));
        assert_eq!(
            check_points(&[1.0, 2.0], &[1.0]),
            Err(InputError::LengthMismatch { x_len: 2, y_len: 1 })
        );
        assert!(check_points(&[1.0, f64::NAN], &[1.0, 2.0]).is_err());
        assert_eq!(check_points(&[1.0], &[2.0]), Ok(()));
    }
}
