//! Defaults applied when a request leaves a parameter out.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. JSON file named by `NUMCALC_CONFIG`
//! 3. `NUMCALC_TOLERANCE`, `NUMCALC_MAX_ITERATIONS`, `NUMCALC_STEP`

use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::Spacing;
use crate::findroot::Criteria;

pub const CONFIG_PATH_VAR: &str = "NUMCALC_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path:?}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root-finder stopping threshold
    pub tolerance: f64,
    /// Root-finder iteration cap
    pub max_iterations: usize,
    /// Largest cap a request may ask for
    pub max_iterations_limit: usize,
    /// Finite-difference step in function mode
    pub step: f64,
    /// Relative slack allowed between consecutive x spacings
    pub spacing_rtol: f64,
    /// Absolute slack allowed between consecutive x spacings
    pub spacing_atol: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tolerance: 1e-6,
            max_iterations: 100,
            max_iterations_limit: 10_000,
            step: 0.1,
            spacing_rtol: 1e-5,
            spacing_atol: 1e-8,
        }
    }
}

fn env_override<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Defaults, then the optional config file, then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match env::var_os(CONFIG_PATH_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                debug!("loading config from {:?}", path);
                let text = fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
                serde_json::from_str::<Config>(&text)?
            }
            None => Config::default(),
        };
        if let Some(tolerance) = env_override("NUMCALC_TOLERANCE")? {
            cfg.tolerance = tolerance;
        }
        if let Some(max_iterations) = env_override("NUMCALC_MAX_ITERATIONS")? {
            cfg.max_iterations = max_iterations;
        }
        if let Some(step) = env_override("NUMCALC_STEP")? {
            cfg.step = step;
        }
        cfg.validate()
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Config>(text)?.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be finite and > 0, got {}", name, v)))
            }
        };
        positive("tolerance", self.tolerance)?;
        positive("step", self.step)?;
        if self.max_iterations == 0 || self.max_iterations > self.max_iterations_limit {
            return Err(ConfigError::Invalid(format!(
                "max_iterations must be in 1..={}, got {}",
                self.max_iterations_limit, self.max_iterations
            )));
        }
        if !(self.spacing_rtol >= 0.0 && self.spacing_atol >= 0.0) {
            return Err(ConfigError::Invalid("spacing tolerances must be >= 0".to_string()));
        }
        Ok(self)
    }

    pub fn criteria(&self) -> Criteria {
        Criteria { tolerance: self.tolerance, max_iterations: self.max_iterations }
    }

    pub fn spacing(&self) -> Spacing {
        Spacing { rtol: self.spacing_rtol, atol: self.spacing_atol }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{"tolerance": 1e-9}"#).unwrap();
        assert_eq!(cfg.tolerance, 1e-9);
        assert_eq!(cfg.max_iterations, 100);
        assert_eq!(cfg.step, 0.1);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_json(r#"{"tolerance": -1}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"max_iterations": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"max_iterations": 500, "max_iterations_limit": 200}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"tolerence": 1e-3}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn defaults_feed_methods() {
        let cfg = Config::default();
        assert_eq!(cfg.criteria(), Criteria::default());
        assert_eq!(cfg.spacing(), Spacing::default());
    }
}
