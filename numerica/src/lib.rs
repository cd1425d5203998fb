//! Numerical methods that explain themselves: every result carries the
//! step trace or difference table it was computed from.

mod error;
pub use error::{Error, InputError};

mod config;
pub use config::{Config, ConfigError, CONFIG_PATH_VAR};

mod data;
pub use data::{check_points, Spacing};

mod findroot;
pub use findroot::{
    bisection, derivative, newton_raphson, BisectionReport, BisectionStep, Criteria, NewtonReport,
    NewtonStep,
};

mod differences;
pub use differences::{
    data_differences, function_differences, DataDifferences, Estimate, FunctionDifferences,
    PointDifferences,
};

mod interpolate;
pub use interpolate::{forward_series, newton_forward, DifferenceTable, Interpolation, TableRow};

mod errorcalc;
pub use errorcalc::{error_metrics, ErrorMetrics};

mod api;
pub use api::{handle, Endpoint, Response};
