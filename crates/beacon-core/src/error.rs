//! Error type for the Beacon workspace
//!
//! [`BeaconError`] covers the failures of the domain layer: reporting windows
//! that cannot exist and configuration values that cannot be used. The
//! forecasting pipeline itself is total and never produces one of these.
//!
//! # Example
//!
//! ```
//! use beacon_core::{BeaconError, ReportingWindow};
//! use chrono::NaiveDate;
//!
//! let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
//! let err = ReportingWindow::last_days(end, 0).unwrap_err();
//! assert!(matches!(err, BeaconError::Validation(_)));
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BeaconError {
    /// Domain values that violate an invariant (inverted or unrepresentable windows)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unusable configuration values
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using BeaconError.
pub type BeaconResult<T> = Result<T, BeaconError>;
