//! Error types for the calculation engine and data loaders

use thiserror::Error;

/// Result type returned by every engine calculation
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised synchronously by the calculation engine.
///
/// No partial result is ever returned alongside one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Non-positive price/rent/investment, out-of-range percentage, non-finite value
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Which input was rejected and why
        reason: String,
    },

    /// Financing term of zero years
    #[error("Invalid term: {term_years} years (must be at least 1)")]
    InvalidTerm {
        /// The rejected term
        term_years: u32,
    },

    /// IRR could not be found (no sign change, flat derivative, divergence)
    #[error("IRR did not converge after {iterations} iterations: {reason}")]
    NoConvergence {
        /// Iterations spent before giving up
        iterations: u32,
        /// Failure description
        reason: String,
    },
}

impl EngineError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn no_convergence(iterations: u32, reason: impl Into<String>) -> Self {
        Self::NoConvergence {
            iterations,
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading property catalogs or preference files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row parsed but its contents are unusable
    #[error("Record {line}: {reason}")]
    Record { line: u64, reason: String },
}

/// Reject NaN and infinities
pub(crate) fn ensure_finite(name: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::invalid_input(format!("{name} must be finite, got {value}")))
    }
}

/// Require a finite value strictly greater than zero
pub(crate) fn ensure_positive(name: &str, value: f64) -> EngineResult<f64> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::invalid_input(format!("{name} must be positive, got {value}")))
    }
}

/// Require a finite value greater than or equal to zero
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> EngineResult<f64> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(EngineError::invalid_input(format!("{name} must not be negative, got {value}")))
    }
}

/// Require a finite percentage in [0, 100]
pub(crate) fn ensure_percent(name: &str, value: f64) -> EngineResult<f64> {
    ensure_finite(name, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(EngineError::invalid_input(format!(
            "{name} must be between 0 and 100 percent, got {value}"
        )));
    }
    Ok(value)
}

/// Growth rates may be negative but not wipe out the base
pub(crate) fn ensure_growth_rate(name: &str, percent: f64) -> EngineResult<f64> {
    ensure_finite(name, percent)?;
    if percent <= -100.0 {
        return Err(EngineError::invalid_input(format!(
            "{name} must be above -100 percent, got {percent}"
        )));
    }
    Ok(percent)
}
