//! Error types for tail-risk estimation

use thiserror::Error;

/// Errors that can occur while aggregating a portfolio or estimating VaR/CVaR
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Invalid confidence level: {0} (must be strictly between 0 and 1)")]
    InvalidConfidenceLevel(f64),

    /// Confidence level of exactly 1.0 leaves a zero tail probability
    #[error("Degenerate tail probability: confidence level 1.0 gives alpha = 0")]
    DegenerateAlpha,

    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("No tail observations at or below VaR for confidence level {confidence_level}")]
    EmptyTail { confidence_level: f64 },

    #[error("Invalid stress factor: {0} (must be finite and non-negative)")]
    InvalidStressFactor(f64),

    #[error("Invalid time horizon: {0} (must be positive)")]
    InvalidTimeHorizon(u32),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A concurrent scenario task panicked or was cancelled
    #[error("Scenario task failed: {0}")]
    TaskFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RiskError>;

/// Reject confidence levels outside the open interval (0, 1), NaN included
pub(crate) fn validate_confidence(confidence_level: f64) -> Result<()> {
    if confidence_level > 0.0 && confidence_level < 1.0 {
        Ok(())
    } else {
        Err(RiskError::InvalidConfidenceLevel(confidence_level))
    }
}

pub(crate) fn validate_stress_factor(stress_factor: f64) -> Result<()> {
    if stress_factor.is_finite() && stress_factor >= 0.0 {
        Ok(())
    } else {
        Err(RiskError::InvalidStressFactor(stress_factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bounds() {
        assert!(validate_confidence(0.95).is_ok());
        assert!(validate_confidence(0.5).is_ok());
        assert!(matches!(
            validate_confidence(0.0),
            Err(RiskError::InvalidConfidenceLevel(_))
        ));
        assert!(validate_confidence(1.0).is_err());
        assert!(validate_confidence(-0.1).is_err());
        assert!(validate_confidence(f64::NAN).is_err());
    }

    #[test]
    fn test_stress_factor_bounds() {
        assert!(validate_stress_factor(0.0).is_ok());
        assert!(validate_stress_factor(2.5).is_ok());
        assert!(validate_stress_factor(-0.5).is_err());
        assert!(validate_stress_factor(f64::INFINITY).is_err());
        assert!(validate_stress_factor(f64::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = RiskError::ShapeMismatch {
            context: "weight vector".to_string(),
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Shape mismatch in weight vector: expected 4, got 3"
        );

        let err = RiskError::EmptyTail { confidence_level: 0.99 };
        assert!(err.to_string().contains("0.99"));

        let err = RiskError::TaskFailed("task 2 panicked".to_string());
        assert_eq!(err.to_string(), "Scenario task failed: task 2 panicked");
    }
}
