//! Portfolio aggregation
//!
//! Combines per-asset return series into a single weighted portfolio return
//! series and derives annualised performance from it:
//! - Portfolio return per period: r_p,t = Σ_i w_i · r_i,t
//! - Annualised mean: μ = mean(r_p) · 252
//! - Annualised volatility: σ = s(r_p) · √252, with s the sample (n - 1)
//!   standard deviation
//!
//! Weights are used exactly as given. They are not required to sum to 1 and
//! are never normalised; a weight vector summing to k scales every portfolio
//! return, and every downstream VaR/CVaR, by k. Keeping them meaningful is the
//! caller's responsibility.

use crate::error::{RiskError, Result};
use crate::stats;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Trading periods per year used for annualisation
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Aligned per-period returns for a set of assets
///
/// Rows are periods, columns are assets. Every asset shares the same period
/// index; alignment of the underlying dates is the provider's job.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnMatrix {
    assets: Vec<String>,
    data: DMatrix<f64>,
}

impl ReturnMatrix {
    /// Build a matrix from `(asset, returns)` columns in the given order
    pub fn from_columns<S, I>(columns: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<f64>)>,
    {
        let mut assets = Vec::new();
        let mut series: Vec<Vec<f64>> = Vec::new();

        for (asset, returns) in columns {
            let asset = asset.into();
            if assets.contains(&asset) {
                return Err(RiskError::InvalidParameter(format!(
                    "Duplicate asset identifier: {}",
                    asset
                )));
            }
            assets.push(asset);
            series.push(returns);
        }

        let Some(first) = series.first() else {
            return Err(RiskError::InsufficientData(
                "Return matrix has no assets".to_string(),
            ));
        };
        let periods = first.len();

        if periods == 0 {
            return Err(RiskError::InsufficientData(
                "Return matrix has no periods".to_string(),
            ));
        }

        for (asset, returns) in assets.iter().zip(series.iter()) {
            if returns.len() != periods {
                return Err(RiskError::ShapeMismatch {
                    context: format!("return series for {}", asset),
                    expected: periods,
                    actual: returns.len(),
                });
            }
            if let Some(bad) = returns.iter().find(|r| !r.is_finite()) {
                return Err(RiskError::InvalidParameter(format!(
                    "Non-finite return {} for asset {}",
                    bad, asset
                )));
            }
        }

        let data = DMatrix::from_fn(periods, assets.len(), |t, i| series[i][t]);

        Ok(Self { assets, data })
    }

    /// Asset identifiers in column order
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn num_assets(&self) -> usize {
        self.data.ncols()
    }

    pub fn num_periods(&self) -> usize {
        self.data.nrows()
    }

    /// Returns of a single asset, by column position
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.num_assets()).then(|| self.data.column(index).iter().copied().collect())
    }
}

/// Annualised portfolio performance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Annualised mean return (μ)
    pub annual_return: f64,

    /// Annualised volatility (σ)
    pub annual_volatility: f64,
}

/// Weighted portfolio built from a return matrix and a weight vector
///
/// The portfolio return series is computed once at construction and is
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct PortfolioAggregator {
    matrix: ReturnMatrix,
    weights: Vec<f64>,
    weighted_returns: Vec<f64>,
}

impl PortfolioAggregator {
    /// Create an aggregator, failing if the weight count differs from the
    /// asset count
    pub fn new(matrix: ReturnMatrix, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != matrix.num_assets() {
            return Err(RiskError::ShapeMismatch {
                context: "weight vector".to_string(),
                expected: matrix.num_assets(),
                actual: weights.len(),
            });
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite()) {
            return Err(RiskError::InvalidParameter(format!(
                "Non-finite portfolio weight {}",
                bad
            )));
        }

        let weight_sum: f64 = weights.iter().sum();
        if (weight_sum - 1.0).abs() > 1e-9 {
            tracing::warn!(
                weight_sum,
                "Portfolio weights do not sum to 1; returns are scaled accordingly"
            );
        }

        // r_p = R · w
        let w = DVector::from_column_slice(&weights);
        let weighted_returns = (&matrix.data * &w).iter().copied().collect();

        tracing::debug!(
            assets = matrix.num_assets(),
            periods = matrix.num_periods(),
            "Aggregated portfolio returns"
        );

        Ok(Self {
            matrix,
            weights,
            weighted_returns,
        })
    }

    /// Portfolio return per period, in period order
    pub fn weighted_returns(&self) -> &[f64] {
        &self.weighted_returns
    }

    /// Annualised mean return and volatility of the portfolio series
    pub fn performance(&self) -> Result<PerformanceSummary> {
        let mean = stats::mean(&self.weighted_returns).ok_or_else(|| {
            RiskError::InsufficientData("Portfolio return series is empty".to_string())
        })?;
        let std = stats::sample_std(&self.weighted_returns)?;

        Ok(PerformanceSummary {
            annual_return: mean * TRADING_DAYS_PER_YEAR,
            annual_volatility: std * TRADING_DAYS_PER_YEAR.sqrt(),
        })
    }

    pub fn assets(&self) -> &[String] {
        self.matrix.assets()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Sum of the weights, reported but never enforced
    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn num_periods(&self) -> usize {
        self.matrix.num_periods()
    }

    pub fn return_matrix(&self) -> &ReturnMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_matrix() -> ReturnMatrix {
        ReturnMatrix::from_columns(vec![
            ("AAPL", vec![0.01, -0.02, 0.03, 0.00]),
            ("TLT", vec![0.02, 0.01, -0.01, 0.00]),
        ])
        .unwrap()
    }

    #[test]
    fn test_weighted_returns() {
        let aggregator = PortfolioAggregator::new(create_test_matrix(), vec![0.5, 0.5]).unwrap();

        let expected = [0.015, -0.005, 0.01, 0.0];
        let actual = aggregator.weighted_returns();
        assert_eq!(actual.len(), 4);
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *e, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_weights_are_not_normalised() {
        let unit = PortfolioAggregator::new(create_test_matrix(), vec![0.5, 0.5]).unwrap();
        let doubled = PortfolioAggregator::new(create_test_matrix(), vec![1.0, 1.0]).unwrap();

        assert_relative_eq!(doubled.weight_sum(), 2.0);
        for (u, d) in unit.weighted_returns().iter().zip(doubled.weighted_returns()) {
            assert_relative_eq!(*d, 2.0 * u, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_performance_annualisation() {
        let matrix = ReturnMatrix::from_columns(vec![("SPY", vec![0.01, -0.01, 0.02, 0.0])]).unwrap();
        let aggregator = PortfolioAggregator::new(matrix, vec![1.0]).unwrap();

        let perf = aggregator.performance().unwrap();

        // mean = 0.005, sample variance = 0.0005 / 3
        assert_relative_eq!(perf.annual_return, 0.005 * 252.0, epsilon = 1e-12);
        assert_relative_eq!(
            perf.annual_volatility,
            (0.0005_f64 / 3.0).sqrt() * 252.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_weight_length_mismatch() {
        let result = PortfolioAggregator::new(create_test_matrix(), vec![1.0]);
        assert!(matches!(
            result,
            Err(RiskError::ShapeMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_unequal_series_lengths() {
        let result = ReturnMatrix::from_columns(vec![
            ("AAPL", vec![0.01, 0.02, 0.03]),
            ("JPM", vec![0.01, 0.02]),
        ]);
        assert!(matches!(
            result,
            Err(RiskError::ShapeMismatch { expected: 3, actual: 2, .. })
        ));
    }

    #[test]
    fn test_empty_and_invalid_matrices() {
        let empty: Vec<(String, Vec<f64>)> = Vec::new();
        assert!(matches!(
            ReturnMatrix::from_columns(empty),
            Err(RiskError::InsufficientData(_))
        ));
        assert!(ReturnMatrix::from_columns(vec![("A", Vec::new())]).is_err());
        assert!(ReturnMatrix::from_columns(vec![("A", vec![0.01, f64::NAN])]).is_err());
        assert!(ReturnMatrix::from_columns(vec![("A", vec![0.01]), ("A", vec![0.02])]).is_err());
    }

    #[test]
    fn test_performance_needs_two_periods() {
        let matrix = ReturnMatrix::from_columns(vec![("A", vec![0.01])]).unwrap();
        let aggregator = PortfolioAggregator::new(matrix, vec![1.0]).unwrap();

        assert_eq!(aggregator.weighted_returns(), &[0.01]);
        assert!(matches!(
            aggregator.performance(),
            Err(RiskError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_matrix_accessors() {
        let matrix = create_test_matrix();
        assert_eq!(matrix.assets(), &["AAPL".to_string(), "TLT".to_string()]);
        assert_eq!(matrix.num_periods(), 4);
        assert_eq!(matrix.column(1).unwrap(), vec![0.02, 0.01, -0.01, 0.00]);
        assert!(matrix.column(2).is_none());
    }
}
