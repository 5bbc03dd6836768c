//! Return series providers
//!
//! The estimators never fetch market data themselves. A provider hands over an
//! aligned [`ReturnMatrix`]; this module ships an in-memory provider, a JSON
//! file provider, and the price → simple-return conversion they share.

use crate::error::{RiskError, Result};
use crate::portfolio::ReturnMatrix;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source of aligned per-asset returns
pub trait ReturnSeriesProvider {
    fn load(&self) -> Result<ReturnMatrix>;
}

/// One asset's history, given either as returns or as prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetSeries {
    Returns { asset: String, returns: Vec<f64> },
    Prices { asset: String, prices: Vec<f64> },
}

impl AssetSeries {
    pub fn asset(&self) -> &str {
        match self {
            AssetSeries::Returns { asset, .. } | AssetSeries::Prices { asset, .. } => asset,
        }
    }

    /// Period returns, converting prices when needed
    pub fn to_returns(&self) -> Result<Vec<f64>> {
        match self {
            AssetSeries::Returns { returns, .. } => Ok(returns.clone()),
            AssetSeries::Prices { prices, .. } => simple_returns(prices),
        }
    }
}

/// Simple returns `p_t / p_{t-1} - 1`; the first period has no return and is
/// dropped
pub fn simple_returns(prices: &[f64]) -> Result<Vec<f64>> {
    if prices.len() < 2 {
        return Err(RiskError::InsufficientData(format!(
            "Need at least 2 prices to compute returns, got {}",
            prices.len()
        )));
    }
    if let Some(bad) = prices.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(RiskError::InvalidParameter(format!(
            "Prices must be positive and finite, got {}",
            bad
        )));
    }

    Ok(prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
}

fn build_matrix(series: &[AssetSeries]) -> Result<ReturnMatrix> {
    let columns = series
        .iter()
        .map(|s| -> Result<(String, Vec<f64>)> { Ok((s.asset().to_string(), s.to_returns()?)) })
        .collect::<Result<Vec<_>>>()?;
    ReturnMatrix::from_columns(columns)
}

/// Provider over series already held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: Vec<AssetSeries>,
}

impl InMemoryProvider {
    pub fn new(series: Vec<AssetSeries>) -> Self {
        Self { series }
    }

    /// Add an asset's returns, keeping insertion order
    pub fn with_returns(mut self, asset: impl Into<String>, returns: Vec<f64>) -> Self {
        self.series.push(AssetSeries::Returns {
            asset: asset.into(),
            returns,
        });
        self
    }

    /// Add an asset's prices, keeping insertion order
    pub fn with_prices(mut self, asset: impl Into<String>, prices: Vec<f64>) -> Self {
        self.series.push(AssetSeries::Prices {
            asset: asset.into(),
            prices,
        });
        self
    }
}

impl ReturnSeriesProvider for InMemoryProvider {
    fn load(&self) -> Result<ReturnMatrix> {
        build_matrix(&self.series)
    }
}

/// Provider reading a JSON array of asset series from disk
///
/// ```json
/// [
///   { "asset": "AAPL", "returns": [0.01, -0.02] },
///   { "asset": "TLT", "prices": [100.0, 101.0, 100.5] }
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReturnSeriesProvider for JsonFileProvider {
    fn load(&self) -> Result<ReturnMatrix> {
        let contents = std::fs::read_to_string(&self.path)?;
        let series: Vec<AssetSeries> = serde_json::from_str(&contents)?;

        tracing::info!(
            path = %self.path.display(),
            assets = series.len(),
            "Loaded return series"
        );

        build_matrix(&series)
    }
}
