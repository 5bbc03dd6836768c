//! Run configuration
//!
//! A run is described by a YAML document:
//!
//! ```yaml
//! portfolio:
//!   returns_file: returns.json
//!   weights: [0.4, 0.2, 0.2, 0.2]
//! risk:
//!   confidence_level: 0.95
//!   horizon_days: 1
//!   simulations: 10000
//!   seed: 42
//! scenarios:
//!   - name: Normal
//!     stress_factor: 1.0
//!   - name: Major_Crisis
//!     stress_factor: 3.0
//! ```
//!
//! Everything under `risk` is optional, and `scenarios` defaults to the
//! standard catalog.

use crate::data::JsonFileProvider;
use crate::error::{validate_confidence, RiskError, Result};
use crate::estimator::{EstimatorConfig, MonteCarloParams};
use crate::stress::StressCatalog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Portfolio composition and data source
    pub portfolio: PortfolioSettings,

    /// Estimation settings
    #[serde(default)]
    pub risk: RiskSettings,

    /// Stress scenarios for Monte Carlo, in run order
    #[serde(default)]
    pub scenarios: StressCatalog,
}

/// Portfolio composition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSettings {
    /// JSON file of asset series, relative to the config file
    pub returns_file: PathBuf,

    /// One weight per asset, in file order
    pub weights: Vec<f64>,
}

/// Estimation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSettings {
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,

    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,

    #[serde(default = "default_simulations")]
    pub simulations: usize,

    /// Base seed for Monte Carlo; omit for an entropy-seeded run
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RiskSettings {
    /// Check ranges before any data is loaded
    pub fn validate(&self) -> Result<()> {
        validate_confidence(self.confidence_level)?;
        if self.horizon_days == 0 {
            return Err(RiskError::InvalidTimeHorizon(self.horizon_days));
        }
        if self.simulations == 0 {
            return Err(RiskError::InvalidParameter(
                "simulations must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn estimator_config(&self) -> EstimatorConfig {
        EstimatorConfig {
            default_simulations: self.simulations,
            random_seed: self.seed,
        }
    }

    /// Unstressed Monte Carlo parameters for these settings
    pub fn monte_carlo_params(&self) -> MonteCarloParams {
        MonteCarloParams {
            sims: self.simulations,
            days: self.horizon_days,
            confidence_level: self.confidence_level,
            stress_factor: 1.0,
        }
    }
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            confidence_level: default_confidence_level(),
            horizon_days: default_horizon_days(),
            simulations: default_simulations(),
            seed: None,
        }
    }
}

// Default value functions
fn default_confidence_level() -> f64 {
    0.95
}

fn default_horizon_days() -> u32 {
    1
}

fn default_simulations() -> usize {
    10_000
}

impl RunConfig {
    /// Load configuration from a YAML file
    ///
    /// A relative `returns_file` is resolved against the file's directory.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        if config.portfolio.returns_file.is_relative() {
            if let Some(base) = path.parent() {
                config.portfolio.returns_file = base.join(&config.portfolio.returns_file);
            }
        }

        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: RunConfig = serde_yaml::from_str(yaml)?;
        config.risk.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Provider for the configured returns file
    pub fn provider(&self) -> JsonFileProvider {
        JsonFileProvider::new(&self.portfolio.returns_file)
    }
}
