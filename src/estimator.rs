//! Value at Risk (VaR) and Conditional VaR (CVaR) estimation
//!
//! Implements three independent methodologies over a weighted portfolio:
//! - Parametric VaR: normal assumption, VaR = |μ_h + σ_h · Φ⁻¹(α)|,
//!   CVaR = |μ_h − σ_h · φ(Φ⁻¹(α)) / α|
//! - Historical VaR: linear-interpolated α-percentile of realised returns
//! - Monte Carlo VaR: i.i.d. normal draws with stressed volatility
//!
//! Here α = 1 − confidence level and μ_h, σ_h are the annualised mean and
//! volatility scaled to the horizon. VaR and CVaR are positive loss fractions
//! of portfolio value.

use crate::error::{validate_confidence, validate_stress_factor, RiskError, Result};
use crate::portfolio::{PortfolioAggregator, TRADING_DAYS_PER_YEAR};
use crate::stats;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// VaR calculation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarMethod {
    Parametric,
    Historical,
    MonteCarlo,
}

/// Estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Default number of Monte Carlo simulations
    pub default_simulations: usize,

    /// Random seed for reproducible Monte Carlo (None = random)
    pub random_seed: Option<u64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            default_simulations: 10_000,
            random_seed: None,
        }
    }
}

/// VaR/CVaR pair, both positive loss fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarCvar {
    pub var: f64,
    pub cvar: f64,
}

/// Monte Carlo simulation inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloParams {
    /// Number of simulated horizon returns
    pub sims: usize,

    /// Horizon in trading days
    pub days: u32,

    /// Confidence level, strictly between 0 and 1
    pub confidence_level: f64,

    /// Multiplier applied to volatility only
    pub stress_factor: f64,
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        Self {
            sims: 10_000,
            days: 1,
            confidence_level: 0.95,
            stress_factor: 1.0,
        }
    }
}

impl MonteCarloParams {
    /// Same parameters under a different stress factor
    pub fn with_stress(self, stress_factor: f64) -> Self {
        Self { stress_factor, ..self }
    }
}

/// Monte Carlo result, including the full simulated sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloEstimate {
    pub var: f64,
    pub cvar: f64,

    /// Simulated horizon returns in draw order
    pub simulated_returns: Vec<f64>,
}

impl MonteCarloEstimate {
    pub fn var_cvar(&self) -> VarCvar {
        VarCvar {
            var: self.var,
            cvar: self.cvar,
        }
    }
}

/// Tail-risk estimator over a portfolio
///
/// Holds only a borrowed aggregator and its configuration; every estimation
/// is a pure function of its inputs and the supplied random source.
#[derive(Debug, Clone)]
pub struct RiskEstimator<'a> {
    portfolio: &'a PortfolioAggregator,
    config: EstimatorConfig,
}

impl<'a> RiskEstimator<'a> {
    pub fn new(portfolio: &'a PortfolioAggregator) -> Self {
        Self::with_config(portfolio, EstimatorConfig::default())
    }

    pub fn with_config(portfolio: &'a PortfolioAggregator, config: EstimatorConfig) -> Self {
        Self { portfolio, config }
    }

    pub fn portfolio(&self) -> &'a PortfolioAggregator {
        self.portfolio
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Parametric (variance-covariance) VaR and CVaR over `days`
    ///
    /// A confidence level of exactly 1.0 is rejected with
    /// [`RiskError::DegenerateAlpha`] since the CVaR term divides by α.
    pub fn parametric(&self, confidence_level: f64, days: u32) -> Result<VarCvar> {
        if confidence_level == 1.0 {
            return Err(RiskError::DegenerateAlpha);
        }
        validate_confidence(confidence_level)?;
        validate_horizon(days)?;

        let perf = self.portfolio.performance()?;
        let alpha = 1.0 - confidence_level;

        let days = days as f64;
        let horizon_vol = perf.annual_volatility / TRADING_DAYS_PER_YEAR.sqrt() * days.sqrt();
        let horizon_ret = perf.annual_return / TRADING_DAYS_PER_YEAR * days;

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| RiskError::InvalidParameter(e.to_string()))?;

        // Left-tail quantile, negative for α < 0.5
        let z = normal.inverse_cdf(alpha);

        let var = (horizon_ret + horizon_vol * z).abs();
        let cvar = (horizon_ret - (horizon_vol / alpha) * normal.pdf(z)).abs();

        tracing::debug!(
            confidence_level,
            days,
            z,
            var,
            cvar,
            "Parametric VaR/CVaR"
        );

        Ok(VarCvar { var, cvar })
    }

    /// Historical VaR and CVaR over one period of the realised series
    pub fn historical(&self, confidence_level: f64) -> Result<VarCvar> {
        validate_confidence(confidence_level)?;

        let estimate = stats::tail_estimate(self.portfolio.weighted_returns(), confidence_level)?;

        tracing::debug!(
            confidence_level,
            observations = self.portfolio.num_periods(),
            var = estimate.var,
            cvar = estimate.cvar,
            "Historical VaR/CVaR"
        );

        Ok(estimate)
    }

    /// Monte Carlo VaR and CVaR drawing from the supplied random source
    ///
    /// Draws `params.sims` i.i.d. standard normals `Z` and simulates
    /// `μ·dt·days + σ·stress·√(dt·days)·Z` with `dt = 1/252`.
    pub fn monte_carlo<R>(&self, params: &MonteCarloParams, rng: &mut R) -> Result<MonteCarloEstimate>
    where
        R: Rng + ?Sized,
    {
        validate_confidence(params.confidence_level)?;
        validate_horizon(params.days)?;
        validate_stress_factor(params.stress_factor)?;

        if params.sims == 0 {
            return Err(RiskError::InvalidParameter(
                "Number of simulations must be positive".to_string(),
            ));
        }

        let perf = self.portfolio.performance()?;

        let dt = 1.0 / TRADING_DAYS_PER_YEAR;
        let horizon = dt * params.days as f64;
        let stressed_sigma = perf.annual_volatility * params.stress_factor;

        let drift = perf.annual_return * horizon;
        let diffusion = stressed_sigma * horizon.sqrt();

        let simulated_returns: Vec<f64> = (0..params.sims)
            .map(|_| {
                let z: f64 = StandardNormal.sample(&mut *rng);
                drift + diffusion * z
            })
            .collect();

        let VarCvar { var, cvar } =
            stats::tail_estimate(&simulated_returns, params.confidence_level)?;

        tracing::debug!(
            sims = params.sims,
            days = params.days,
            confidence_level = params.confidence_level,
            stress_factor = params.stress_factor,
            var,
            cvar,
            "Monte Carlo VaR/CVaR"
        );

        Ok(MonteCarloEstimate {
            var,
            cvar,
            simulated_returns,
        })
    }

    /// Monte Carlo with a fresh generator seeded from `seed`
    pub fn monte_carlo_seeded(&self, params: &MonteCarloParams, seed: u64) -> Result<MonteCarloEstimate> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.monte_carlo(params, &mut rng)
    }

    /// Monte Carlo using the configured seed, or entropy when none is set
    pub fn monte_carlo_default(&self, params: &MonteCarloParams) -> Result<MonteCarloEstimate> {
        let mut rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.monte_carlo(params, &mut rng)
    }

    /// Default Monte Carlo parameters for this estimator
    pub fn default_params(&self, confidence_level: f64, days: u32) -> MonteCarloParams {
        MonteCarloParams {
            sims: self.config.default_simulations,
            days,
            confidence_level,
            stress_factor: 1.0,
        }
    }

    /// Dispatch a non-simulated estimate by method
    ///
    /// Monte Carlo runs unstressed with the configured simulation count and
    /// seed; the historical method ignores `days`.
    pub fn estimate(&self, method: VarMethod, confidence_level: f64, days: u32) -> Result<VarCvar> {
        match method {
            VarMethod::Parametric => self.parametric(confidence_level, days),
            VarMethod::Historical => self.historical(confidence_level),
            VarMethod::MonteCarlo => self
                .monte_carlo_default(&self.default_params(confidence_level, days))
                .map(|mc| mc.var_cvar()),
        }
    }
}

fn validate_horizon(days: u32) -> Result<()> {
    if days == 0 {
        return Err(RiskError::InvalidTimeHorizon(days));
    }
    Ok(())
}
