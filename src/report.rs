//! Risk report assembly
//!
//! Runs the full estimation flow for one portfolio and collects the results in
//! a serialisable report. Simulated samples are reduced to summary statistics
//! and histogram data for an external plotting tool; nothing is rendered or
//! written here.

use crate::config::RiskSettings;
use crate::error::{RiskError, Result};
use crate::estimator::{RiskEstimator, VarCvar};
use crate::portfolio::PerformanceSummary;
use crate::stats;
use crate::stress::{run_scenarios, StressCatalog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptive statistics of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,

    /// Sample standard deviation (n - 1)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SampleSummary {
    pub fn from_sample(sample: &[f64]) -> Result<Self> {
        let mean = stats::mean(sample).ok_or_else(|| {
            RiskError::InsufficientData("Cannot summarise an empty sample".to_string())
        })?;
        let std_dev = if sample.len() > 1 {
            stats::sample_std(sample)?
        } else {
            0.0
        };

        let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
        let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            count: sample.len(),
            mean,
            std_dev,
            min,
            max,
        })
    }
}

/// Equal-width histogram with density normalisation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` values
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,

    /// count / (n · width), integrating to 1 over the range
    pub density: Vec<f64>,
}

impl Histogram {
    /// Bin the sample over its [min, max] range
    ///
    /// A sample with no spread collapses to a single zero-width bin holding the
    /// whole unit mass.
    pub fn from_sample(sample: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(RiskError::InvalidParameter(
                "Histogram needs at least one bin".to_string(),
            ));
        }
        let summary = SampleSummary::from_sample(sample)?;
        let (lo, hi) = (summary.min, summary.max);

        if hi <= lo {
            return Ok(Self {
                edges: vec![lo, hi],
                counts: vec![sample.len()],
                density: vec![1.0],
            });
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0usize; bins];
        for value in sample {
            // The right edge belongs to the last bin
            let idx = (((value - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let n = sample.len() as f64;
        let density = counts.iter().map(|c| *c as f64 / (n * width)).collect();

        Ok(Self {
            edges,
            counts,
            density,
        })
    }
}

/// Monte Carlo result for one scenario, reduced for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub stress_factor: f64,
    pub var: f64,
    pub cvar: f64,
    pub summary: SampleSummary,
    pub histogram: Histogram,
}

/// Full risk report for one portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub generated_at: DateTime<Utc>,
    pub assets: Vec<String>,
    pub weights: Vec<f64>,
    pub performance: PerformanceSummary,
    pub confidence_level: f64,
    pub horizon_days: u32,
    pub parametric: VarCvar,

    /// One-period estimate; not scaled to the horizon
    pub historical: VarCvar,
    pub scenarios: Vec<ScenarioReport>,
}

impl RiskReport {
    /// Run parametric, historical and every stress scenario
    pub fn build(
        estimator: &RiskEstimator<'_>,
        catalog: &StressCatalog,
        settings: &RiskSettings,
        bins: usize,
    ) -> Result<Self> {
        settings.validate()?;

        let portfolio = estimator.portfolio();
        let performance = portfolio.performance()?;

        let parametric = estimator.parametric(settings.confidence_level, settings.horizon_days)?;
        let historical = estimator.historical(settings.confidence_level)?;

        let outcomes = run_scenarios(
            estimator,
            catalog,
            &settings.monte_carlo_params(),
            settings.seed,
        )?;

        let scenarios = outcomes
            .into_iter()
            .map(|outcome| -> Result<ScenarioReport> {
                let sample = &outcome.estimate.simulated_returns;
                Ok(ScenarioReport {
                    summary: SampleSummary::from_sample(sample)?,
                    histogram: Histogram::from_sample(sample, bins)?,
                    name: outcome.scenario.name,
                    stress_factor: outcome.scenario.stress_factor,
                    var: outcome.estimate.var,
                    cvar: outcome.estimate.cvar,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            generated_at: Utc::now(),
            assets: portfolio.assets().to_vec(),
            weights: portfolio.weights().to_vec(),
            performance,
            confidence_level: settings.confidence_level,
            horizon_days: settings.horizon_days,
            parametric,
            historical,
            scenarios,
        })
    }

    pub fn scenario(&self, name: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Console rendering with percentages
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RiskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Portfolio Tail Risk ===")?;
        let holdings: Vec<String> = self
            .assets
            .iter()
            .zip(&self.weights)
            .map(|(asset, weight)| format!("{} {:.1}%", asset, weight * 100.0))
            .collect();
        writeln!(f, "Holdings: {}", holdings.join(", "))?;
        writeln!(
            f,
            "Annual return: {:.2}% | Annual volatility: {:.2}%",
            self.performance.annual_return * 100.0,
            self.performance.annual_volatility * 100.0
        )?;
        writeln!(
            f,
            "Confidence: {:.1}% | Horizon: {} day(s)",
            self.confidence_level * 100.0,
            self.horizon_days
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "[Parametric] VaR: {:.2}% | CVaR: {:.2}%",
            self.parametric.var * 100.0,
            self.parametric.cvar * 100.0
        )?;
        writeln!(
            f,
            "[Historical] VaR: {:.2}% | CVaR: {:.2}%",
            self.historical.var * 100.0,
            self.historical.cvar * 100.0
        )?;
        writeln!(f)?;

        writeln!(f, "--- Stress testing (Monte Carlo) ---")?;
        for scenario in &self.scenarios {
            writeln!(
                f,
                "Scenario {:<15} (Vol x{}) -> VaR: {:.2}% | CVaR: {:.2}%",
                scenario.name,
                scenario.stress_factor,
                scenario.var * 100.0,
                scenario.cvar * 100.0
            )?;
        }

        Ok(())
    }
}
