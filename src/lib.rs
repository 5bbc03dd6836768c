//! # ag-tailrisk: Portfolio Tail-Risk Estimation
//!
//! This library estimates Value-at-Risk (VaR) and Conditional Value-at-Risk
//! (CVaR) for a weighted basket of asset return series.
//!
//! ## Core Components
//!
//! - **PortfolioAggregator**: Weighted portfolio returns and annualised performance
//! - **RiskEstimator**: Parametric, historical and Monte Carlo VaR/CVaR
//! - **StressCatalog**: Ordered volatility stress scenarios for Monte Carlo
//!
//! Around the core sit return series providers, a YAML run configuration and
//! a serialisable report for downstream display.
//!
//! ## Example Usage
//!
//! ```rust
//! use ag_tailrisk::{
//!     run_scenarios, MonteCarloParams, PortfolioAggregator, ReturnMatrix, RiskEstimator,
//!     StressCatalog,
//! };
//!
//! let matrix = ReturnMatrix::from_columns(vec![
//!     ("AAPL", vec![0.012, -0.021, 0.004, 0.017, -0.009, 0.003]),
//!     ("TLT", vec![-0.002, 0.006, 0.001, -0.004, 0.005, 0.000]),
//! ])
//! .unwrap();
//! let portfolio = PortfolioAggregator::new(matrix, vec![0.6, 0.4]).unwrap();
//! let estimator = RiskEstimator::new(&portfolio);
//!
//! let parametric = estimator.parametric(0.95, 1).unwrap();
//! let historical = estimator.historical(0.95).unwrap();
//! assert!(parametric.cvar >= parametric.var);
//! assert!(historical.cvar >= historical.var);
//!
//! let params = MonteCarloParams { sims: 2_000, ..Default::default() };
//! let outcomes = run_scenarios(&estimator, &StressCatalog::default(), &params, Some(42)).unwrap();
//! assert_eq!(outcomes.len(), 3);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod estimator;
pub mod portfolio;
pub mod report;
pub mod stats;
pub mod stress;

pub use config::{PortfolioSettings, RiskSettings, RunConfig};
pub use data::{simple_returns, AssetSeries, InMemoryProvider, JsonFileProvider, ReturnSeriesProvider};
pub use error::{Result, RiskError};
pub use estimator::{
    EstimatorConfig, MonteCarloEstimate, MonteCarloParams, RiskEstimator, VarCvar, VarMethod,
};
pub use portfolio::{PerformanceSummary, PortfolioAggregator, ReturnMatrix, TRADING_DAYS_PER_YEAR};
pub use report::{Histogram, RiskReport, SampleSummary, ScenarioReport};
pub use stress::{run_scenarios, Scenario, ScenarioOutcome, StressCatalog};

#[cfg(feature = "async")]
pub use stress::run_scenarios_concurrent;

/// Initialize tracing with `RUST_LOG`, defaulting to `info`
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Verify all main types are exported
        let _: Option<PortfolioAggregator>;
        let _: Option<RiskEstimator<'static>>;
        let _: Option<StressCatalog>;
        let _: Option<MonteCarloEstimate>;
        let _: Option<RiskReport>;
        let _: Option<RunConfig>;
        let _: Option<InMemoryProvider>;
    }
}
