//! Stress testing example
//!
//! Runs the default scenario catalog plus a custom one against a portfolio
//! loaded from the sample configuration.
//!
//! Run with: cargo run --example stress_scenarios

use ag_tailrisk::{
    init_tracing, run_scenarios, PortfolioAggregator, ReturnSeriesProvider, RiskEstimator,
    RiskReport, RunConfig, SampleSummary, Scenario, StressCatalog,
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("=== Stress Scenario Example ===\n");

    let config_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/data/tailrisk.yaml");
    let config = RunConfig::from_yaml_file(&config_path)?;

    let portfolio = PortfolioAggregator::new(config.provider().load()?, config.portfolio.weights.clone())?;
    let estimator = RiskEstimator::with_config(&portfolio, config.risk.estimator_config());
    let params = config.risk.monte_carlo_params();

    // 1. Configured catalog
    println!("--- Configured scenarios ---");
    let outcomes = run_scenarios(&estimator, &config.scenarios, &params, config.risk.seed)?;
    for outcome in &outcomes {
        let summary = SampleSummary::from_sample(&outcome.estimate.simulated_returns)?;
        println!(
            "{:<15} x{:<4} VaR: {:.2}% | CVaR: {:.2}% | sim std: {:.2}%",
            outcome.scenario.name,
            outcome.scenario.stress_factor,
            outcome.estimate.var * 100.0,
            outcome.estimate.cvar * 100.0,
            summary.std_dev * 100.0
        );
    }
    println!();

    // 2. A custom catalog built in code
    println!("--- Custom scenarios ---");
    let custom = StressCatalog::from_scenarios(vec![
        Scenario::new("Calm", 0.7),
        Scenario::new("Flash_Crash", 5.0),
    ])?;
    let outcomes = run_scenarios(&estimator, &custom, &params, Some(7))?;
    for outcome in &outcomes {
        println!(
            "{:<15} x{:<4} VaR: {:.2}% | CVaR: {:.2}%",
            outcome.scenario.name,
            outcome.scenario.stress_factor,
            outcome.estimate.var * 100.0,
            outcome.estimate.cvar * 100.0
        );
    }
    println!();

    // 3. Full report
    let report = RiskReport::build(&estimator, &config.scenarios, &config.risk, 30)?;
    print!("{}", report.render_text());

    Ok(())
}
