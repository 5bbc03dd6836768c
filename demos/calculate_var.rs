//! VaR calculation example
//!
//! Builds a four-asset portfolio and compares the parametric, historical and
//! Monte Carlo estimates.
//!
//! Run with: cargo run --example calculate_var

use ag_tailrisk::{
    EstimatorConfig, InMemoryProvider, PortfolioAggregator, ReturnSeriesProvider, RiskEstimator,
    VarMethod,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Value at Risk (VaR) Calculation Example ===\n");

    // 1. Simulate 250 days of returns for a small basket
    let provider = InMemoryProvider::default()
        .with_returns("AAPL", synthetic_returns(250, 0.0, 0.018, 0.0007))
        .with_returns("JPM", synthetic_returns(250, 1.3, 0.015, 0.0004))
        .with_returns("XOM", synthetic_returns(250, 2.1, 0.016, 0.0002))
        .with_returns("TLT", synthetic_returns(250, 4.0, 0.007, 0.0001));

    let portfolio = PortfolioAggregator::new(provider.load()?, vec![0.4, 0.2, 0.2, 0.2])?;
    let performance = portfolio.performance()?;

    println!("Portfolio:");
    for (asset, weight) in portfolio.assets().iter().zip(portfolio.weights()) {
        println!("  {:<5} {:.0}%", asset, weight * 100.0);
    }
    println!("  Annual return: {:.2}%", performance.annual_return * 100.0);
    println!("  Annual volatility: {:.2}%", performance.annual_volatility * 100.0);
    println!();

    // 2. Estimator with a fixed seed for reproducible Monte Carlo
    let estimator = RiskEstimator::with_config(
        &portfolio,
        EstimatorConfig {
            default_simulations: 50_000,
            random_seed: Some(42),
        },
    );

    let confidence_level = 0.95;
    let time_horizon = 1;

    println!("Confidence Level: {}%", confidence_level * 100.0);
    println!("Time Horizon: {} day(s)", time_horizon);
    println!();

    for method in [VarMethod::Parametric, VarMethod::Historical, VarMethod::MonteCarlo] {
        let result = estimator.estimate(method, confidence_level, time_horizon)?;
        println!(
            "{:<12} VaR: {:.2}% | CVaR: {:.2}%",
            format!("{:?}", method),
            result.var * 100.0,
            result.cvar * 100.0
        );
    }
    println!();

    // 3. Horizon scaling for the closed-form estimate
    println!("--- Parametric VaR by horizon ---");
    for days in [1, 5, 10, 20] {
        let result = estimator.parametric(confidence_level, days)?;
        println!("  {:>2} day(s): VaR {:.2}% | CVaR {:.2}%", days, result.var * 100.0, result.cvar * 100.0);
    }
    println!();

    // 4. Confidence sweep
    println!("--- Historical VaR by confidence ---");
    for c in [0.90, 0.95, 0.975, 0.99] {
        let result = estimator.historical(c)?;
        println!("  {:>5.1}%: VaR {:.2}% | CVaR {:.2}%", c * 100.0, result.var * 100.0, result.cvar * 100.0);
    }

    Ok(())
}

fn synthetic_returns(days: usize, phase: f64, scale: f64, drift: f64) -> Vec<f64> {
    (0..days)
        .map(|i| {
            let t = i as f64;
            ((t * 1.7 + phase).sin() + 0.5 * (t * 0.23 + phase).cos()) * scale + drift
        })
        .collect()
}
