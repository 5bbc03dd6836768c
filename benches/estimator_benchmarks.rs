//! Benchmarks for the tail-risk estimators
//!
//! Run with: cargo bench

use ag_tailrisk::{
    run_scenarios, MonteCarloParams, PortfolioAggregator, ReturnMatrix, RiskEstimator,
    RiskReport, RiskSettings, StressCatalog,
};

fn main() {
    println!("=== Tail-Risk Estimator Performance Benchmarks ===\n");

    let portfolio = create_portfolio(4, 1000);

    benchmark_aggregation();
    benchmark_closed_form(&portfolio);
    benchmark_monte_carlo(&portfolio);
    benchmark_scenarios(&portfolio);
}

fn create_portfolio(assets: usize, periods: usize) -> PortfolioAggregator {
    let columns: Vec<(String, Vec<f64>)> = (0..assets)
        .map(|a| {
            let returns = (0..periods)
                .map(|t| ((t as f64 * 0.37 + a as f64).sin() * 0.015) + 0.0003)
                .collect();
            (format!("ASSET{}", a), returns)
        })
        .collect();

    let matrix = ReturnMatrix::from_columns(columns).expect("valid benchmark data");
    let weights = vec![1.0 / assets as f64; assets];
    PortfolioAggregator::new(matrix, weights).expect("matching weights")
}

fn benchmark_aggregation() {
    println!("## Portfolio Aggregation");

    for (assets, periods) in [(4, 1_000), (50, 2_520)] {
        let start = std::time::Instant::now();
        for _ in 0..100 {
            let portfolio = create_portfolio(assets, periods);
            let _ = portfolio.performance();
        }
        let elapsed = start.elapsed();
        println!(
            "  {} assets x {} periods (100 iterations): {:?}",
            assets, periods, elapsed
        );
        println!("  Average: {:?}", elapsed / 100);
    }

    println!();
}

fn benchmark_closed_form(portfolio: &PortfolioAggregator) {
    println!("## Parametric and Historical");

    let estimator = RiskEstimator::new(portfolio);

    let start = std::time::Instant::now();
    for _ in 0..10_000 {
        let _ = estimator.parametric(0.95, 1);
    }
    let elapsed = start.elapsed();
    println!("  Parametric (10,000 iterations): {:?}", elapsed);
    println!("  Average: {:?}", elapsed / 10_000);

    let start = std::time::Instant::now();
    for _ in 0..1_000 {
        let _ = estimator.historical(0.95);
    }
    let elapsed = start.elapsed();
    println!("  Historical (1,000 iterations): {:?}", elapsed);
    println!("  Average: {:?}", elapsed / 1_000);

    println!();
}

fn benchmark_monte_carlo(portfolio: &PortfolioAggregator) {
    println!("## Monte Carlo");

    let estimator = RiskEstimator::new(portfolio);

    for sims in [10_000, 100_000, 1_000_000] {
        let params = MonteCarloParams { sims, ..Default::default() };
        let start = std::time::Instant::now();
        let _ = estimator.monte_carlo_seeded(&params, 42);
        let elapsed = start.elapsed();
        println!("  {} simulations: {:?}", sims, elapsed);
    }

    println!();
}

fn benchmark_scenarios(portfolio: &PortfolioAggregator) {
    println!("## Stress Scenarios");

    let estimator = RiskEstimator::new(portfolio);
    let catalog = StressCatalog::default();
    let params = MonteCarloParams::default();

    let start = std::time::Instant::now();
    let _ = run_scenarios(&estimator, &catalog, &params, Some(42));
    let elapsed = start.elapsed();
    println!(
        "  {} scenarios x {} simulations: {:?}",
        catalog.len(),
        params.sims,
        elapsed
    );

    let settings = RiskSettings { seed: Some(42), ..Default::default() };
    let start = std::time::Instant::now();
    let _ = RiskReport::build(&estimator, &catalog, &settings, 50);
    let elapsed = start.elapsed();
    println!("  Full report: {:?}", elapsed);

    println!();
}
