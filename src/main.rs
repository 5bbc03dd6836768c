use ag_tailrisk::{
    PortfolioAggregator, ReturnSeriesProvider, RiskEstimator, RiskReport, RunConfig,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[clap(name = "tailrisk", about = "Portfolio VaR/CVaR with stressed Monte Carlo")]
struct Args {
    #[clap(short, long, default_value = "tailrisk.yaml")]
    config: PathBuf,

    #[clap(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Overrides the configured Monte Carlo seed
    #[clap(long)]
    seed: Option<u64>,

    /// Histogram bins per scenario in JSON output
    #[clap(long, default_value_t = 50)]
    bins: usize,
}

fn main() -> Result<()> {
    ag_tailrisk::init_tracing();

    let args = Args::parse();

    info!("Loading configuration from {:?}", args.config);
    let mut config = RunConfig::from_yaml_file(&args.config)
        .with_context(|| format!("Failed to load config {:?}", args.config))?;

    if let Some(seed) = args.seed {
        config.risk.seed = Some(seed);
    }

    let matrix = config
        .provider()
        .load()
        .with_context(|| format!("Failed to load returns from {:?}", config.portfolio.returns_file))?;

    let portfolio = PortfolioAggregator::new(matrix, config.portfolio.weights.clone())
        .context("Failed to build portfolio")?;

    let performance = portfolio.performance()?;
    info!(
        assets = portfolio.assets().len(),
        periods = portfolio.num_periods(),
        annual_volatility = performance.annual_volatility,
        "Portfolio loaded"
    );

    let estimator = RiskEstimator::with_config(&portfolio, config.risk.estimator_config());
    let report = RiskReport::build(&estimator, &config.scenarios, &config.risk, args.bins)
        .context("Risk estimation failed")?;

    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
