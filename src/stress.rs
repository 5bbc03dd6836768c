//! Stress scenarios for Monte Carlo simulation
//!
//! A scenario is a named volatility multiplier. The catalog keeps scenarios in
//! insertion order so repeated runs visit them identically. Stress factors only
//! ever reach the Monte Carlo estimator; parametric and historical estimates are
//! unstressed.

use crate::error::{validate_stress_factor, RiskError, Result};
use crate::estimator::{MonteCarloEstimate, MonteCarloParams, RiskEstimator};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Named volatility stress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name (e.g., "Major_Crisis")
    pub name: String,

    /// Multiplier applied to annualised volatility (1.0 = unstressed)
    pub stress_factor: f64,
}

impl Scenario {
    pub fn new(name: impl Into<String>, stress_factor: f64) -> Self {
        Self {
            name: name.into(),
            stress_factor,
        }
    }
}

/// Ordered, immutable table of scenario name → stress factor
#[derive(Debug, Clone, PartialEq)]
pub struct StressCatalog {
    scenarios: IndexMap<String, f64>,
}

impl Default for StressCatalog {
    /// Normal, moderate stress and major crisis regimes
    fn default() -> Self {
        let scenarios = IndexMap::from([
            ("Normal".to_string(), 1.0),
            ("Moderate_Stress".to_string(), 1.5),
            ("Major_Crisis".to_string(), 3.0),
        ]);
        Self { scenarios }
    }
}

impl StressCatalog {
    /// Build a catalog from scenarios in the order given
    ///
    /// Fails on a negative or non-finite factor, or on a repeated name.
    pub fn from_scenarios<I>(scenarios: I) -> Result<Self>
    where
        I: IntoIterator<Item = Scenario>,
    {
        let mut table = IndexMap::new();

        for scenario in scenarios {
            validate_stress_factor(scenario.stress_factor)?;
            if table.contains_key(&scenario.name) {
                return Err(RiskError::InvalidParameter(format!(
                    "Duplicate scenario name: {}",
                    scenario.name
                )));
            }
            table.insert(scenario.name, scenario.stress_factor);
        }

        Ok(Self { scenarios: table })
    }

    /// Load a catalog from a YAML list of `{ name, stress_factor }`
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let scenarios: Vec<Scenario> = serde_yaml::from_str(yaml)?;
        Self::from_scenarios(scenarios)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.scenarios.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// `(name, factor)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scenarios.iter().map(|(name, factor)| (name.as_str(), *factor))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn scenarios(&self) -> Vec<Scenario> {
        self.iter()
            .map(|(name, factor)| Scenario::new(name, factor))
            .collect()
    }
}

impl Serialize for StressCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.scenarios().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StressCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let scenarios = Vec::<Scenario>::deserialize(deserializer)?;
        Self::from_scenarios(scenarios).map_err(serde::de::Error::custom)
    }
}

/// Monte Carlo result for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub estimate: MonteCarloEstimate,
}

/// Generator for the scenario at `index`
///
/// A base seed gives each scenario its own deterministic stream; without one
/// every scenario draws from fresh entropy.
fn scenario_rng(base_seed: Option<u64>, index: usize) -> StdRng {
    match base_seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}

/// Run Monte Carlo once per scenario, in catalog order
///
/// `params.stress_factor` is replaced by each scenario's factor.
pub fn run_scenarios(
    estimator: &RiskEstimator<'_>,
    catalog: &StressCatalog,
    params: &MonteCarloParams,
    base_seed: Option<u64>,
) -> Result<Vec<ScenarioOutcome>> {
    catalog
        .iter()
        .enumerate()
        .map(|(index, (name, factor))| {
            let mut rng = scenario_rng(base_seed, index);
            let estimate = estimator.monte_carlo(&params.with_stress(factor), &mut rng)?;

            tracing::info!(
                scenario = name,
                stress_factor = factor,
                var = estimate.var,
                cvar = estimate.cvar,
                "Stress scenario simulated"
            );

            Ok(ScenarioOutcome {
                scenario: Scenario::new(name, factor),
                estimate,
            })
        })
        .collect()
}

/// Run every scenario concurrently on the blocking thread pool
///
/// Each task owns its generator, so results match [`run_scenarios`] for the
/// same base seed and are returned in catalog order.
#[cfg(feature = "async")]
pub async fn run_scenarios_concurrent(
    portfolio: std::sync::Arc<crate::portfolio::PortfolioAggregator>,
    catalog: &StressCatalog,
    params: MonteCarloParams,
    base_seed: Option<u64>,
) -> Result<Vec<ScenarioOutcome>> {
    let mut handles = Vec::with_capacity(catalog.len());

    for (index, (name, factor)) in catalog.iter().enumerate() {
        let portfolio = std::sync::Arc::clone(&portfolio);
        let scenario = Scenario::new(name, factor);

        handles.push(tokio::task::spawn_blocking(move || {
            let estimator = RiskEstimator::new(&portfolio);
            let mut rng = scenario_rng(base_seed, index);
            let estimate = estimator.monte_carlo(&params.with_stress(scenario.stress_factor), &mut rng)?;
            Ok::<_, RiskError>(ScenarioOutcome { scenario, estimate })
        }));
    }

    let outcomes = join_outcomes(handles).await?;

    tracing::info!(scenarios = outcomes.len(), "Concurrent stress run complete");

    Ok(outcomes)
}

/// Await scenario tasks in submission order
///
/// A panicked or cancelled task surfaces as [`RiskError::TaskFailed`].
#[cfg(feature = "async")]
async fn join_outcomes(
    handles: Vec<tokio::task::JoinHandle<Result<ScenarioOutcome>>>,
) -> Result<Vec<ScenarioOutcome>> {
    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = handle
            .await
            .map_err(|e| RiskError::TaskFailed(e.to_string()))??;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{PortfolioAggregator, ReturnMatrix};

    fn create_test_portfolio() -> PortfolioAggregator {
        let matrix = ReturnMatrix::from_columns(vec![
            ("SPY", vec![0.01, -0.02, 0.015, -0.005, 0.0, 0.02, -0.01, 0.005]),
            ("TLT", vec![-0.005, 0.01, -0.002, 0.004, 0.001, -0.01, 0.006, 0.0]),
        ])
        .unwrap();
        PortfolioAggregator::new(matrix, vec![0.6, 0.4]).unwrap()
    }

    #[test]
    fn test_default_catalog_order() {
        let catalog = StressCatalog::default();

        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["Normal", "Moderate_Stress", "Major_Crisis"]);
        assert_eq!(catalog.get("Normal"), Some(1.0));
        assert!(catalog.get("Major_Crisis").unwrap() > 1.0);
        assert!(catalog.get("Unknown").is_none());
    }

    #[test]
    fn test_custom_catalog_preserves_insertion_order() {
        let catalog = StressCatalog::from_scenarios(vec![
            Scenario::new("Zeta", 2.0),
            Scenario::new("Alpha", 0.5),
            Scenario::new("Mid", 1.0),
        ])
        .unwrap();

        let pairs: Vec<(&str, f64)> = catalog.iter().collect();
        assert_eq!(pairs, vec![("Zeta", 2.0), ("Alpha", 0.5), ("Mid", 1.0)]);
    }

    #[test]
    fn test_catalog_validation() {
        assert!(matches!(
            StressCatalog::from_scenarios(vec![Scenario::new("Bad", -0.1)]),
            Err(RiskError::InvalidStressFactor(_))
        ));
        assert!(matches!(
            StressCatalog::from_scenarios(vec![Scenario::new("A", 1.0), Scenario::new("A", 2.0)]),
            Err(RiskError::InvalidParameter(_))
        ));
        assert!(StressCatalog::from_scenarios(vec![Scenario::new("Calm", 0.0)]).is_ok());
    }

    #[test]
    fn test_catalog_yaml() {
        let yaml = r#"
- name: Normal
  stress_factor: 1.0
- name: Crash
  stress_factor: 4.0
"#;
        let catalog = StressCatalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Crash"), Some(4.0));

        let serialized = serde_yaml::to_string(&catalog).unwrap();
        let parsed: StressCatalog = serde_yaml::from_str(&serialized).unwrap();
        assert_eq!(parsed, catalog);

        let bad = "- name: Bad\n  stress_factor: -2.0\n";
        assert!(serde_yaml::from_str::<StressCatalog>(bad).is_err());
    }

    #[test]
    fn test_run_scenarios_in_order() {
        let portfolio = create_test_portfolio();
        let estimator = RiskEstimator::new(&portfolio);
        let catalog = StressCatalog::default();
        let params = MonteCarloParams { sims: 2000, ..Default::default() };

        let outcomes = run_scenarios(&estimator, &catalog, &params, Some(42)).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].scenario.name, "Normal");
        assert_eq!(outcomes[2].scenario.name, "Major_Crisis");
        for outcome in &outcomes {
            assert_eq!(outcome.estimate.simulated_returns.len(), 2000);
        }
    }

    #[test]
    fn test_run_scenarios_reproducible_with_seed() {
        let portfolio = create_test_portfolio();
        let estimator = RiskEstimator::new(&portfolio);
        let catalog = StressCatalog::default();
        let params = MonteCarloParams { sims: 500, ..Default::default() };

        let first = run_scenarios(&estimator, &catalog, &params, Some(9)).unwrap();
        let second = run_scenarios(&estimator, &catalog, &params, Some(9)).unwrap();
        assert_eq!(first, second);

        // Scenario i uses seed base + i
        let direct = estimator
            .monte_carlo_seeded(&params.with_stress(1.5), 10)
            .unwrap();
        assert_eq!(first[1].estimate, direct);
    }

    #[test]
    fn test_stress_increases_tail_risk() {
        let portfolio = create_test_portfolio();
        let estimator = RiskEstimator::new(&portfolio);
        let params = MonteCarloParams { sims: 20_000, ..Default::default() };

        let normal = estimator.monte_carlo_seeded(&params.with_stress(1.0), 5).unwrap();
        let crisis = estimator.monte_carlo_seeded(&params.with_stress(3.0), 5).unwrap();

        assert!(crisis.var > normal.var);
        assert!(crisis.cvar > normal.cvar);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        use std::sync::Arc;

        let portfolio = Arc::new(create_test_portfolio());
        let catalog = StressCatalog::default();
        let params = MonteCarloParams { sims: 1000, ..Default::default() };

        let concurrent = run_scenarios_concurrent(Arc::clone(&portfolio), &catalog, params, Some(21))
            .await
            .unwrap();

        let estimator = RiskEstimator::new(&portfolio);
        let sequential = run_scenarios(&estimator, &catalog, &params, Some(21)).unwrap();

        assert_eq!(concurrent, sequential);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_panicked_task_reported_as_task_failure() {
        let portfolio = create_test_portfolio();
        let estimate = RiskEstimator::new(&portfolio)
            .monte_carlo_seeded(&MonteCarloParams { sims: 100, ..Default::default() }, 1)
            .unwrap();
        let outcome = ScenarioOutcome {
            scenario: Scenario::new("Normal", 1.0),
            estimate,
        };

        let ok = tokio::task::spawn_blocking(move || -> Result<ScenarioOutcome> { Ok(outcome) });
        let panicked = tokio::task::spawn_blocking(|| -> Result<ScenarioOutcome> {
            panic!("scenario worker died")
        });

        let result = join_outcomes(vec![ok, panicked]).await;
        assert!(matches!(result, Err(RiskError::TaskFailed(_))));
    }
}
