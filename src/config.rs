use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::severity::SeverityAssumption;
use crate::types::{Retention, Seed};

/// Claim inflation applied to the canonical stressed scenario.
pub const CANONICAL_INFLATION: f64 = 0.08;

/// Reinsurer's price for the layer at one retention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumQuote {
    pub retention: Retention,
    pub premium: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PremiumTable(pub Vec<PremiumQuote>);

impl PremiumTable {
    pub fn get(&self, retention: Retention) -> Option<f64> {
        self.0.iter().find(|q| q.retention == retention).map(|q| q.premium)
    }

    pub fn premium_for(&self, retention: Retention) -> Result<f64, EngineError> {
        self.get(retention).ok_or(EngineError::MissingPremium(retention))
    }
}

/// A named severity assumption, e.g. the current year or an inflation stress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub severity: SeverityAssumption,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub seed: Seed,
    /// Simulated years per retention.
    pub n_sim: usize,
    pub n_policies: u64,
    /// Per-policy probability of one claim in a year.
    pub claim_prob: f64,
    pub retentions: Vec<Retention>,
    pub premiums: PremiumTable,
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] EngineError),
}

impl EngineConfig {
    pub fn canonical() -> Self {
        let current = SeverityAssumption { mean: 9.070, std: 10.132 };
        EngineConfig {
            seed: Seed(42),
            n_sim: 100_000,
            n_policies: 200,
            claim_prob: 0.20,
            retentions: vec![Retention(25.0), Retention(30.0)],
            premiums: PremiumTable(vec![
                PremiumQuote { retention: Retention(25.0), premium: 48.5 },
                PremiumQuote { retention: Retention(30.0), premium: 38.2 },
            ]),
            scenarios: vec![
                Scenario { name: "Current Year".to_string(), severity: current },
                Scenario {
                    name: "Next Year with Inflation".to_string(),
                    severity: current.inflated(CANONICAL_INFLATION),
                },
            ],
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Check the portfolio and contract inputs. Severity assumptions are
    /// checked per scenario when the engine derives lognormal parameters, and
    /// a missing premium only fails the retention it belongs to.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.n_sim == 0 {
            return Err(EngineError::invalid("n_sim", "must be > 0"));
        }
        if self.n_policies == 0 {
            return Err(EngineError::invalid("n_policies", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.claim_prob) {
            return Err(EngineError::invalid(
                "claim_prob",
                format!("must lie in [0, 1], got {}", self.claim_prob),
            ));
        }
        if self.retentions.is_empty() {
            return Err(EngineError::invalid("retentions", "at least one retention is required"));
        }
        if let Some(r) = self.retentions.iter().find(|r| !r.0.is_finite() || r.0 < 0.0) {
            return Err(EngineError::invalid("retentions", format!("must be finite and >= 0, got {r}")));
        }
        if let Some(q) = self.premiums.0.iter().find(|q| !q.premium.is_finite() || q.premium <= 0.0) {
            return Err(EngineError::invalid(
                "premiums",
                format!("premium for retention {} must be finite and > 0, got {}", q.retention, q.premium),
            ));
        }
        Ok(())
    }
}
