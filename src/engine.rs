use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Binomial, Distribution};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, Scenario};
use crate::error::EngineError;
use crate::layer::XolLayer;
use crate::metrics::{LossDistribution, RiskMetrics};
use crate::severity::{LogNormalParams, SeverityAssumption, SeverityModel};
use crate::types::Retention;

/// One simulated year. Only `ceded` survives into the loss distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    pub n_claims: u64,
    pub triggering_claims: u64,
    pub ceded: f64,
}

/// Runs single portfolio years against one layer.
///
/// Claim counts come from Binomial(`n_policies`, `claim_prob`), the law of
/// the number of successes among independent per-policy Bernoulli trials.
pub struct TrialSimulator<'a> {
    frequency: Binomial,
    severity: &'a SeverityModel,
    layer: XolLayer,
    /// Claim sizes of the most recent trial.
    claim_sizes: Vec<f64>,
}

impl<'a> TrialSimulator<'a> {
    pub fn new(
        n_policies: u64,
        claim_prob: f64,
        severity: &'a SeverityModel,
        layer: XolLayer,
    ) -> Result<Self, EngineError> {
        let frequency = Binomial::new(n_policies, claim_prob)
            .map_err(|e| EngineError::invalid("claim_prob", e.to_string()))?;
        Ok(Self { frequency, severity, layer, claim_sizes: Vec::new() })
    }

    pub fn run_trial(&mut self, rng: &mut impl Rng) -> TrialOutcome {
        let n_claims = self.frequency.sample(rng);
        if n_claims == 0 {
            self.claim_sizes.clear();
            return TrialOutcome { n_claims: 0, triggering_claims: 0, ceded: 0.0 };
        }

        self.severity.sample_into(n_claims as usize, rng, &mut self.claim_sizes);
        let cession = self.layer.apply(&self.claim_sizes);
        TrialOutcome { n_claims, triggering_claims: cession.triggering_claims, ceded: cession.ceded }
    }

    pub fn claim_sizes(&self) -> &[f64] {
        &self.claim_sizes
    }
}

/// Simulate `config.n_sim` independent years for one retention.
pub fn simulate_losses(
    config: &EngineConfig,
    severity: &SeverityModel,
    retention: Retention,
    rng: &mut impl Rng,
) -> Result<LossDistribution, EngineError> {
    let mut sim =
        TrialSimulator::new(config.n_policies, config.claim_prob, severity, XolLayer::new(retention))?;
    let mut dist = LossDistribution::with_capacity(config.n_sim);
    for _ in 0..config.n_sim {
        let trial = sim.run_trial(rng);
        dist.record(trial.ceded, trial.n_claims, trial.triggering_claims);
    }
    Ok(dist)
}

/// Simulate one retention and reduce it to risk metrics. The premium is
/// looked up first so an unpriced retention costs no simulation.
pub fn evaluate_retention(
    config: &EngineConfig,
    severity: &SeverityModel,
    retention: Retention,
    rng: &mut impl Rng,
) -> Result<RiskMetrics, EngineError> {
    let premium = config.premiums.premium_for(retention)?;
    let dist = simulate_losses(config, severity, retention, rng)?;
    debug!(
        %retention,
        trials = dist.trials(),
        total_claims = dist.total_claims,
        triggering_claims = dist.triggering_claims,
        "retention simulated"
    );
    RiskMetrics::from_distribution(&dist, premium)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetentionReport {
    pub retention: Retention,
    pub outcome: Result<RiskMetrics, EngineError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub scenario: String,
    pub severity: SeverityAssumption,
    pub params: LogNormalParams,
    /// One entry per configured retention, in configuration order.
    pub retentions: Vec<RetentionReport>,
}

/// Evaluate every configured retention under one scenario.
///
/// Invalid configuration or severity fails the whole scenario. A retention
/// that fails (missing premium, no claims observed) is reported in place and
/// does not stop the others.
///
/// Each retention gets a fresh `ChaCha20Rng` seeded from `config.seed`, so all
/// retentions are priced against the same simulated claim years.
pub fn run_scenario(config: &EngineConfig, scenario: &Scenario) -> Result<ScenarioReport, EngineError> {
    config.validate()?;
    let severity = SeverityModel::from_assumption(scenario.severity)?;
    let params = severity.params();
    info!(
        scenario = %scenario.name,
        mean = scenario.severity.mean,
        std = scenario.severity.std,
        mu = params.mu,
        sigma = params.sigma,
        n_sim = config.n_sim,
        "running scenario"
    );

    let retentions = config
        .retentions
        .iter()
        .map(|&retention| {
            let mut rng = ChaCha20Rng::seed_from_u64(config.seed.0);
            let outcome = evaluate_retention(config, &severity, retention, &mut rng);
            if let Err(e) = &outcome {
                warn!(scenario = %scenario.name, %retention, error = %e, "retention not evaluated");
            }
            RetentionReport { retention, outcome }
        })
        .collect();

    info!(scenario = %scenario.name, "scenario complete");
    Ok(ScenarioReport { scenario: scenario.name.clone(), severity: scenario.severity, params, retentions })
}

/// Run every configured scenario in order.
pub fn run_all(config: &EngineConfig) -> Result<Vec<ScenarioReport>, EngineError> {
    config.scenarios.iter().map(|s| run_scenario(config, s)).collect()
}
