use serde::Serialize;

use crate::error::EngineError;

/// Tail level for VaR and TVaR.
pub const TAIL_LEVEL: f64 = 0.99;

/// Per-trial ceded totals for one (severity, retention) pair, plus the claim
/// counters accumulated alongside them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LossDistribution {
    /// Ceded loss of each simulated year. Order carries no meaning.
    pub losses: Vec<f64>,
    /// Claims strictly above the retention, across all trials.
    pub triggering_claims: u64,
    /// Every claim observed, across all trials.
    pub total_claims: u64,
}

impl LossDistribution {
    pub fn with_capacity(n_trials: usize) -> Self {
        Self { losses: Vec::with_capacity(n_trials), ..Self::default() }
    }

    pub fn record(&mut self, ceded: f64, n_claims: u64, triggering_claims: u64) {
        self.losses.push(ceded);
        self.total_claims += n_claims;
        self.triggering_claims += triggering_claims;
    }

    pub fn trials(&self) -> usize {
        self.losses.len()
    }

    /// Arithmetic mean. Zero for an empty distribution.
    pub fn mean(&self) -> f64 {
        if self.losses.is_empty() {
            return 0.0;
        }
        self.losses.iter().sum::<f64>() / self.losses.len() as f64
    }

    /// Standard deviation with divisor n, matching the reference pricing
    /// model's `np.std`.
    pub fn std_dev(&self) -> f64 {
        if self.losses.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self.losses.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / self.losses.len() as f64;
        variance.sqrt()
    }

    fn sorted(&self) -> Vec<f64> {
        let mut values = self.losses.clone();
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    /// Linear-interpolation percentile, `p` in [0, 1].
    pub fn percentile(&self, p: f64) -> f64 {
        interpolate(&self.sorted(), p)
    }

    /// Value at Risk at `level`.
    pub fn var(&self, level: f64) -> f64 {
        self.percentile(level)
    }

    /// Mean of every loss at or above VaR(`level`).
    ///
    /// Ties at the VaR boundary are all included, so the tail can hold more
    /// than `1 − level` of the trials.
    pub fn tvar(&self, level: f64) -> f64 {
        let sorted = self.sorted();
        tail_mean(&sorted, interpolate(&sorted, level))
    }

    /// Share of observed claims that reached the reinsurer.
    pub fn prob_reinsurer_pays(&self) -> Result<f64, EngineError> {
        if self.total_claims == 0 {
            return Err(EngineError::DivisionUndefined { trials: self.trials() });
        }
        Ok(self.triggering_claims as f64 / self.total_claims as f64)
    }
}

/// `values` must be sorted ascending. Returns 0 for an empty slice.
fn interpolate(values: &[f64], p: f64) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let h = p * (n - 1) as f64;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    if values[lo] == values[hi] {
        return values[lo];
    }
    // Clamped so the upper neighbour always lands in the tail.
    (values[lo] + (values[hi] - values[lo]) * frac).min(values[hi])
}

/// `values` must be sorted ascending and `threshold` must not exceed the
/// largest value. Returns 0 for an empty slice.
fn tail_mean(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let start = values.partition_point(|&x| x < threshold);
    let tail = &values[start..];
    debug_assert!(!tail.is_empty(), "threshold {threshold} above every value");
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Summary risk metrics for one retention level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub expected_ceded_loss: f64,
    pub risk_std_dev: f64,
    pub var_99: f64,
    pub tvar_99: f64,
    pub prob_reinsurer_pays: f64,
    pub value_for_money: f64,
}

impl RiskMetrics {
    /// Reduce a complete loss distribution. `premium` is the reinsurer's
    /// price for the layer and must be positive.
    pub fn from_distribution(dist: &LossDistribution, premium: f64) -> Result<Self, EngineError> {
        if !premium.is_finite() || premium <= 0.0 {
            return Err(EngineError::invalid("premium", format!("must be finite and > 0, got {premium}")));
        }
        let prob_reinsurer_pays = dist.prob_reinsurer_pays()?;

        let sorted = dist.sorted();
        let var_99 = interpolate(&sorted, TAIL_LEVEL);
        let tvar_99 = tail_mean(&sorted, var_99);
        let expected_ceded_loss = dist.mean();

        Ok(Self {
            expected_ceded_loss,
            risk_std_dev: dist.std_dev(),
            var_99,
            tvar_99,
            prob_reinsurer_pays,
            value_for_money: expected_ceded_loss / premium,
        })
    }
}
