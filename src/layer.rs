use crate::types::Retention;

/// Per-claim excess-of-loss layer with unlimited cover above the retention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XolLayer {
    pub retention: Retention,
}

/// Result of applying the layer to one trial's claims.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cession {
    /// Sum of `max(0, s − R)` over the claims.
    pub ceded: f64,
    /// Claims strictly above the retention.
    pub triggering_claims: u64,
}

impl XolLayer {
    pub fn new(retention: Retention) -> Self {
        Self { retention }
    }

    /// Reinsurer's share of a single claim.
    pub fn ceded(&self, claim: f64) -> f64 {
        (claim - self.retention.0).max(0.0)
    }

    pub fn triggers(&self, claim: f64) -> bool {
        claim > self.retention.0
    }

    pub fn apply(&self, claims: &[f64]) -> Cession {
        claims.iter().fold(Cession::default(), |mut acc, &s| {
            acc.ceded += self.ceded(s);
            if self.triggers(s) {
                acc.triggering_claims += 1;
            }
            acc
        })
    }
}
