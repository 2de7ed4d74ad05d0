use crate::types::Retention;

/// Failures surfaced by the parameterizer and the risk engine.
///
/// None of these are recoverable for the scenario or retention being
/// evaluated; callers decide whether to report and move on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("no reinsurance premium quoted for retention {0}")]
    MissingPremium(Retention),

    #[error("P(reinsurer pays) undefined: no claims observed across {trials} trials")]
    DivisionUndefined { trials: usize },
}

impl EngineError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }
}
