//! Engine error taxonomy
//!
//! Every failure is either a caller input error, caught at validation before
//! any round executes, or a programming error inside a custom strategy. The
//! engine never retries: apart from intentional noise the computation is
//! deterministic, so a retry would either reproduce the failure or silently
//! change the outcome.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Requested strategy name is not in the registry.
    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    /// Rounds out of bounds, or noise outside [0, 1].
    #[error("invalid parameter {parameter}: {detail}")]
    InvalidParameter {
        parameter: &'static str,
        detail: String,
    },

    /// A strategy's decision function failed mid-run. The run is aborted and
    /// no partial history is exposed.
    #[error("strategy {strategy} failed at round {round}: {source}")]
    StrategyFailure {
        strategy: String,
        round: u32,
        #[source]
        source: anyhow::Error,
    },
}

impl EngineError {
    /// Short machine-checkable kind, paired with the `Display` detail string.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::UnknownStrategy { .. } => "unknown_strategy",
            EngineError::InvalidParameter { .. } => "invalid_parameter",
            EngineError::StrategyFailure { .. } => "strategy_failure",
        }
    }
}
