//! Simulation configuration and validation

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::registry;

/// Cap on rounds per request, so one request cannot pin a core indefinitely.
pub const MAX_ROUNDS: u32 = 1000;

/// One validated simulation request. Immutable once validated; constructed
/// once per request and echoed back verbatim in the response metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub strategy1: String,
    pub strategy2: String,
    pub rounds: u32,
    pub noise: f64,
    /// Seed for the per-run rng. Absent means seed from entropy; supplying
    /// one makes the run reproducible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn new(
        strategy1: impl Into<String>,
        strategy2: impl Into<String>,
        rounds: u32,
        noise: f64,
    ) -> Self {
        Self {
            strategy1: strategy1.into(),
            strategy2: strategy2.into(),
            rounds,
            noise,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter before any round executes. A failure rejects
    /// the whole request; no partial results.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.rounds < 1 || self.rounds > MAX_ROUNDS {
            return Err(EngineError::InvalidParameter {
                parameter: "rounds",
                detail: format!("must be within [1, {}], got {}", MAX_ROUNDS, self.rounds),
            });
        }
        // `contains` is false for NaN, so NaN is rejected here too.
        if !(0.0..=1.0).contains(&self.noise) {
            return Err(EngineError::InvalidParameter {
                parameter: "noise",
                detail: format!("must be within [0, 1], got {}", self.noise),
            });
        }
        registry::lookup(&self.strategy1)?;
        registry::lookup(&self.strategy2)?;
        Ok(())
    }
}
