//! Boundary contract
//!
//! The request/response pair a presentation layer consumes. Transport (HTTP,
//! JSON framing, CORS) lives outside this crate; these types define the wire
//! shape it would carry and the validation it relies on.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::EngineError;
use crate::game::{run_simulation, SimulationResult};
use crate::registry::{self, StrategyInfo};

/// Response envelope: the request echoed back plus the full results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub metadata: SimulationConfig,
    pub results: SimulationResult,
}

/// Run one simulation request end to end.
///
/// Every parameter is validated before any round executes; a failed check
/// rejects the whole request and no history is produced.
pub fn simulate(request: SimulationConfig) -> Result<SimulationResponse, EngineError> {
    let results = run_simulation(&request)?;
    info!(
        strategy1 = %request.strategy1,
        strategy2 = %request.strategy2,
        rounds = request.rounds,
        total_score_a = results.total_score_a,
        total_score_b = results.total_score_b,
        "simulation served"
    );
    Ok(SimulationResponse {
        metadata: request,
        results,
    })
}

/// The read-only strategy catalogue, sorted by name.
pub fn list_strategies() -> Vec<StrategyInfo> {
    registry::descriptors()
}
