//! Simulation engine for the iterated Prisoner's Dilemma
//!
//! Two strategies play a fixed number of rounds against each other. Each
//! round both sides choose a move from the observed history, an optional
//! noise process may flip either move before it is scored, and the payoff
//! matrix scores the resulting pair. The engine is CPU-bound and fully
//! synchronous; the boundary contract for a presentation layer lives in
//! [`api`].

pub mod api;
pub mod config;
pub mod error;
pub mod game;
pub mod noise;
pub mod registry;
pub mod strategy;

pub use api::{list_strategies, simulate, SimulationResponse};
pub use config::{SimulationConfig, MAX_ROUNDS};
pub use error::EngineError;
pub use game::{run_simulation, RoundRecord, SimulationResult};
pub use noise::NoiseModel;
pub use registry::StrategyInfo;
pub use strategy::{Move, Strategy};

/// Payoff matrix for the Prisoner's Dilemma
/// Returns (score_a, score_b)
pub fn payoff(a: Move, b: Move) -> (u8, u8) {
    match (a, b) {
        (Move::Cooperate, Move::Cooperate) => (3, 3),
        (Move::Cooperate, Move::Defect) => (0, 5),
        (Move::Defect, Move::Cooperate) => (5, 0),
        (Move::Defect, Move::Defect) => (1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoff_matrix() {
        assert_eq!(payoff(Move::Cooperate, Move::Cooperate), (3, 3));
        assert_eq!(payoff(Move::Cooperate, Move::Defect), (0, 5));
        assert_eq!(payoff(Move::Defect, Move::Cooperate), (5, 0));
        assert_eq!(payoff(Move::Defect, Move::Defect), (1, 1));
    }
}
