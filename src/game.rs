//! Sequential simulation engine
//!
//! One run is inherently sequential: round i's decisions read the finalized
//! history of rounds 1..i-1, so round i+1 cannot begin before round i's
//! record exists. Independent runs share nothing mutable (each owns its rng
//! and histories) and may execute concurrently.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::SimulationConfig;
use crate::error::EngineError;
use crate::noise::NoiseModel;
use crate::payoff;
use crate::registry;
use crate::strategy::{Move, Strategy};

/// One finalized round. Moves are the actual, post-noise moves; the intent
/// that noise overrode is not recorded anywhere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based, contiguous.
    pub round: u32,
    #[serde(rename = "strategy1_move")]
    pub move_a: Move,
    #[serde(rename = "strategy2_move")]
    pub move_b: Move,
    #[serde(rename = "strategy1_score")]
    pub score_a: u8,
    #[serde(rename = "strategy2_score")]
    pub score_b: u8,
    #[serde(rename = "strategy1_cumulative")]
    pub cumulative_a: u32,
    #[serde(rename = "strategy2_cumulative")]
    pub cumulative_b: u32,
}

/// Result of a completed run. Only ever produced whole: a failed run yields
/// an error and no partial history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(rename = "strategy1_total_score")]
    pub total_score_a: u32,
    #[serde(rename = "strategy2_total_score")]
    pub total_score_b: u32,
    #[serde(rename = "history")]
    pub rounds: Vec<RoundRecord>,
}

impl SimulationResult {
    /// Pure aggregation over a finished history: totals are the final
    /// cumulative values. Derived statistics (cooperation rate, winner) are
    /// trivially reducible from the rounds and stay with the consumer.
    pub fn from_rounds(rounds: Vec<RoundRecord>) -> Self {
        let (total_score_a, total_score_b) = rounds
            .last()
            .map(|r| (r.cumulative_a, r.cumulative_b))
            .unwrap_or((0, 0));
        Self {
            total_score_a,
            total_score_b,
            rounds,
        }
    }
}

/// Execute one round against the history so far.
///
/// Both strategies decide from the same prefix before either move is
/// revealed, then noise corrupts each intent with an independent draw, and
/// the corrupted pair is scored.
#[allow(clippy::too_many_arguments)]
fn play_round(
    round: u32,
    strategy_a: &dyn Strategy,
    strategy_b: &dyn Strategy,
    history_a: &[Move],
    history_b: &[Move],
    noise: &NoiseModel,
    rng: &mut SmallRng,
    cumulative_a: u32,
    cumulative_b: u32,
) -> Result<RoundRecord, EngineError> {
    let intended_a = strategy_a
        .decide(history_a, history_b, rng)
        .map_err(|source| EngineError::StrategyFailure {
            strategy: strategy_a.name().to_string(),
            round,
            source,
        })?;
    let intended_b = strategy_b
        .decide(history_b, history_a, rng)
        .map_err(|source| EngineError::StrategyFailure {
            strategy: strategy_b.name().to_string(),
            round,
            source,
        })?;

    let move_a = noise.apply(intended_a, rng);
    let move_b = noise.apply(intended_b, rng);

    let (score_a, score_b) = payoff(move_a, move_b);

    Ok(RoundRecord {
        round,
        move_a,
        move_b,
        score_a,
        score_b,
        cumulative_a: cumulative_a + score_a as u32,
        cumulative_b: cumulative_b + score_b as u32,
    })
}

/// Run a complete simulation: validate, resolve strategies, seed the
/// per-run rng, execute every round in order, aggregate.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationResult, EngineError> {
    config.validate()?;
    let strategy_a = registry::lookup(&config.strategy1)?;
    let strategy_b = registry::lookup(&config.strategy2)?;

    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let noise = NoiseModel::new(config.noise);

    debug!(
        strategy1 = %config.strategy1,
        strategy2 = %config.strategy2,
        rounds = config.rounds,
        noise = config.noise,
        "starting simulation"
    );

    let mut history_a: Vec<Move> = Vec::with_capacity(config.rounds as usize);
    let mut history_b: Vec<Move> = Vec::with_capacity(config.rounds as usize);
    let mut rounds: Vec<RoundRecord> = Vec::with_capacity(config.rounds as usize);
    let mut cumulative_a = 0u32;
    let mut cumulative_b = 0u32;

    for round in 1..=config.rounds {
        let record = play_round(
            round,
            strategy_a,
            strategy_b,
            &history_a,
            &history_b,
            &noise,
            &mut rng,
            cumulative_a,
            cumulative_b,
        )?;
        trace!(round, move_a = ?record.move_a, move_b = ?record.move_b, "round finalized");

        cumulative_a = record.cumulative_a;
        cumulative_b = record.cumulative_b;
        history_a.push(record.move_a);
        history_b.push(record.move_b);
        rounds.push(record);
    }

    debug!(
        total_score_a = cumulative_a,
        total_score_b = cumulative_b,
        "simulation complete"
    );

    Ok(SimulationResult::from_rounds(rounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: Move = Move::Cooperate;
    const D: Move = Move::Defect;

    fn run(s1: &str, s2: &str, rounds: u32, noise: f64) -> SimulationResult {
        let config = SimulationConfig::new(s1, s2, rounds, noise).with_seed(42);
        run_simulation(&config).unwrap()
    }

    fn assert_uniform_rounds(result: &SimulationResult, moves: (Move, Move), scores: (u8, u8)) {
        for record in &result.rounds {
            assert_eq!((record.move_a, record.move_b), moves, "round {}", record.round);
            assert_eq!(
                (record.score_a, record.score_b),
                scores,
                "round {}",
                record.round
            );
        }
    }

    #[test]
    fn test_cooperator_vs_defector() {
        let result = run("AlwaysCooperate", "AlwaysDefect", 5, 0.0);
        assert_eq!(result.rounds.len(), 5);
        assert_uniform_rounds(&result, (C, D), (0, 5));
        assert_eq!(result.total_score_a, 0);
        assert_eq!(result.total_score_b, 25);
    }

    #[test]
    fn test_tft_vs_tft() {
        let result = run("TitForTat", "TitForTat", 10, 0.0);
        assert_uniform_rounds(&result, (C, C), (3, 3));
        assert_eq!(result.total_score_a, 30);
        assert_eq!(result.total_score_b, 30);
    }

    #[test]
    fn test_defector_vs_defector() {
        let result = run("AlwaysDefect", "AlwaysDefect", 3, 0.0);
        assert_uniform_rounds(&result, (D, D), (1, 1));
        assert_eq!(result.total_score_a, 3);
        assert_eq!(result.total_score_b, 3);
    }

    #[test]
    fn test_tft_vs_always_defect() {
        let result = run("TitForTat", "AlwaysDefect", 4, 0.0);
        assert_eq!((result.rounds[0].move_a, result.rounds[0].move_b), (C, D));
        assert_eq!((result.rounds[0].score_a, result.rounds[0].score_b), (0, 5));
        for record in result.rounds.iter().skip(1) {
            assert_eq!((record.move_a, record.move_b), (D, D));
            assert_eq!((record.score_a, record.score_b), (1, 1));
        }
        assert_eq!(result.total_score_a, 3);
        assert_eq!(result.total_score_b, 8);
    }

    #[test]
    fn test_full_noise_inverts_every_move() {
        let result = run("AlwaysCooperate", "AlwaysCooperate", 2, 1.0);
        assert_uniform_rounds(&result, (D, D), (1, 1));
        assert_eq!(result.total_score_a, 2);
        assert_eq!(result.total_score_b, 2);
    }

    #[test]
    fn test_grim_trigger_defects_forever_after_noise_flip() {
        // Full noise turns AlwaysCooperate's round-1 intent into a defection;
        // GrimTrigger must treat the corrupted move as genuine from round 2 on.
        let result = run("GrimTrigger", "AlwaysCooperate", 5, 1.0);
        // Round 1: both intents C, both flipped to D.
        assert_eq!((result.rounds[0].move_a, result.rounds[0].move_b), (D, D));
        // From round 2 Grim intends D, flipped back to C; opponent stays D.
        for record in result.rounds.iter().skip(1) {
            assert_eq!((record.move_a, record.move_b), (C, D));
        }
    }

    #[test]
    fn test_round_indices_contiguous() {
        let result = run("Random", "Random", 50, 0.3);
        for (i, record) in result.rounds.iter().enumerate() {
            assert_eq!(record.round, i as u32 + 1);
        }
    }

    #[test]
    fn test_seeded_runs_identical() {
        let config = SimulationConfig::new("Random", "Random", 100, 0.2).with_seed(7);
        let first = run_simulation(&config).unwrap();
        let second = run_simulation(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let base = SimulationConfig::new("Random", "Random", 100, 0.0);
        let first = run_simulation(&base.clone().with_seed(1)).unwrap();
        let second = run_simulation(&base.with_seed(2)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_noiseless_deterministic_pair_ignores_seed() {
        // With noise 0 and deterministic strategies the seed never matters.
        let base = SimulationConfig::new("TitForTat", "GrimTrigger", 50, 0.0);
        let first = run_simulation(&base.clone().with_seed(1)).unwrap();
        let second = run_simulation(&base.with_seed(999)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_rejected_before_execution() {
        let config = SimulationConfig::new("TitForTat", "TitForTat", 0, 0.0);
        assert_eq!(
            run_simulation(&config).unwrap_err().kind(),
            "invalid_parameter"
        );

        let config = SimulationConfig::new("TitForTat", "TitForTat", 10, 1.5);
        assert_eq!(
            run_simulation(&config).unwrap_err().kind(),
            "invalid_parameter"
        );

        let config = SimulationConfig::new("Bogus", "TitForTat", 10, 0.0);
        assert_eq!(
            run_simulation(&config).unwrap_err().kind(),
            "unknown_strategy"
        );
    }

    #[test]
    fn test_failing_strategy_aborts_run() {
        struct Exploding;
        impl Strategy for Exploding {
            fn name(&self) -> &'static str {
                "Exploding"
            }
            fn description(&self) -> &'static str {
                "fails on purpose"
            }
            fn decide(
                &self,
                _own: &[Move],
                _opp: &[Move],
                _rng: &mut SmallRng,
            ) -> anyhow::Result<Move> {
                anyhow::bail!("deliberate failure")
            }
        }

        let mut rng = SmallRng::seed_from_u64(0);
        let err = play_round(
            1,
            &Exploding,
            &crate::strategy::TitForTat,
            &[],
            &[],
            &NoiseModel::new(0.0),
            &mut rng,
            0,
            0,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "strategy_failure");
        assert!(err.to_string().contains("Exploding"));
    }
}
