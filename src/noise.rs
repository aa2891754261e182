//! Noise model
//!
//! Each player's intended move passes through one independent Bernoulli
//! trial per round; on success the move is flipped. The corrupted move is
//! what gets scored and what both strategies see in later history lookups,
//! so a player cannot tell a genuine defection from a transmission error.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::strategy::Move;

#[derive(Clone, Copy, Debug)]
pub struct NoiseModel {
    level: f64,
}

impl NoiseModel {
    /// `level` must already be validated into [0, 1].
    pub fn new(level: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&level));
        Self { level }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// One Bernoulli trial: flip with probability `level`.
    pub fn apply(&self, intended: Move, rng: &mut SmallRng) -> Move {
        if rng.gen_bool(self.level) {
            intended.invert()
        } else {
            intended
        }
    }
}
