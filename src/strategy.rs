//! Strategy definitions
//!
//! Every strategy is a stateless unit struct: anything it "remembers" about
//! the match is recomputed from the history slices on each call. That keeps
//! `decide` a pure function of the observed history (plus the explicit rng
//! for the stochastic strategies), so a single instance can be shared across
//! concurrently running simulations.

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A move in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    /// The opposite move, used by the noise model to corrupt an intent.
    pub fn invert(self) -> Self {
        match self {
            Move::Cooperate => Move::Defect,
            Move::Defect => Move::Cooperate,
        }
    }
}

/// A decision unit for one side of a match.
///
/// `decide` is called once per round with the actual (post-noise) moves of
/// rounds `1..i-1`, never the current round's. Histories are passed own-first.
/// Built-ins never fail; the `Result` exists so a custom registered strategy
/// has an error channel, and any error aborts the whole run.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn decide(
        &self,
        own_history: &[Move],
        opponent_history: &[Move],
        rng: &mut SmallRng,
    ) -> Result<Move>;
}

impl std::fmt::Debug for dyn Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name()).finish()
    }
}

fn defections(history: &[Move]) -> usize {
    history.iter().filter(|m| **m == Move::Defect).count()
}

fn cooperations(history: &[Move]) -> usize {
    history.len() - defections(history)
}

/// Always cooperates, regardless of the opponent.
pub struct AlwaysCooperate;

impl Strategy for AlwaysCooperate {
    fn name(&self) -> &'static str {
        "AlwaysCooperate"
    }

    fn description(&self) -> &'static str {
        "Always cooperates, no matter what happens"
    }

    fn decide(&self, _own: &[Move], _opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        Ok(Move::Cooperate)
    }
}

/// Always defects, regardless of the opponent.
pub struct AlwaysDefect;

impl Strategy for AlwaysDefect {
    fn name(&self) -> &'static str {
        "AlwaysDefect"
    }

    fn description(&self) -> &'static str {
        "Always defects, pure selfishness"
    }

    fn decide(&self, _own: &[Move], _opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        Ok(Move::Defect)
    }
}

/// Copy the opponent's last move. Start with cooperate.
pub struct TitForTat;

impl Strategy for TitForTat {
    fn name(&self) -> &'static str {
        "TitForTat"
    }

    fn description(&self) -> &'static str {
        "Starts with cooperation, then copies opponent's last move"
    }

    fn decide(&self, _own: &[Move], opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        Ok(match opponent.last() {
            None => Move::Cooperate,
            Some(&m) => m,
        })
    }
}

/// Cooperate until the opponent defects once, then defect forever.
///
/// The trigger is derived by scanning the opponent history each call, never
/// by flipping an internal flag.
pub struct GrimTrigger;

impl Strategy for GrimTrigger {
    fn name(&self) -> &'static str {
        "GrimTrigger"
    }

    fn description(&self) -> &'static str {
        "Cooperates until opponent defects once, then defects forever"
    }

    fn decide(&self, _own: &[Move], opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        if opponent.contains(&Move::Defect) {
            Ok(Move::Defect)
        } else {
            Ok(Move::Cooperate)
        }
    }
}

/// Memoryless coin flip.
pub struct Random;

impl Strategy for Random {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn description(&self) -> &'static str {
        "Randomly cooperates or defects with 50% probability each"
    }

    fn decide(&self, _own: &[Move], _opponent: &[Move], rng: &mut SmallRng) -> Result<Move> {
        Ok(if rng.gen_bool(0.5) {
            Move::Cooperate
        } else {
            Move::Defect
        })
    }
}

/// Win-stay, lose-shift: repeat the last own move if it matched the
/// opponent's, otherwise switch.
pub struct Pavlov;

impl Strategy for Pavlov {
    fn name(&self) -> &'static str {
        "Pavlov"
    }

    fn description(&self) -> &'static str {
        "Win-Stay, Lose-Shift - repeats successful moves, changes unsuccessful ones"
    }

    fn decide(&self, own: &[Move], opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        let (Some(&last_own), Some(&last_opp)) = (own.last(), opponent.last()) else {
            return Ok(Move::Cooperate);
        };
        Ok(if last_own == last_opp {
            last_own
        } else {
            last_own.invert()
        })
    }
}

/// Defect only after two consecutive opponent defections.
pub struct TitForTwoTats;

impl Strategy for TitForTwoTats {
    fn name(&self) -> &'static str {
        "TitForTwoTats"
    }

    fn description(&self) -> &'static str {
        "Only retaliates after opponent defects twice in a row"
    }

    fn decide(&self, _own: &[Move], opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        Ok(match opponent {
            [.., Move::Defect, Move::Defect] => Move::Defect,
            _ => Move::Cooperate,
        })
    }
}

/// Tit-for-Tat with a chance to let a defection slide.
pub struct GenerousTitForTat;

impl GenerousTitForTat {
    const FORGIVENESS: f64 = 0.3;
}

impl Strategy for GenerousTitForTat {
    fn name(&self) -> &'static str {
        "GenerousTitForTat"
    }

    fn description(&self) -> &'static str {
        "Tit-for-Tat with a 30% chance to forgive a defection"
    }

    fn decide(&self, _own: &[Move], opponent: &[Move], rng: &mut SmallRng) -> Result<Move> {
        Ok(match opponent.last() {
            None => Move::Cooperate,
            Some(Move::Defect) if rng.gen_bool(Self::FORGIVENESS) => Move::Cooperate,
            Some(&m) => m,
        })
    }
}

/// Tit-for-Tat that opens with defection.
pub struct SuspiciousTitForTat;

impl Strategy for SuspiciousTitForTat {
    fn name(&self) -> &'static str {
        "SuspiciousTitForTat"
    }

    fn description(&self) -> &'static str {
        "Like Tit-for-Tat but starts with defection instead"
    }

    fn decide(&self, _own: &[Move], opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        Ok(match opponent.last() {
            None => Move::Defect,
            Some(&m) => m,
        })
    }
}

/// Escalating retaliation: after the opponent's Nth defection, punish with N
/// defections.
///
/// Derived arithmetically: after N observed defections this player should
/// have defected 1 + 2 + ... + N = N(N+1)/2 times in total, so defect while
/// behind that quota.
pub struct Gradual;

impl Strategy for Gradual {
    fn name(&self) -> &'static str {
        "Gradual"
    }

    fn description(&self) -> &'static str {
        "Punishes defections by defecting N times after Nth defection"
    }

    fn decide(&self, own: &[Move], opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        let theirs = defections(opponent);
        let mine = defections(own);
        let quota = theirs * (theirs + 1) / 2;
        Ok(if mine < quota {
            Move::Defect
        } else {
            Move::Cooperate
        })
    }
}

/// Fixed probing opening, then follow the opponent's overall cooperation rate.
pub struct Adaptive;

impl Adaptive {
    const OPENING: [Move; 6] = [
        Move::Cooperate,
        Move::Cooperate,
        Move::Defect,
        Move::Defect,
        Move::Cooperate,
        Move::Defect,
    ];
}

impl Strategy for Adaptive {
    fn name(&self) -> &'static str {
        "Adaptive"
    }

    fn description(&self) -> &'static str {
        "Learns from opponent - adapts based on their cooperation rate"
    }

    fn decide(&self, own: &[Move], opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        if own.len() < Self::OPENING.len() {
            return Ok(Self::OPENING[own.len()]);
        }
        let rate = cooperations(opponent) as f64 / opponent.len() as f64;
        Ok(if rate >= 0.5 {
            Move::Cooperate
        } else {
            Move::Defect
        })
    }
}

/// Open with D, C, C; if the opponent cooperated back in rounds 2 and 3,
/// settle into Tit-for-Tat, otherwise exploit with permanent defection.
pub struct Prober;

impl Prober {
    const PROBE: [Move; 3] = [Move::Defect, Move::Cooperate, Move::Cooperate];
}

impl Strategy for Prober {
    fn name(&self) -> &'static str {
        "Prober"
    }

    fn description(&self) -> &'static str {
        "Tests opponent with D, C, C pattern, then plays Tit-for-Tat if they cooperate"
    }

    fn decide(&self, own: &[Move], opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        if own.len() < Self::PROBE.len() {
            return Ok(Self::PROBE[own.len()]);
        }
        let forgiving = opponent.get(1) == Some(&Move::Cooperate)
            && opponent.get(2) == Some(&Move::Cooperate);
        Ok(if forgiving {
            match opponent.last() {
                None => Move::Cooperate,
                Some(&m) => m,
            }
        } else {
            Move::Defect
        })
    }
}

/// Cooperate as long as the opponent has cooperated at least as often as
/// defected.
pub struct SoftMajority;

impl Strategy for SoftMajority {
    fn name(&self) -> &'static str {
        "SoftMajority"
    }

    fn description(&self) -> &'static str {
        "Cooperates if opponent has cooperated at least as much as defected"
    }

    fn decide(&self, _own: &[Move], opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        if opponent.is_empty() || cooperations(opponent) >= defections(opponent) {
            Ok(Move::Cooperate)
        } else {
            Ok(Move::Defect)
        }
    }
}

/// Like SoftMajority, but a tie counts against the opponent.
pub struct HardMajority;

impl Strategy for HardMajority {
    fn name(&self) -> &'static str {
        "HardMajority"
    }

    fn description(&self) -> &'static str {
        "Defects if opponent has ever defected more than they have cooperated"
    }

    fn decide(&self, _own: &[Move], opponent: &[Move], _rng: &mut SmallRng) -> Result<Move> {
        if opponent.is_empty() || cooperations(opponent) > defections(opponent) {
            Ok(Move::Cooperate)
        } else {
            Ok(Move::Defect)
        }
    }
}
