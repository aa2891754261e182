//! Strategy registry
//!
//! Process-wide name-to-instance table, built once on first use and
//! read-only afterwards. Lookups after initialization take no lock, so
//! concurrent simulations can resolve strategies freely. Strategies are
//! stateless, so handing out the same `&'static dyn Strategy` to every
//! caller is safe.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::EngineError;
use crate::strategy::{
    Adaptive, AlwaysCooperate, AlwaysDefect, GenerousTitForTat, Gradual, GrimTrigger,
    HardMajority, Pavlov, Prober, Random, SoftMajority, Strategy, SuspiciousTitForTat, TitForTat,
    TitForTwoTats,
};

/// Name and description of one registered strategy, for the selection UI.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct StrategyInfo {
    pub name: &'static str,
    pub description: &'static str,
}

fn built_ins() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(AlwaysCooperate),
        Box::new(AlwaysDefect),
        Box::new(TitForTat),
        Box::new(GrimTrigger),
        Box::new(Pavlov),
        Box::new(Random),
        Box::new(TitForTwoTats),
        Box::new(GenerousTitForTat),
        Box::new(SuspiciousTitForTat),
        Box::new(Gradual),
        Box::new(Adaptive),
        Box::new(Prober),
        Box::new(SoftMajority),
        Box::new(HardMajority),
    ]
}

fn table() -> &'static HashMap<&'static str, Box<dyn Strategy>> {
    static TABLE: OnceLock<HashMap<&'static str, Box<dyn Strategy>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut map: HashMap<&'static str, Box<dyn Strategy>> = HashMap::new();
        for strategy in built_ins() {
            map.insert(strategy.name(), strategy);
        }
        map
    })
}

/// Resolve a strategy by name.
pub fn lookup(name: &str) -> Result<&'static dyn Strategy, EngineError> {
    table()
        .get(name)
        .map(|boxed| boxed.as_ref())
        .ok_or_else(|| EngineError::UnknownStrategy {
            name: name.to_string(),
        })
}

/// All registered strategy names, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = table().keys().copied().collect();
    names.sort_unstable();
    names
}

/// All registered strategies with descriptions, sorted by name.
pub fn descriptors() -> Vec<StrategyInfo> {
    let mut infos: Vec<StrategyInfo> = table()
        .values()
        .map(|s| StrategyInfo {
            name: s.name(),
            description: s.description(),
        })
        .collect();
    infos.sort_unstable_by_key(|info| info.name);
    infos
}
