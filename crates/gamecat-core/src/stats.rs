// Stats aggregation: per-system game counts in first-occurrence order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ingest::EntityStore;
use crate::model::{Game, System, SystemId};

/// Game counts keyed by `sysid`, enumerated in the order each `sysid` was
/// first seen in the game list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameCounts(IndexMap<SystemId, usize>);

impl GameCounts {
    pub fn get(&self, sysid: SystemId) -> Option<usize> {
        self.0.get(&sysid).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(sysid, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (SystemId, usize)> + '_ {
        self.0.iter().map(|(id, n)| (*id, *n))
    }

    /// Sum of all counts, dangling ids included.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

/// Count games per `sysid`.
pub fn count_games(games: &[Game]) -> GameCounts {
    let mut counts = IndexMap::new();
    for game in games {
        *counts.entry(game.sysid).or_insert(0) += 1;
    }
    GameCounts(counts)
}

/// One per-system line of the stats screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCount {
    pub system: System,
    pub count: usize,
}

/// Everything the stats screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub total_games: usize,
    pub total_systems: usize,
    /// Rows in first-occurrence order. Ids that resolve to no system are
    /// counted in [`GameCounts`] but have no row here.
    pub per_system: Vec<SystemCount>,
}

/// Build the stats report from the store.
pub fn build_report(store: &EntityStore) -> StatsReport {
    let counts = count_games(store.games());
    let per_system = counts
        .iter()
        .filter_map(|(sysid, count)| {
            store.system_by_id(sysid).map(|system| SystemCount {
                system: system.clone(),
                count,
            })
        })
        .collect();

    StatsReport {
        total_games: store.games().len(),
        total_systems: store.systems().len(),
        per_system,
    }
}
