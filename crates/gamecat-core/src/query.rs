// Query engine: canonical sorts, by-system filtering, free-text search and
// the fallback-aware lookups every screen leans on.
//
// Everything here is a pure function of its inputs and re-derived on each
// read.

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::ingest::EntityStore;
use crate::model::{Game, GameId, System, SystemId, FALLBACK_SYSTEM, NO_SELECTION};

/// Queries shorter than this (in characters) return no results.
pub const MIN_QUERY_LEN: usize = 2;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Canonical system order: company, then name. Case-sensitive.
pub fn system_order(a: &System, b: &System) -> Ordering {
    a.company.cmp(&b.company).then_with(|| a.name.cmp(&b.name))
}

/// Canonical game order: name only. Case-sensitive.
pub fn game_order(a: &Game, b: &Game) -> Ordering {
    a.name.cmp(&b.name)
}

/// Sort systems in place into canonical order.
pub fn sort_systems(systems: &mut [System]) {
    systems.sort_by(system_order);
}

/// Sort games in place by name. Stable: equal names keep their relative
/// order. Works on owned games and on borrowed views alike.
pub fn sort_games<G: Borrow<Game>>(games: &mut [G]) {
    games.sort_by(|a, b| game_order(a.borrow(), b.borrow()));
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub fn system_by_id(id: SystemId, systems: &[System]) -> Option<&System> {
    systems.iter().find(|s| s.id == id)
}

/// The system owning `game`, or [`FALLBACK_SYSTEM`] when its `sysid`
/// matches nothing.
pub fn resolve_system<'a>(game: &Game, systems: &'a [System]) -> &'a System {
    system_by_id(game.sysid, systems).unwrap_or(&*FALLBACK_SYSTEM)
}

/// The selected system, if a selection is active and it exists.
pub fn selected_system(store: &EntityStore, id: SystemId) -> Option<&System> {
    if id == NO_SELECTION {
        return None;
    }
    store.system_by_id(id)
}

/// The selected game, if a selection is active and it exists.
pub fn selected_game(store: &EntityStore, id: GameId) -> Option<&Game> {
    if id == NO_SELECTION {
        return None;
    }
    store.game_by_id(id)
}

// ---------------------------------------------------------------------------
// Filter and search
// ---------------------------------------------------------------------------

/// Games filed under `system_id`, or every game when `system_id` is
/// [`NO_SELECTION`]. Input order is preserved.
pub fn games_for_system(games: &[Game], system_id: SystemId) -> Vec<&Game> {
    if system_id == NO_SELECTION {
        return games.iter().collect();
    }
    games.iter().filter(|g| g.sysid == system_id).collect()
}

/// Case-insensitive substring search over name and comment.
///
/// Returns nothing for queries under [`MIN_QUERY_LEN`] characters. Input
/// order is preserved.
pub fn search_games<'a>(games: &'a [Game], query: &str) -> Vec<&'a Game> {
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    games
        .iter()
        .filter(|g| {
            g.name.to_lowercase().contains(&needle) || g.comment.to_lowercase().contains(&needle)
        })
        .collect()
}

/// The list screen's game list: filtered by the selected system, sorted.
pub fn visible_games(store: &EntityStore, system_id: SystemId) -> Vec<&Game> {
    let mut games = games_for_system(store.games(), system_id);
    sort_games(&mut games);
    games
}

/// The search screen's result list, sorted.
pub fn search_results<'a>(store: &'a EntityStore, query: &str) -> Vec<&'a Game> {
    let mut games = search_games(store.games(), query);
    sort_games(&mut games);
    games
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
