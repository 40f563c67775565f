// Ingestion: turns the loosely typed record lists served by the data
// service into the strict entity store.
//
// Numeric columns may arrive as JSON numbers or as numeric strings; both are
// coerced to integers here and nowhere else. Only `id` and `sysid` are hard
// requirements: flags and `num` degrade to 0 / `None`. Text columns
// tolerate `null`.

use std::collections::HashSet;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Game, GameId, System, SystemId, UNKNOWN_RELEASE};
use crate::query::{resolve_system, sort_systems};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{kind} payload is not a JSON array")]
    NotAnArray { kind: &'static str },

    #[error("{kind} record #{index} is malformed: {source}")]
    Record {
        kind: &'static str,
        index: usize,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Entity store
// ---------------------------------------------------------------------------

/// Immutable snapshot of every system and game, replaced wholesale on reload.
///
/// Systems are held in (company, name) order. Games keep the order the data
/// service delivered them in; display paths sort them on the way out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityStore {
    systems: Vec<System>,
    games: Vec<Game>,
}

impl EntityStore {
    /// Build a store from already-typed records. Sorts the system list.
    pub fn new(mut systems: Vec<System>, games: Vec<Game>) -> Self {
        sort_systems(&mut systems);
        EntityStore { systems, games }
    }

    /// The store seen before the first load completes.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn system_by_id(&self, id: SystemId) -> Option<&System> {
        self.systems.iter().find(|s| s.id == id)
    }

    pub fn game_by_id(&self, id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Owning system of `game`, or the fallback system when `sysid` dangles.
    pub fn system_for(&self, game: &Game) -> &System {
        resolve_system(game, &self.systems)
    }

    /// Number of games whose `sysid` resolves to no system.
    pub fn dangling_games(&self) -> usize {
        self.games
            .iter()
            .filter(|g| self.system_by_id(g.sysid).is_none())
            .count()
    }
}

// ---------------------------------------------------------------------------
// Raw record shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawSystem {
    #[serde(deserialize_with = "lenient::int")]
    id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    company: String,
    #[serde(default, deserialize_with = "lenient::release")]
    release: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    comments: String,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    num: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawGame {
    #[serde(deserialize_with = "lenient::int")]
    id: i64,
    #[serde(deserialize_with = "lenient::int")]
    sysid: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    comment: String,
    #[serde(default, deserialize_with = "lenient::release")]
    release: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    has_case: u8,
    #[serde(default, deserialize_with = "lenient::flag")]
    has_docs: u8,
    #[serde(default, deserialize_with = "lenient::flag")]
    is_ghit: u8,
    #[serde(default, deserialize_with = "lenient::flag")]
    is_limited: u8,
    #[serde(default, deserialize_with = "lenient::flag")]
    is_complete: u8,
    #[serde(default, deserialize_with = "lenient::flag")]
    is_broken: u8,
}

impl From<RawSystem> for System {
    fn from(raw: RawSystem) -> Self {
        System {
            id: raw.id,
            name: raw.name,
            company: raw.company,
            release: raw.release.unwrap_or_else(|| UNKNOWN_RELEASE.to_string()),
            comments: raw.comments,
            num: raw.num,
        }
    }
}

impl From<RawGame> for Game {
    fn from(raw: RawGame) -> Self {
        Game {
            id: raw.id,
            sysid: raw.sysid,
            name: raw.name,
            comment: raw.comment,
            release: raw.release.unwrap_or_else(|| UNKNOWN_RELEASE.to_string()),
            has_case: raw.has_case,
            has_docs: raw.has_docs,
            is_ghit: raw.is_ghit,
            is_limited: raw.is_limited,
            is_complete: raw.is_complete,
            is_broken: raw.is_broken,
        }
    }
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Coerce the raw `/systems` and `/games` payloads into an [`EntityStore`].
///
/// Any malformed record fails the whole ingestion; there is no partial store.
pub fn ingest(systems: Value, games: Value) -> Result<EntityStore, IngestError> {
    let systems: Vec<System> = records::<RawSystem>(systems, "systems")?
        .into_iter()
        .map(System::from)
        .collect();
    let games: Vec<Game> = records::<RawGame>(games, "games")?
        .into_iter()
        .map(Game::from)
        .collect();

    warn_duplicates("systems", systems.iter().map(|s| s.id));
    warn_duplicates("games", games.iter().map(|g| g.id));

    let store = EntityStore::new(systems, games);
    debug!(
        systems = store.systems().len(),
        games = store.games().len(),
        dangling = store.dangling_games(),
        "ingested catalog"
    );
    Ok(store)
}

fn records<T>(payload: Value, kind: &'static str) -> Result<Vec<T>, IngestError>
where
    T: for<'de> Deserialize<'de>,
{
    let Value::Array(rows) = payload else {
        return Err(IngestError::NotAnArray { kind });
    };
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(row).map_err(|source| IngestError::Record {
                kind,
                index,
                source,
            })
        })
        .collect()
}

fn warn_duplicates(kind: &str, ids: impl Iterator<Item = i64>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            warn!("duplicate id {} in {}; lookups resolve to the first", id, kind);
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient field deserializers
// ---------------------------------------------------------------------------

mod lenient {
    use super::*;

    /// Integer from a JSON number or a numeric string.
    pub(super) fn coerce_int(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                })
            }
            _ => None,
        }
    }

    pub(super) fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        coerce_int(&value)
            .ok_or_else(|| de::Error::custom(format!("expected an integer, got {value}")))
    }

    /// Optional integer. Anything that does not coerce is carried as `None`.
    pub(super) fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_int(&value))
    }

    /// 0/1 flag. Booleans map to 1/0; anything else that is not a small
    /// integer reads as 0, so a bad flag only ever hides a badge.
    pub(super) fn flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if let Value::Bool(b) = value {
            return Ok(u8::from(b));
        }
        Ok(coerce_int(&value)
            .and_then(|n| u8::try_from(n).ok())
            .unwrap_or(0))
    }

    pub(super) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(de::Error::custom(format!("expected text, got {other}"))),
        }
    }

    pub(super) fn release<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = text(deserializer)?;
        Ok(if s.is_empty() { None } else { Some(s) })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_numeric_strings() {
        let store = ingest(
            json!([{ "id": "3", "name": "SNES", "company": "Nintendo", "release": "1991-08-23", "comments": "", "num": "12" }]),
            json!([{ "id": "10", "sysid": "3", "name": "F-Zero", "comment": "launch", "release": "1991-08-23",
                     "has_case": "1", "has_docs": 0, "is_ghit": "0", "is_limited": 0, "is_complete": "1", "is_broken": 0 }]),
        )
        .unwrap();

        let sys = &store.systems()[0];
        assert_eq!(sys.id, 3);
        assert_eq!(sys.num, Some(12));
        let game = &store.games()[0];
        assert_eq!(game.id, 10);
        assert_eq!(game.sysid, 3);
        assert_eq!(game.has_case, 1);
        assert_eq!(game.is_complete, 1);
        assert_eq!(store.system_for(game).name, "SNES");
    }

    #[test]
    fn accepts_native_numbers_and_integral_floats() {
        let store = ingest(
            json!([{ "id": 1, "name": "NES", "company": "Nintendo" }]),
            json!([{ "id": 2.0, "sysid": 1, "name": "Mario" }]),
        )
        .unwrap();
        assert_eq!(store.games()[0].id, 2);
    }

    #[test]
    fn missing_and_null_text_defaults() {
        let store = ingest(
            json!([{ "id": 1, "name": "NES", "company": null }]),
            json!([{ "id": 2, "sysid": 1, "name": "Mario", "comment": null }]),
        )
        .unwrap();
        assert_eq!(store.systems()[0].company, "");
        assert_eq!(store.systems()[0].release, UNKNOWN_RELEASE);
        assert_eq!(store.games()[0].comment, "");
        assert_eq!(store.games()[0].release, UNKNOWN_RELEASE);
        assert_eq!(store.games()[0].has_docs, 0);
    }

    #[test]
    fn sorts_systems_but_not_games() {
        let store = ingest(
            json!([
                { "id": 2, "company": "Sega", "name": "Genesis" },
                { "id": 3, "company": "Nintendo", "name": "SNES" },
                { "id": 1, "company": "Nintendo", "name": "NES" },
            ]),
            json!([
                { "id": 10, "sysid": 2, "name": "Sonic" },
                { "id": 11, "sysid": 1, "name": "Mario" },
            ]),
        )
        .unwrap();

        let systems: Vec<&str> = store.systems().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(systems, vec!["NES", "SNES", "Genesis"]);
        let games: Vec<&str> = store.games().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(games, vec!["Sonic", "Mario"]);
    }

    #[test]
    fn non_numeric_id_fails_whole_ingest() {
        let err = ingest(
            json!([{ "id": 1, "name": "NES", "company": "Nintendo" }]),
            json!([
                { "id": 2, "sysid": 1, "name": "Mario" },
                { "id": "abc", "sysid": 1, "name": "Zelda" },
            ]),
        )
        .unwrap_err();
        match err {
            IngestError::Record { kind, index, .. } => {
                assert_eq!(kind, "games");
                assert_eq!(index, 1);
            }
            other => panic!("expected Record error, got: {other}"),
        }
    }

    #[test]
    fn missing_sysid_is_malformed() {
        let err = ingest(json!([]), json!([{ "id": 2, "name": "Mario" }])).unwrap_err();
        assert!(matches!(err, IngestError::Record { kind: "games", index: 0, .. }));
    }

    #[test]
    fn non_array_payload_is_rejected() {
        let err = ingest(json!({ "systems": [] }), json!([])).unwrap_err();
        assert!(matches!(err, IngestError::NotAnArray { kind: "systems" }));
        assert_eq!(err.to_string(), "systems payload is not a JSON array");
    }

    #[test]
    fn dangling_sysid_resolves_to_fallback() {
        let store = ingest(
            json!([{ "id": 1, "name": "NES", "company": "Nintendo" }]),
            json!([{ "id": 2, "sysid": 99, "name": "Orphan" }]),
        )
        .unwrap();
        let game = &store.games()[0];
        assert_eq!(store.system_for(game).id, -1);
        assert_eq!(store.system_for(game).name, "UNKNOWN");
        assert_eq!(store.dangling_games(), 1);
        assert!(store.system_by_id(-1).is_none());
    }

    #[test]
    fn odd_flag_values_never_fail_ingest() {
        let store = ingest(
            json!([{ "id": 1, "name": "NES", "company": "Nintendo" }]),
            json!([
                { "id": 2, "sysid": 1, "name": "Mario", "has_case": true, "has_docs": false },
                { "id": 3, "sysid": 1, "name": "Zelda",
                  "has_case": "", "is_ghit": "yes", "is_broken": 300 },
                { "id": 4, "sysid": 1, "name": "Metroid", "is_limited": "1", "is_complete": 1.0 },
            ]),
        )
        .unwrap();

        let mario = store.game_by_id(2).unwrap();
        assert_eq!((mario.has_case, mario.has_docs), (1, 0));
        let zelda = store.game_by_id(3).unwrap();
        assert_eq!((zelda.has_case, zelda.is_ghit, zelda.is_broken), (0, 0, 0));
        let metroid = store.game_by_id(4).unwrap();
        assert_eq!((metroid.is_limited, metroid.is_complete), (1, 1));
    }

    #[test]
    fn non_numeric_num_is_carried_as_none() {
        let store = ingest(
            json!([
                { "id": 1, "name": "NES", "company": "Nintendo", "num": "n/a" },
                { "id": 2, "name": "SNES", "company": "Nintendo", "num": "" },
                { "id": 3, "name": "N64", "company": "Nintendo", "num": 64 },
            ]),
            json!([]),
        )
        .unwrap();
        let nums: Vec<Option<i64>> = store.systems().iter().map(|s| s.num).collect();
        assert_eq!(nums, vec![Some(64), None, None]);
    }

    #[test]
    fn non_numeric_sysid_still_fails() {
        let err = ingest(json!([]), json!([{ "id": 2, "sysid": "n/a", "name": "Mario" }]))
            .unwrap_err();
        assert!(matches!(err, IngestError::Record { kind: "games", index: 0, .. }));
    }

    #[test]
    fn coerce_int_rules() {
        use lenient::coerce_int;
        assert_eq!(coerce_int(&json!(" 42 ")), Some(42));
        assert_eq!(coerce_int(&json!("-1")), Some(-1));
        assert_eq!(coerce_int(&json!(7.5)), None);
        assert_eq!(coerce_int(&json!("")), None);
        assert_eq!(coerce_int(&json!(true)), None);
        assert_eq!(coerce_int(&json!(null)), None);
    }
}
