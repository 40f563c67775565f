// Catalog entities: hardware systems and the games filed under them.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::badge::Badge;

/// Identity of a [`System`].
pub type SystemId = i64;

/// Identity of a [`Game`].
pub type GameId = i64;

/// Selection value meaning "nothing selected".
pub const NO_SELECTION: i64 = -1;

/// Release-date sentinel meaning the date is unknown.
pub const UNKNOWN_RELEASE: &str = "0000-00-00";

/// Stand-in for a game whose `sysid` matches no known system.
///
/// Never part of an [`EntityStore`](crate::ingest::EntityStore) system list.
pub static FALLBACK_SYSTEM: LazyLock<System> = LazyLock::new(|| System {
    id: NO_SELECTION,
    name: "UNKNOWN".to_string(),
    company: String::new(),
    release: UNKNOWN_RELEASE.to_string(),
    comments: String::new(),
    num: None,
});

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// A hardware platform (console, handheld, computer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    pub id: SystemId,
    pub name: String,
    pub company: String,
    /// `YYYY-MM-DD`, or [`UNKNOWN_RELEASE`].
    pub release: String,
    pub comments: String,
    /// Optional numeric column some data services attach to system rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<i64>,
}

impl System {
    /// Display label used by choosers and stats rows: `"<company> <name>"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.company, self.name)
    }

    /// Whether this is the fallback record rather than a real system.
    pub fn is_fallback(&self) -> bool {
        self.id == NO_SELECTION
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// A catalog entry. `sysid` is a foreign key into the system list and is
/// allowed to dangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub sysid: SystemId,
    pub name: String,
    pub comment: String,
    pub release: String,
    pub has_case: u8,
    pub has_docs: u8,
    pub is_ghit: u8,
    pub is_limited: u8,
    pub is_complete: u8,
    pub is_broken: u8,
}

impl Game {
    /// Raw value of the flag column backing `badge`.
    pub fn flag(&self, badge: Badge) -> u8 {
        match badge {
            Badge::Case => self.has_case,
            Badge::Docs => self.has_docs,
            Badge::GreatestHits => self.is_ghit,
            Badge::Limited => self.is_limited,
            Badge::Complete => self.is_complete,
            Badge::Broken => self.is_broken,
        }
    }

    /// Whether the flag backing `badge` is set (equals 1).
    pub fn has(&self, badge: Badge) -> bool {
        self.flag(badge) == 1
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn system(id: SystemId, company: &str, name: &str) -> System {
        System {
            id,
            name: name.to_string(),
            company: company.to_string(),
            release: UNKNOWN_RELEASE.to_string(),
            comments: String::new(),
            num: None,
        }
    }

    pub(crate) fn game(id: GameId, sysid: SystemId, name: &str) -> Game {
        Game {
            id,
            sysid,
            name: name.to_string(),
            comment: String::new(),
            release: UNKNOWN_RELEASE.to_string(),
            has_case: 0,
            has_docs: 0,
            is_ghit: 0,
            is_limited: 0,
            is_complete: 0,
            is_broken: 0,
        }
    }

    #[test]
    fn fallback_system_shape() {
        assert_eq!(FALLBACK_SYSTEM.id, -1);
        assert_eq!(FALLBACK_SYSTEM.name, "UNKNOWN");
        assert_eq!(FALLBACK_SYSTEM.company, "");
        assert_eq!(FALLBACK_SYSTEM.release, "0000-00-00");
        assert_eq!(FALLBACK_SYSTEM.comments, "");
        assert!(FALLBACK_SYSTEM.is_fallback());
    }

    #[test]
    fn label_joins_company_and_name() {
        assert_eq!(system(1, "Nintendo", "NES").label(), "Nintendo NES");
        assert_eq!(FALLBACK_SYSTEM.label(), " UNKNOWN");
    }

    #[test]
    fn flags_map_to_badges() {
        let mut g = game(1, 1, "Zelda");
        g.has_docs = 1;
        g.is_broken = 1;
        assert!(g.has(Badge::Docs));
        assert!(g.has(Badge::Broken));
        assert!(!g.has(Badge::Case));
        assert_eq!(g.flag(Badge::Limited), 0);
    }
}
