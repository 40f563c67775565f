// Badge vocabulary: short display codes for a game's boolean flag columns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Game;

/// A flag column that renders as a short badge when set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    Case,
    Docs,
    GreatestHits,
    Limited,
    Complete,
    Broken,
}

impl Badge {
    /// Every badge, in display order.
    pub const ALL: [Badge; 6] = [
        Badge::Case,
        Badge::Docs,
        Badge::GreatestHits,
        Badge::Limited,
        Badge::Complete,
        Badge::Broken,
    ];

    /// Name of the record field carrying this flag.
    pub fn field(&self) -> &'static str {
        match self {
            Badge::Case => "has_case",
            Badge::Docs => "has_docs",
            Badge::GreatestHits => "is_ghit",
            Badge::Limited => "is_limited",
            Badge::Complete => "is_complete",
            Badge::Broken => "is_broken",
        }
    }

    /// Short display code.
    pub fn code(&self) -> &'static str {
        match self {
            Badge::Case => "CASE",
            Badge::Docs => "DOCS",
            Badge::GreatestHits => "GHIT",
            Badge::Limited => "LIM",
            Badge::Complete => "COM",
            Badge::Broken => "B!",
        }
    }

    /// Checkbox label used by the edit form.
    pub fn question(&self) -> &'static str {
        match self {
            Badge::Case => "Has Case?",
            Badge::Docs => "Has Documents?",
            Badge::GreatestHits => "Is Greatest Hits?",
            Badge::Limited => "Is Limited Edition?",
            Badge::Complete => "Is Complete?",
            Badge::Broken => "Is Broken?",
        }
    }

    /// Look a badge up by its record field name.
    pub fn from_field(field: &str) -> Option<Self> {
        Badge::ALL.into_iter().find(|b| b.field() == field)
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.code())
    }
}

/// Badges shown for `game`: those whose flag equals 1, in display order.
pub fn badges_for(game: &Game) -> Vec<Badge> {
    Badge::ALL.into_iter().filter(|b| game.has(*b)).collect()
}
