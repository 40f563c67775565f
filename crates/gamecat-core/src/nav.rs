// Navigation: the location-fragment grammar.
//
//   #/index | #/search | #/stats
//   #/system/<id> | #/edit-system/<id> | #/edit-game/<id>
//
// The first segment is never inspected, so `#!/edit-game/3` parses the same
// as `#/edit-game/3`. Anything else is not a route and leaves the view state
// alone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{GameId, SystemId};

/// A recognised navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Game list, no filter.
    Index,
    Search,
    Stats,
    /// Game list filtered to one system.
    System(SystemId),
    EditSystem(SystemId),
    EditGame(GameId),
}

impl Route {
    /// Parse a location fragment. `None` means "not a route".
    pub fn parse(fragment: &str) -> Option<Route> {
        let parts: Vec<&str> = fragment.split('/').collect();
        match parts.as_slice() {
            [_, token] => match *token {
                "index" => Some(Route::Index),
                "search" => Some(Route::Search),
                "stats" => Some(Route::Stats),
                _ => None,
            },
            [_, keyword, value] => {
                let id = parse_id(value)?;
                match *keyword {
                    "system" => Some(Route::System(id)),
                    "edit-system" => Some(Route::EditSystem(id)),
                    "edit-game" => Some(Route::EditGame(id)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Canonical fragment for this route.
    pub fn href(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Index => write!(f, "#/index"),
            Route::Search => write!(f, "#/search"),
            Route::Stats => write!(f, "#/stats"),
            Route::System(id) => write!(f, "#/system/{id}"),
            Route::EditSystem(id) => write!(f, "#/edit-system/{id}"),
            Route::EditGame(id) => write!(f, "#/edit-game/{id}"),
        }
    }
}

/// Parse a location fragment into a route. Same as [`Route::parse`].
pub fn parse_fragment(fragment: &str) -> Option<Route> {
    Route::parse(fragment)
}

fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}
