// View state and its reducer.
//
// `ViewState` is the whole transient session: which screen is up, what is
// selected, the search text, and where the initial load stands. It only
// changes through `reduce`, which returns a fresh value, so every consumer
// sees a complete snapshot.

use serde::{Deserialize, Serialize};

use crate::model::{GameId, SystemId, NO_SELECTION};
use crate::nav::Route;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Screens the catalog can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    List,
    Search,
    EditGame,
    EditSystem,
    Stats,
}

/// Progress of the one-shot startup load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    /// Terminal for the session; carries the message shown to the user.
    Failed(String),
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub screen: Screen,
    /// Selected system id, or [`NO_SELECTION`].
    pub current_system: SystemId,
    /// Selected game id, or [`NO_SELECTION`].
    pub current_game: GameId,
    pub query: String,
    pub load: LoadStatus,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            screen: Screen::List,
            current_system: NO_SELECTION,
            current_game: NO_SELECTION,
            query: String::new(),
            load: LoadStatus::Loading,
        }
    }
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        self.load == LoadStatus::Loading
    }

    /// The load failure message, if the load failed.
    pub fn error(&self) -> Option<&str> {
        match &self.load {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Events and reducer
// ---------------------------------------------------------------------------

/// Everything that can change the view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The location fragment changed (including the initial one).
    FragmentChanged(String),
    /// Navigate to an already-parsed route.
    Navigate(Route),
    SetQuery(String),
    SetCurrentGame(GameId),
    SetCurrentSystem(SystemId),
    SetScreen(Screen),
    LoadSucceeded,
    LoadFailed(String),
}

/// Compute the state that follows `event`.
///
/// Unrecognised fragments return an unchanged copy of `state`.
pub fn reduce(state: &ViewState, event: &Event) -> ViewState {
    match event {
        Event::FragmentChanged(fragment) => match Route::parse(fragment) {
            Some(route) => apply_route(state, route),
            None => state.clone(),
        },
        Event::Navigate(route) => apply_route(state, *route),
        Event::SetQuery(query) => ViewState {
            query: query.clone(),
            ..state.clone()
        },
        Event::SetCurrentGame(id) => ViewState {
            current_game: *id,
            ..state.clone()
        },
        Event::SetCurrentSystem(id) => ViewState {
            current_system: *id,
            ..state.clone()
        },
        Event::SetScreen(screen) => ViewState {
            screen: *screen,
            ..state.clone()
        },
        Event::LoadSucceeded => ViewState {
            load: LoadStatus::Ready,
            ..state.clone()
        },
        Event::LoadFailed(message) => ViewState {
            load: LoadStatus::Failed(message.clone()),
            ..state.clone()
        },
    }
}

/// Apply a parsed route: set the screen and the selections it implies.
pub fn apply_route(state: &ViewState, route: Route) -> ViewState {
    let base = state.clone();
    match route {
        Route::Index => ViewState {
            screen: Screen::List,
            current_system: NO_SELECTION,
            current_game: NO_SELECTION,
            ..base
        },
        Route::Search => ViewState {
            screen: Screen::Search,
            current_system: NO_SELECTION,
            current_game: NO_SELECTION,
            ..base
        },
        // Stats leaves both selections as they were.
        Route::Stats => ViewState {
            screen: Screen::Stats,
            ..base
        },
        Route::System(id) => ViewState {
            screen: Screen::List,
            current_system: id,
            current_game: NO_SELECTION,
            ..base
        },
        Route::EditSystem(id) => ViewState {
            screen: Screen::EditSystem,
            current_system: id,
            current_game: NO_SELECTION,
            ..base
        },
        Route::EditGame(id) => ViewState {
            screen: Screen::EditGame,
            current_system: NO_SELECTION,
            current_game: id,
            ..base
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(state: &ViewState, fragment: &str) -> ViewState {
        reduce(state, &Event::FragmentChanged(fragment.to_string()))
    }

    #[test]
    fn initial_state() {
        let s = ViewState::default();
        assert_eq!(s.screen, Screen::List);
        assert_eq!(s.current_system, -1);
        assert_eq!(s.current_game, -1);
        assert_eq!(s.query, "");
        assert!(s.is_loading());
        assert_eq!(s.error(), None);
    }

    #[test]
    fn system_fragment() {
        let s = nav(&ViewState::default(), "#/system/7");
        assert_eq!(s.screen, Screen::List);
        assert_eq!(s.current_system, 7);
        assert_eq!(s.current_game, -1);
    }

    #[test]
    fn edit_game_fragment_clears_system() {
        let s = nav(&ViewState::default(), "#/system/7");
        let s = nav(&s, "#/edit-game/42");
        assert_eq!(s.screen, Screen::EditGame);
        assert_eq!(s.current_game, 42);
        assert_eq!(s.current_system, -1);
    }

    #[test]
    fn edit_system_fragment_clears_game() {
        let s = nav(&ViewState::default(), "#/edit-game/42");
        let s = nav(&s, "#/edit-system/3");
        assert_eq!(s.screen, Screen::EditSystem);
        assert_eq!(s.current_system, 3);
        assert_eq!(s.current_game, -1);
    }

    #[test]
    fn bogus_fragment_keeps_prior_state() {
        let prior = ViewState {
            screen: Screen::EditGame,
            current_system: -1,
            current_game: 42,
            query: "zel".into(),
            load: LoadStatus::Ready,
        };
        for fragment in ["#/bogus", "", "#/system/abc", "#/a/b/c/d"] {
            assert_eq!(nav(&prior, fragment), prior, "fragment {fragment:?}");
        }
    }

    #[test]
    fn index_and_search_clear_selections() {
        let selected = nav(&ViewState::default(), "#/system/7");

        let s = nav(&selected, "#/index");
        assert_eq!((s.screen, s.current_system, s.current_game), (Screen::List, -1, -1));

        let s = nav(&selected, "#/search");
        assert_eq!((s.screen, s.current_system, s.current_game), (Screen::Search, -1, -1));
    }

    #[test]
    fn stats_keeps_selections() {
        let selected = nav(&ViewState::default(), "#/system/7");
        let s = nav(&selected, "#/stats");
        assert_eq!(s.screen, Screen::Stats);
        assert_eq!(s.current_system, 7);
        assert_eq!(s.current_game, -1);
    }

    #[test]
    fn navigation_keeps_query_and_load_status() {
        let s = reduce(&ViewState::default(), &Event::SetQuery("mario".into()));
        let s = reduce(&s, &Event::LoadSucceeded);
        let s = nav(&s, "#/search");
        assert_eq!(s.query, "mario");
        assert_eq!(s.load, LoadStatus::Ready);
    }

    #[test]
    fn navigation_while_loading_still_applies() {
        let s = nav(&ViewState::default(), "#/stats");
        assert!(s.is_loading());
        assert_eq!(s.screen, Screen::Stats);
    }

    #[test]
    fn setters_replace_only_their_field() {
        let base = nav(&ViewState::default(), "#/system/7");

        let s = reduce(&base, &Event::SetCurrentGame(5));
        assert_eq!((s.current_game, s.current_system), (5, 7));

        let s = reduce(&base, &Event::SetCurrentSystem(2));
        assert_eq!((s.current_game, s.current_system), (-1, 2));

        let s = reduce(&base, &Event::SetScreen(Screen::Stats));
        assert_eq!((s.screen, s.current_system), (Screen::Stats, 7));

        let s = reduce(&base, &Event::SetQuery("ch".into()));
        assert_eq!(s.query, "ch");
        assert_eq!(base.query, "");
    }

    #[test]
    fn navigate_event_matches_fragment_event() {
        let base = ViewState::default();
        assert_eq!(
            reduce(&base, &Event::Navigate(Route::EditGame(9))),
            nav(&base, "#/edit-game/9")
        );
    }

    #[test]
    fn load_outcomes() {
        let s = reduce(&ViewState::default(), &Event::LoadFailed("boom".into()));
        assert!(!s.is_loading());
        assert_eq!(s.error(), Some("boom"));

        let s = reduce(&ViewState::default(), &Event::LoadSucceeded);
        assert_eq!(s.load, LoadStatus::Ready);
    }

    #[test]
    fn state_serializes() {
        let s = reduce(&ViewState::default(), &Event::LoadFailed("no route".into()));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["load"]["status"], "failed");
        assert_eq!(json["load"]["message"], "no route");
        let back: ViewState = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }
}
