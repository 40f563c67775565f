// Derived views: what each screen shows, computed from the entity store and
// the view state. Views own their data so they can cross threads or be
// serialized for any renderer.

use serde::{Deserialize, Serialize};

use crate::badge::{badges_for, Badge};
use crate::dates::format_release;
use crate::ingest::EntityStore;
use crate::model::{Game, GameId, System, SystemId};
use crate::nav::Route;
use crate::query::{search_results, selected_game, selected_system, visible_games};
use crate::state::{LoadStatus, Screen, ViewState};
use crate::stats::{build_report, StatsReport};

/// Label of the chooser entry that clears the system filter.
pub const NO_SYSTEM_LABEL: &str = "-No System-";

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTab {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Screen tabs. Edit screens add their own tab, which is then the active one.
pub fn nav_menu(screen: Screen) -> Vec<NavTab> {
    let tab = |label: &str, href: String, active: bool| NavTab {
        label: label.to_string(),
        href,
        active,
    };
    let mut tabs = vec![
        tab("List", Route::Index.href(), screen == Screen::List),
        tab("Search", Route::Search.href(), screen == Screen::Search),
        tab("Stats", Route::Stats.href(), screen == Screen::Stats),
    ];
    match screen {
        Screen::EditGame => tabs.push(tab("Edit Game", "#".to_string(), true)),
        Screen::EditSystem => tabs.push(tab("Edit System", "#".to_string(), true)),
        _ => {}
    }
    tabs
}

/// One row of a game table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRow {
    pub id: GameId,
    pub name: String,
    pub release: Option<String>,
    pub comment: String,
    /// Owning system label; only filled where the table shows a system column.
    pub system: Option<String>,
    pub badges: Vec<Badge>,
    pub edit_href: String,
}

impl GameRow {
    fn new(game: &Game, system: Option<&System>) -> Self {
        GameRow {
            id: game.id,
            name: game.name.clone(),
            release: format_release(&game.release),
            comment: game.comment.clone(),
            system: system.map(System::label),
            badges: badges_for(game),
            edit_href: Route::EditGame(game.id).href(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChooserEntry {
    pub label: String,
    pub href: String,
}

/// The system chooser: a "no system" entry, then every system in canonical
/// order.
pub fn system_chooser(store: &EntityStore) -> Vec<ChooserEntry> {
    std::iter::once(ChooserEntry {
        label: NO_SYSTEM_LABEL.to_string(),
        href: Route::Index.href(),
    })
    .chain(store.systems().iter().map(|s| ChooserEntry {
        label: s.label(),
        href: Route::System(s.id).href(),
    }))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub id: SystemId,
    pub label: String,
    pub release: Option<String>,
    pub comments: String,
    pub edit_href: String,
}

impl From<&System> for SystemInfo {
    fn from(system: &System) -> Self {
        SystemInfo {
            id: system.id,
            label: system.label(),
            release: format_release(&system.release),
            comments: system.comments.clone(),
            edit_href: Route::EditSystem(system.id).href(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemOption {
    pub id: SystemId,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagField {
    pub badge: Badge,
    pub label: String,
    pub checked: bool,
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListView {
    pub nav: Vec<NavTab>,
    pub chooser: Vec<ChooserEntry>,
    /// `None` means no system filter: every game is shown.
    pub system: Option<SystemInfo>,
    pub games: Vec<GameRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchView {
    pub nav: Vec<NavTab>,
    pub query: String,
    pub results: Vec<GameRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsView {
    pub nav: Vec<NavTab>,
    pub report: StatsReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditGameView {
    pub nav: Vec<NavTab>,
    pub game: Game,
    pub system: System,
    pub system_options: Vec<SystemOption>,
    pub flags: Vec<FlagField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSystemView {
    pub nav: Vec<NavTab>,
    pub system: Option<System>,
}

/// The whole screen, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    Loading,
    Error(String),
    List(ListView),
    Search(SearchView),
    Stats(StatsView),
    EditGame(EditGameView),
    EditSystem(EditSystemView),
    /// The edit-game screen with a selection that matches no game.
    NotFound,
}

/// Derive the current page. Loading wins over everything, then a load error.
pub fn render_page(store: &EntityStore, state: &ViewState) -> Page {
    match &state.load {
        LoadStatus::Loading => return Page::Loading,
        LoadStatus::Failed(message) => return Page::Error(message.clone()),
        LoadStatus::Ready => {}
    }

    let nav = nav_menu(state.screen);
    match state.screen {
        Screen::List => Page::List(list_view(store, state, nav)),
        Screen::Search => Page::Search(search_view(store, state, nav)),
        Screen::Stats => Page::Stats(StatsView {
            nav,
            report: build_report(store),
        }),
        Screen::EditGame => match edit_game_view(store, state.current_game, nav) {
            Some(view) => Page::EditGame(view),
            None => Page::NotFound,
        },
        Screen::EditSystem => Page::EditSystem(EditSystemView {
            nav,
            system: selected_system(store, state.current_system).cloned(),
        }),
    }
}

fn list_view(store: &EntityStore, state: &ViewState, nav: Vec<NavTab>) -> ListView {
    ListView {
        nav,
        chooser: system_chooser(store),
        system: selected_system(store, state.current_system).map(SystemInfo::from),
        games: visible_games(store, state.current_system)
            .into_iter()
            .map(|g| GameRow::new(g, None))
            .collect(),
    }
}

fn search_view(store: &EntityStore, state: &ViewState, nav: Vec<NavTab>) -> SearchView {
    SearchView {
        nav,
        query: state.query.clone(),
        results: search_results(store, &state.query)
            .into_iter()
            .map(|g| GameRow::new(g, Some(store.system_for(g))))
            .collect(),
    }
}

fn edit_game_view(store: &EntityStore, id: GameId, nav: Vec<NavTab>) -> Option<EditGameView> {
    let game = selected_game(store, id)?;
    let system = store.system_for(game);
    Some(EditGameView {
        nav,
        game: game.clone(),
        system: system.clone(),
        system_options: store
            .systems()
            .iter()
            .map(|s| SystemOption {
                id: s.id,
                label: s.label(),
                selected: s.id == system.id,
            })
            .collect(),
        flags: Badge::ALL
            .into_iter()
            .map(|badge| FlagField {
                badge,
                label: badge.question().to_string(),
                checked: game.has(badge),
            })
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
