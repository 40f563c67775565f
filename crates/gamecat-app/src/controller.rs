// Session controller and event loop.
//
// The controller owns the one `ViewState` value and the current entity store.
// Every change goes through `gamecat_core::reduce`; after each change the
// freshly derived `Page` is pushed to whoever renders it.

use std::sync::Arc;

use gamecat_core::{reduce, render_page, EntityStore, Event, GameId, Page, SystemId, ViewState};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::loader::{load_catalog, LoadError};
use crate::source::CatalogSource;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// What the outside world can tell the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// The location fragment changed.
    Fragment(String),
    /// The search box text changed.
    Query(String),
    SelectGame(GameId),
    SelectSystem(SystemId),
    Quit,
}

impl Input {
    /// The state event this input stands for. `Quit` has none.
    pub fn into_event(self) -> Option<Event> {
        match self {
            Input::Fragment(fragment) => Some(Event::FragmentChanged(fragment)),
            Input::Query(query) => Some(Event::SetQuery(query)),
            Input::SelectGame(id) => Some(Event::SetCurrentGame(id)),
            Input::SelectSystem(id) => Some(Event::SetCurrentSystem(id)),
            Input::Quit => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct Controller {
    state: ViewState,
    store: Arc<EntityStore>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Start in the loading state with an empty store.
    pub fn new() -> Self {
        Controller {
            state: ViewState::default(),
            store: Arc::new(EntityStore::empty()),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn store(&self) -> Arc<EntityStore> {
        Arc::clone(&self.store)
    }

    /// Apply one event. Returns whether the state changed.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let next = reduce(&self.state, &event);
        if next == self.state {
            if let Event::FragmentChanged(fragment) = &event {
                debug!("Ignoring unrecognised fragment {:?}", fragment);
            }
            return false;
        }
        if next.screen != self.state.screen {
            info!("Screen {:?} -> {:?}", self.state.screen, next.screen);
        }
        debug!(?event, "state updated");
        self.state = next;
        true
    }

    /// Install the outcome of the startup load. A successful load replaces
    /// the store wholesale.
    pub fn finish_load(&mut self, result: Result<EntityStore, LoadError>) {
        match result {
            Ok(store) => {
                self.store = Arc::new(store);
                self.dispatch(Event::LoadSucceeded);
            }
            Err(e) => {
                warn!("Load failed, session is now in the error state: {}", e);
                self.dispatch(Event::LoadFailed(e.to_string()));
            }
        }
    }

    pub fn page(&self) -> Page {
        render_page(&self.store, &self.state)
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run a session until `Quit` arrives or the input channel closes.
///
/// Applies `start_fragment`, starts the catalog load in the background, then
/// selects over the load result and user input. A page goes out on
/// `page_tx` for the initial state and after every change. The input
/// subscription is closed before returning; the final state is returned.
pub async fn run(
    mut controller: Controller,
    source: Arc<dyn CatalogSource>,
    start_fragment: String,
    mut input_rx: mpsc::Receiver<Input>,
    page_tx: mpsc::Sender<Page>,
) -> ViewState {
    info!("Session started");
    controller.dispatch(Event::FragmentChanged(start_fragment));

    let (load_tx, mut load_rx) = oneshot::channel();
    let load_task = tokio::spawn(async move {
        let result = load_catalog(source.as_ref()).await;
        let _ = load_tx.send(result);
    });
    let mut loading = true;

    if page_tx.send(controller.page()).await.is_err() {
        info!("Page receiver gone before the first page");
        input_rx.close();
        load_task.abort();
        return controller.state().clone();
    }

    loop {
        tokio::select! {
            result = &mut load_rx, if loading => {
                loading = false;
                controller.finish_load(result.unwrap_or(Err(LoadError::Interrupted)));
                if page_tx.send(controller.page()).await.is_err() {
                    break;
                }
            }

            input = input_rx.recv() => {
                let Some(input) = input else {
                    info!("Input channel closed, ending session");
                    break;
                };
                let Some(event) = input.into_event() else {
                    info!("Quit received, ending session");
                    break;
                };
                if controller.dispatch(event) && page_tx.send(controller.page()).await.is_err() {
                    break;
                }
            }
        }
    }

    input_rx.close();
    // Nobody is left to read a late load result.
    load_task.abort();
    info!("Session ended");
    controller.state().clone()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use gamecat_core::{LoadStatus, Screen};

    #[test]
    fn inputs_map_to_events() {
        assert_eq!(
            Input::Fragment("#/stats".into()).into_event(),
            Some(Event::FragmentChanged("#/stats".into()))
        );
        assert_eq!(Input::Query("ch".into()).into_event(), Some(Event::SetQuery("ch".into())));
        assert_eq!(Input::SelectGame(3).into_event(), Some(Event::SetCurrentGame(3)));
        assert_eq!(Input::SelectSystem(4).into_event(), Some(Event::SetCurrentSystem(4)));
        assert_eq!(Input::Quit.into_event(), None);
    }

    #[test]
    fn dispatch_reports_changes() {
        let mut c = Controller::new();
        assert!(c.dispatch(Event::FragmentChanged("#/system/7".into())));
        assert!(!c.dispatch(Event::FragmentChanged("#/bogus".into())));
        assert!(!c.dispatch(Event::FragmentChanged("#/system/7".into())));
        assert_eq!(c.state().current_system, 7);
    }

    #[test]
    fn finish_load_success_replaces_store() {
        let mut c = Controller::new();
        let store = EntityStore::new(vec![], vec![]);
        c.finish_load(Ok(store));
        assert_eq!(c.state().load, LoadStatus::Ready);
        assert!(matches!(c.page(), Page::List(_)));
    }

    #[test]
    fn finish_load_failure_is_error_page() {
        let mut c = Controller::new();
        c.finish_load(Err(LoadError::Fetch {
            resource: crate::source::Resource::Systems,
            source: crate::source::FetchError::Unavailable("down".into()),
        }));
        assert_eq!(c.page(), Page::Error("could not fetch systems: down".into()));
        c.dispatch(Event::FragmentChanged("#/search".into()));
        assert_eq!(c.state().screen, Screen::Search);
        assert!(matches!(c.page(), Page::Error(_)));
    }
}
