// Library root: the catalog engine. Typed entity store, fragment-driven
// navigation, and the derived views each screen renders.

pub mod badge;
pub mod dates;
pub mod ingest;
pub mod model;
pub mod nav;
pub mod query;
pub mod state;
pub mod stats;
pub mod view;

pub use ingest::{ingest, EntityStore, IngestError};
pub use model::{Game, GameId, System, SystemId, FALLBACK_SYSTEM, NO_SELECTION, UNKNOWN_RELEASE};
pub use nav::{parse_fragment, Route};
pub use state::{reduce, Event, LoadStatus, Screen, ViewState};
pub use view::{render_page, Page};
