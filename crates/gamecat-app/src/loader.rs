// Initial catalog load: both payloads fetched concurrently, then ingested
// into one entity store.

use gamecat_core::{ingest, EntityStore, IngestError};
use thiserror::Error;
use tracing::{info, warn};

use crate::source::{CatalogSource, FetchError, Resource};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not fetch {resource}: {source}")]
    Fetch {
        resource: Resource,
        source: FetchError,
    },

    #[error("catalog data is malformed: {0}")]
    Ingest(#[from] IngestError),

    #[error("catalog load ended without a result")]
    Interrupted,
}

/// Fetch games and systems side by side and build the entity store.
///
/// The first fetch to fail ends the load; the other one is dropped. There is
/// no retry and no partial result.
pub async fn load_catalog(source: &dyn CatalogSource) -> Result<EntityStore, LoadError> {
    info!("Loading catalog");

    let games = async {
        source.fetch_games().await.map_err(|source| LoadError::Fetch {
            resource: Resource::Games,
            source,
        })
    };
    let systems = async {
        source.fetch_systems().await.map_err(|source| LoadError::Fetch {
            resource: Resource::Systems,
            source,
        })
    };

    let (games, systems) = match tokio::try_join!(games, systems) {
        Ok(payloads) => payloads,
        Err(e) => {
            warn!("Catalog load failed: {}", e);
            return Err(e);
        }
    };

    let store = ingest(systems, games).map_err(|e| {
        warn!("Catalog payload rejected: {}", e);
        LoadError::from(e)
    })?;

    info!(
        "Catalog loaded: {} systems, {} games",
        store.systems().len(),
        store.games().len()
    );
    Ok(store)
}
