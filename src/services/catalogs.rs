//! Reference catalogs (leave types, genders, legal forms), cached in-process.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::client::backend::{Backend, Endpoint, fetch_list};
use crate::error::AppError;
use crate::model::catalog::{CatalogEntry, CatalogKind};

fn endpoint_of(kind: CatalogKind) -> Endpoint {
    match kind {
        CatalogKind::LeaveTypes => Endpoint::LeaveTypes,
        CatalogKind::Genders => Endpoint::Genders,
        CatalogKind::LegalForms => Endpoint::LegalForms,
    }
}

/// Shared across workers through application data; clones share one cache.
#[derive(Clone)]
pub struct CatalogCache {
    entries: Cache<CatalogKind, Arc<Vec<CatalogEntry>>>,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().max_capacity(16).time_to_live(ttl).build(),
        }
    }

    /// Cached entries of `kind`, loading them through `backend` on a miss.
    ///
    /// Concurrent misses for the same kind share one backend call. Failures
    /// are not cached.
    pub async fn get(
        &self,
        kind: CatalogKind,
        backend: &dyn Backend,
    ) -> Result<Arc<Vec<CatalogEntry>>, AppError> {
        self.entries
            .try_get_with(kind, async move {
                debug!(?kind, "Loading catalog");
                let entries: Vec<CatalogEntry> = fetch_list(backend, endpoint_of(kind), None).await?;
                Ok::<_, AppError>(Arc::new(
                    entries.into_iter().map(CatalogEntry::labelled).collect(),
                ))
            })
            .await
            .map_err(|e: Arc<AppError>| (*e).clone())
    }
}
