//! Bounded collection purge
//!
//! Reads the full document set of a collection, partitions it into
//! batches capped at the service's atomic-transaction limit, and commits
//! them strictly sequentially. A failing batch halts the run: earlier
//! batches stay committed, later ones are never attempted, nothing is
//! retried or rolled back.

use serde::Serialize;
use tracing::info;

use custos_store::traits::MAX_BATCH_SIZE;
use custos_store::{DocumentRef, DocumentStore, StoreResult};

/// Summary of a completed purge.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeReport {
    pub collection: String,
    /// Documents deleted. Equals every document present at read time.
    pub deleted: usize,
    /// Batches committed, `ceil(deleted / 500)`.
    pub batches: usize,
}

/// Deletes every document in a named collection.
pub struct CollectionPurger<'a, D: DocumentStore + ?Sized> {
    store: &'a D,
}

impl<'a, D: DocumentStore + ?Sized> CollectionPurger<'a, D> {
    pub fn new(store: &'a D) -> Self {
        Self { store }
    }

    /// Purge the collection without progress reporting.
    pub async fn purge(&self, collection: &str) -> StoreResult<PurgeReport> {
        self.purge_with_progress(collection, |_, _| {}).await
    }

    /// Purge the collection, invoking `on_batch(index, total)` after each
    /// committed batch (1-based index).
    ///
    /// The read is paged internally, but every page is drained before the
    /// first delete: the set committed is the set present at read time.
    /// Documents created afterwards are not observed.
    pub async fn purge_with_progress(
        &self,
        collection: &str,
        mut on_batch: impl FnMut(usize, usize),
    ) -> StoreResult<PurgeReport> {
        let documents = self.store.list_all(collection).await?;
        if documents.is_empty() {
            info!(collection, "collection already empty, nothing to delete");
            return Ok(PurgeReport {
                collection: collection.to_string(),
                deleted: 0,
                batches: 0,
            });
        }

        let refs: Vec<DocumentRef> = documents
            .iter()
            .map(|doc| DocumentRef::new(collection, &doc.id))
            .collect();
        let total = refs.len().div_ceil(MAX_BATCH_SIZE);
        info!(
            collection,
            documents = refs.len(),
            batches = total,
            "starting batched delete"
        );

        for (index, chunk) in refs.chunks(MAX_BATCH_SIZE).enumerate() {
            self.store.commit_delete_batch(chunk).await?;
            info!(collection, batch = index + 1, total, "batch committed");
            on_batch(index + 1, total);
        }

        Ok(PurgeReport {
            collection: collection.to_string(),
            deleted: refs.len(),
            batches: total,
        })
    }
}
