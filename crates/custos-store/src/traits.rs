//! Capability traits for the backing stores
//!
//! The maintenance operations take these as injected handles; nothing in
//! the core reaches the hosted services through ambient globals, so tests
//! substitute [`MemoryStore`](crate::MemoryStore) for both.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{
    Document, DocumentPage, DocumentRef, Identity, IdentityUpdate, NewIdentity, PageRequest,
};

/// Hard ceiling on deletes per atomic batch commit, imposed by the
/// hosted service.
pub const MAX_BATCH_SIZE: usize = 500;

/// Capability over the hosted identity provider.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Look up an identity by its email business key.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) when
    /// no identity carries the email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Identity>;

    /// Create a new identity.
    ///
    /// Returns [`StoreError::AlreadyExists`](crate::StoreError::AlreadyExists)
    /// when the email is already taken.
    async fn create(&self, new: &NewIdentity) -> StoreResult<Identity>;

    /// Apply a sparse update to an existing identity.
    async fn update(&self, uid: &str, update: &IdentityUpdate) -> StoreResult<Identity>;

    /// Replace the identity's custom claims map wholesale.
    ///
    /// This is a destructive write: claims absent from `claims` are lost.
    async fn set_claims(
        &self,
        uid: &str,
        claims: &serde_json::Map<String, serde_json::Value>,
    ) -> StoreResult<()>;

    /// Delete the identity.
    async fn delete(&self, uid: &str) -> StoreResult<()>;
}

/// Capability over the hosted document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document, `None` when absent.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Write a document. With `merge` set, fields absent from `fields`
    /// keep their stored values; otherwise the document is replaced.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: &serde_json::Map<String, serde_json::Value>,
        merge: bool,
    ) -> StoreResult<()>;

    /// Delete a single document. Deleting an absent document is an error
    /// the caller may choose to tolerate.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Fetch one page of a collection, in stable enumeration order.
    async fn list_page(&self, collection: &str, page: &PageRequest) -> StoreResult<DocumentPage>;

    /// Drain every page of a collection.
    ///
    /// Convenience over [`list_page`](Self::list_page); the cursor is
    /// internal and callers see the full set present at read time.
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let mut documents = Vec::new();
        let mut request = PageRequest::default();
        loop {
            let page = self.list_page(collection, &request).await?;
            documents.extend(page.documents);
            match page.next_page_token {
                Some(token) => request.page_token = Some(token),
                None => return Ok(documents),
            }
        }
    }

    /// Commit a group of deletes as one atomic transaction.
    ///
    /// All-or-nothing within the call; `refs` must not exceed
    /// [`MAX_BATCH_SIZE`] entries.
    async fn commit_delete_batch(&self, refs: &[DocumentRef]) -> StoreResult<()>;
}
