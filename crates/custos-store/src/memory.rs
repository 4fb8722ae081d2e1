//! In-memory store fake
//!
//! Implements both capability traits over mutex-guarded maps so the core
//! operations can be tested without a hosted service. Supports fault
//! injection for the partial-batch-failure cases.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentStore, IdentityStore, MAX_BATCH_SIZE};
use crate::types::{
    Document, DocumentPage, DocumentRef, Identity, IdentityUpdate, NewIdentity, PageRequest,
};

const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Default)]
struct Inner {
    identities: HashMap<String, Identity>,
    secrets: HashMap<String, String>,
    // BTreeMap keeps enumeration order stable across list calls.
    collections: HashMap<String, BTreeMap<String, Map<String, Value>>>,
    batches_committed: usize,
    fail_batches_from: Option<usize>,
}

/// Shared in-memory identity and document store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make batch commit number `ordinal` (1-based) and every later one
    /// fail with a transient error, without applying any of their deletes.
    pub fn fail_batches_from(&self, ordinal: usize) {
        self.inner.lock().unwrap().fail_batches_from = Some(ordinal);
    }

    /// Insert a document directly, bypassing the trait surface.
    pub fn insert_document(&self, collection: &str, id: &str, fields: Map<String, Value>) {
        self.inner
            .lock()
            .unwrap()
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    /// Number of documents currently in `collection`.
    pub fn collection_len(&self, collection: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .collections
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Number of identities currently stored.
    pub fn identity_count(&self) -> usize {
        self.inner.lock().unwrap().identities.len()
    }

    /// Number of delete batches committed so far.
    pub fn batches_committed(&self) -> usize {
        self.inner.lock().unwrap().batches_committed
    }

    /// The stored credential secret for `uid`, if the identity exists.
    pub fn secret_of(&self, uid: &str) -> Option<String> {
        self.inner.lock().unwrap().secrets.get(uid).cloned()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Identity> {
        let inner = self.inner.lock().unwrap();
        inner
            .identities
            .values()
            .find(|identity| identity.email == email)
            .cloned()
            .ok_or_else(|| StoreError::identity_not_found(email))
    }

    async fn create(&self, new: &NewIdentity) -> StoreResult<Identity> {
        let mut inner = self.inner.lock().unwrap();
        if inner.identities.values().any(|i| i.email == new.email) {
            return Err(StoreError::AlreadyExists {
                kind: "identity",
                key: new.email.clone(),
            });
        }
        let identity = Identity {
            uid: Uuid::new_v4().to_string(),
            email: new.email.clone(),
            disabled: new.disabled,
            email_verified: new.email_verified,
            claims: Map::new(),
        };
        inner.secrets.insert(identity.uid.clone(), new.secret.clone());
        inner
            .identities
            .insert(identity.uid.clone(), identity.clone());
        Ok(identity)
    }

    async fn update(&self, uid: &str, update: &IdentityUpdate) -> StoreResult<Identity> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(secret) = &update.secret {
            if !inner.identities.contains_key(uid) {
                return Err(StoreError::identity_not_found(uid));
            }
            inner.secrets.insert(uid.to_string(), secret.clone());
        }
        let identity = inner
            .identities
            .get_mut(uid)
            .ok_or_else(|| StoreError::identity_not_found(uid))?;
        if let Some(disabled) = update.disabled {
            identity.disabled = disabled;
        }
        Ok(identity.clone())
    }

    async fn set_claims(&self, uid: &str, claims: &Map<String, Value>) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let identity = inner
            .identities
            .get_mut(uid)
            .ok_or_else(|| StoreError::identity_not_found(uid))?;
        identity.claims = claims.clone();
        Ok(())
    }

    async fn delete(&self, uid: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .identities
            .remove(uid)
            .ok_or_else(|| StoreError::identity_not_found(uid))?;
        inner.secrets.remove(uid);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
        merge: bool,
    ) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let docs = inner.collections.entry(collection.to_string()).or_default();
        match docs.get_mut(id) {
            Some(existing) if merge => {
                for (name, value) in fields {
                    existing.insert(name.clone(), value.clone());
                }
            }
            _ => {
                docs.insert(id.to_string(), fields.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .ok_or_else(|| StoreError::document_not_found(format!("{collection}/{id}")))?;
        Ok(())
    }

    async fn list_page(&self, collection: &str, page: &PageRequest) -> StoreResult<DocumentPage> {
        let inner = self.inner.lock().unwrap();
        let docs = inner.collections.get(collection);
        let offset: usize = page
            .page_token
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|_| StoreError::Validation("malformed page token".into()))?
            .unwrap_or(0);
        let size = page.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        let documents: Vec<Document> = docs
            .map(|docs| {
                docs.iter()
                    .skip(offset)
                    .take(size)
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let total = docs.map_or(0, BTreeMap::len);
        let next = offset + documents.len();
        Ok(DocumentPage {
            documents,
            next_page_token: (next < total).then(|| next.to_string()),
        })
    }

    async fn commit_delete_batch(&self, refs: &[DocumentRef]) -> StoreResult<()> {
        if refs.len() > MAX_BATCH_SIZE {
            return Err(StoreError::Validation(format!(
                "batch of {} exceeds the {MAX_BATCH_SIZE}-delete transaction limit",
                refs.len()
            )));
        }
        let mut inner = self.inner.lock().unwrap();
        let ordinal = inner.batches_committed + 1;
        if matches!(inner.fail_batches_from, Some(from) if ordinal >= from) {
            return Err(StoreError::Transient(format!(
                "injected fault on batch {ordinal}"
            )));
        }
        for doc_ref in refs {
            if let Some(docs) = inner.collections.get_mut(&doc_ref.collection) {
                docs.remove(&doc_ref.id);
            }
        }
        inner.batches_committed = ordinal;
        Ok(())
    }
}
