//! REST client for the hosted admin API
//!
//! Implements both capability traits over the provider's administrative
//! HTTP surface, mapping response statuses onto the store error taxonomy:
//! 404 → `NotFound`, 409 → `AlreadyExists`, 400/422 → `Validation`, and
//! everything else (plus transport failures) → `Transient` with the
//! underlying message preserved.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentStore, IdentityStore, MAX_BATCH_SIZE};
use crate::types::{
    Document, DocumentPage, DocumentRef, Identity, IdentityUpdate, NewIdentity, PageRequest,
};

/// Client for the hosted identity and document admin API.
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    /// Build a client against `base_url`, authenticating every request
    /// with the given bearer key.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transient(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a non-success response onto the error taxonomy.
    async fn expect_success(
        response: Response,
        kind: &'static str,
        key: &str,
    ) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => StoreError::NotFound {
                kind,
                key: key.to_string(),
            },
            StatusCode::CONFLICT => StoreError::AlreadyExists {
                kind,
                key: key.to_string(),
            },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                StoreError::Validation(if body.is_empty() {
                    format!("{kind} request rejected with status {status}")
                } else {
                    body
                })
            }
            _ => StoreError::Transient(format!(
                "{kind} request failed with status {status}: {body}"
            )),
        })
    }
}

#[async_trait]
impl IdentityStore for RestStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Identity> {
        debug!(email, "looking up identity");
        let response = self
            .client
            .get(self.url("/v1/accounts"))
            .bearer_auth(&self.api_key)
            .query(&[("email", email)])
            .send()
            .await?;
        let response = Self::expect_success(response, "identity", email).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, new: &NewIdentity) -> StoreResult<Identity> {
        debug!(email = %new.email, "creating identity");
        let response = self
            .client
            .post(self.url("/v1/accounts"))
            .bearer_auth(&self.api_key)
            .json(new)
            .send()
            .await?;
        let response = Self::expect_success(response, "identity", &new.email).await?;
        Ok(response.json().await?)
    }

    async fn update(&self, uid: &str, update: &IdentityUpdate) -> StoreResult<Identity> {
        debug!(uid, "updating identity");
        let response = self
            .client
            .patch(self.url(&format!("/v1/accounts/{uid}")))
            .bearer_auth(&self.api_key)
            .json(update)
            .send()
            .await?;
        let response = Self::expect_success(response, "identity", uid).await?;
        Ok(response.json().await?)
    }

    async fn set_claims(&self, uid: &str, claims: &Map<String, Value>) -> StoreResult<()> {
        debug!(uid, "replacing identity claims");
        let response = self
            .client
            .put(self.url(&format!("/v1/accounts/{uid}/claims")))
            .bearer_auth(&self.api_key)
            .json(claims)
            .send()
            .await?;
        Self::expect_success(response, "identity", uid).await?;
        Ok(())
    }

    async fn delete(&self, uid: &str) -> StoreResult<()> {
        debug!(uid, "deleting identity");
        let response = self
            .client
            .delete(self.url(&format!("/v1/accounts/{uid}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::expect_success(response, "identity", uid).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let response = self
            .client
            .get(self.url(&format!("/v1/collections/{collection}/documents/{id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::expect_success(response, "document", id).await?;
        Ok(Some(response.json().await?))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
        merge: bool,
    ) -> StoreResult<()> {
        debug!(collection, id, merge, "writing document");
        let response = self
            .client
            .put(self.url(&format!("/v1/collections/{collection}/documents/{id}")))
            .bearer_auth(&self.api_key)
            .query(&[("merge", merge)])
            .json(fields)
            .send()
            .await?;
        Self::expect_success(response, "document", id).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        debug!(collection, id, "deleting document");
        let response = self
            .client
            .delete(self.url(&format!("/v1/collections/{collection}/documents/{id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::expect_success(response, "document", id).await?;
        Ok(())
    }

    async fn list_page(&self, collection: &str, page: &PageRequest) -> StoreResult<DocumentPage> {
        let mut request = self
            .client
            .get(self.url(&format!("/v1/collections/{collection}/documents")))
            .bearer_auth(&self.api_key);
        if let Some(size) = page.page_size {
            request = request.query(&[("page_size", size)]);
        }
        if let Some(token) = &page.page_token {
            request = request.query(&[("page_token", token)]);
        }
        let response = request.send().await?;
        let response = Self::expect_success(response, "collection", collection).await?;
        Ok(response.json().await?)
    }

    async fn commit_delete_batch(&self, refs: &[DocumentRef]) -> StoreResult<()> {
        if refs.len() > MAX_BATCH_SIZE {
            return Err(StoreError::Validation(format!(
                "batch of {} exceeds the {MAX_BATCH_SIZE}-delete transaction limit",
                refs.len()
            )));
        }
        debug!(deletes = refs.len(), "committing delete batch");
        let response = self
            .client
            .post(self.url("/v1/documents:batchDelete"))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "deletes": refs }))
            .send()
            .await?;
        Self::expect_success(response, "batch", "delete").await?;
        Ok(())
    }
}
