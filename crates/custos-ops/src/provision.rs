//! Admin account provisioning
//!
//! Idempotent workflows converging a privileged account towards a desired
//! end state across the identity store and the profile collection.
//!
//! `create` runs lookup → create-or-update → grant claim → mirror profile.
//! `delete` runs lookup → delete identity → delete profile, treating an
//! absent identity as the desired end state. The two stores are not
//! wrapped in a distributed transaction: a profile delete failing after
//! the identity delete succeeded leaves a documented inconsistency window
//! and the identity is not recreated.

use serde_json::{Map, Value};
use tracing::{info, warn};

use custos_store::{
    AdminProfile, DocumentStore, Identity, IdentityStore, IdentityUpdate, NewIdentity, StoreError,
    StoreResult, PROFILE_COLLECTION,
};

const DEFAULT_DISPLAY_NAME: &str = "Admin";

/// Which branch a `create` call took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// No identity carried the email; a fresh one was created.
    Created { uid: String },
    /// The email was taken; the existing identity's secret was rotated.
    Updated { uid: String },
}

impl CreateOutcome {
    pub fn uid(&self) -> &str {
        match self {
            CreateOutcome::Created { uid } | CreateOutcome::Updated { uid } => uid,
        }
    }
}

/// Which branch a `delete` call took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Identity and profile removed.
    Deleted { uid: String },
    /// No identity carried the email; absence was already the end state.
    AlreadyAbsent,
}

/// Provisions and deprovisions privileged accounts.
///
/// Both store handles are injected so tests can substitute in-memory
/// fakes for the hosted services.
pub struct AdminProvisioner<'a, I: IdentityStore + ?Sized, D: DocumentStore + ?Sized> {
    identities: &'a I,
    documents: &'a D,
    display_name: String,
}

impl<'a, I: IdentityStore + ?Sized, D: DocumentStore + ?Sized> AdminProvisioner<'a, I, D> {
    pub fn new(identities: &'a I, documents: &'a D) -> Self {
        Self {
            identities,
            documents,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
        }
    }

    /// Display name written into the mirrored profile.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Converge towards: identity exists with the given secret, carries
    /// the admin claim, and has a mirrored approved profile.
    ///
    /// Calling twice is safe: the second call takes the update branch and
    /// the merge upsert preserves the profile's original `createdAt`.
    pub async fn create(&self, email: &str, secret: &str) -> StoreResult<CreateOutcome> {
        validate_email(email)?;
        if secret.is_empty() {
            return Err(StoreError::Validation(
                "credential secret must not be empty".into(),
            ));
        }

        let (identity, updated) = match self.identities.find_by_email(email).await {
            Err(StoreError::NotFound { .. }) => {
                let identity = self
                    .identities
                    .create(&NewIdentity::verified(email, secret))
                    .await?;
                info!(email, uid = %identity.uid, "created identity");
                (identity, false)
            }
            Ok(existing) => {
                let identity = self
                    .identities
                    .update(&existing.uid, &IdentityUpdate::secret(secret))
                    .await?;
                info!(email, uid = %identity.uid, "identity exists, rotated secret");
                (identity, true)
            }
            Err(other) => return Err(other),
        };

        // Whole-map replace: any claims besides `admin` are dropped.
        self.identities
            .set_claims(&identity.uid, &admin_claims())
            .await?;
        info!(uid = %identity.uid, "admin claim set");

        let profile = AdminProfile::approved(email, &self.display_name);
        if updated {
            self.documents
                .set(
                    PROFILE_COLLECTION,
                    &identity.uid,
                    &profile.merge_fields(),
                    true,
                )
                .await?;
            info!(uid = %identity.uid, "profile upserted");
            Ok(CreateOutcome::Updated { uid: identity.uid })
        } else {
            self.documents
                .set(
                    PROFILE_COLLECTION,
                    &identity.uid,
                    &profile.replace_fields(),
                    false,
                )
                .await?;
            info!(uid = %identity.uid, "profile created");
            Ok(CreateOutcome::Created { uid: identity.uid })
        }
    }

    /// Set the admin claim on an identity that must already exist.
    ///
    /// Unlike [`create`](Self::create) this touches neither the secret nor
    /// the profile document; an absent identity propagates as not-found.
    /// Returns the identity re-read after the claim write.
    pub async fn grant(&self, email: &str) -> StoreResult<Identity> {
        validate_email(email)?;
        let identity = self.identities.find_by_email(email).await?;
        self.identities
            .set_claims(&identity.uid, &admin_claims())
            .await?;
        info!(email, uid = %identity.uid, "admin claim granted");
        self.identities.find_by_email(email).await
    }

    /// Converge towards: neither the identity nor its profile exists.
    ///
    /// An absent identity is the desired end state, not a failure.
    pub async fn delete(&self, email: &str) -> StoreResult<DeleteOutcome> {
        validate_email(email)?;

        let identity = match self.identities.find_by_email(email).await {
            Ok(identity) => identity,
            Err(StoreError::NotFound { .. }) => {
                info!(email, "identity absent, nothing to delete");
                return Ok(DeleteOutcome::AlreadyAbsent);
            }
            Err(other) => return Err(other),
        };

        self.identities.delete(&identity.uid).await?;
        info!(email, uid = %identity.uid, "identity deleted");

        // The identity is already gone at this point. A failure here is
        // reported as-is; the identity is not recreated.
        match self.documents.delete(PROFILE_COLLECTION, &identity.uid).await {
            Ok(()) => info!(uid = %identity.uid, "profile deleted"),
            Err(StoreError::NotFound { .. }) => {
                warn!(uid = %identity.uid, "identity had no mirrored profile");
            }
            Err(other) => return Err(other),
        }

        Ok(DeleteOutcome::Deleted { uid: identity.uid })
    }
}

/// The claims map the provisioner writes: exactly `{"admin": true}`.
fn admin_claims() -> Map<String, Value> {
    let mut claims = Map::new();
    claims.insert("admin".into(), Value::Bool(true));
    claims
}

/// Rejects malformed emails before any remote call is made.
fn validate_email(email: &str) -> StoreResult<()> {
    if email.trim().is_empty() {
        return Err(StoreError::Validation("email must not be empty".into()));
    }
    if !email.contains('@') {
        return Err(StoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use custos_store::MemoryStore;

    fn provisioner(store: &MemoryStore) -> AdminProvisioner<'_, MemoryStore, MemoryStore> {
        AdminProvisioner::new(store, store)
    }

    async fn profile_of(store: &MemoryStore, uid: &str) -> Map<String, Value> {
        store
            .get(PROFILE_COLLECTION, uid)
            .await
            .unwrap()
            .expect("profile document should exist")
            .fields
    }

    #[tokio::test]
    async fn create_on_fresh_email_takes_create_branch() {
        let store = MemoryStore::new();
        let outcome = provisioner(&store)
            .create("a@x.com", "secret1")
            .await
            .unwrap();

        let uid = match &outcome {
            CreateOutcome::Created { uid } => uid.clone(),
            other => panic!("expected create branch, got {other:?}"),
        };

        let identity = store.find_by_email("a@x.com").await.unwrap();
        assert_eq!(identity.uid, uid);
        assert!(identity.email_verified);
        assert!(!identity.disabled);
        assert!(identity.is_admin());
        assert_eq!(store.secret_of(&uid).as_deref(), Some("secret1"));

        let profile = profile_of(&store, &uid).await;
        assert_eq!(profile.get("status"), Some(&Value::String("approved".into())));
        assert_eq!(
            profile.get("approvedBy"),
            Some(&Value::String("system".into()))
        );
        assert!(profile.contains_key("createdAt"));
    }

    #[tokio::test]
    async fn second_create_takes_update_branch_and_preserves_created_at() {
        let store = MemoryStore::new();
        let p = provisioner(&store);

        let first = p.create("a@x.com", "secret1").await.unwrap();
        let uid = first.uid().to_string();

        // Pin createdAt to a sentinel so preservation is observable.
        let mut pin = Map::new();
        pin.insert(
            "createdAt".into(),
            Value::String("2020-01-01T00:00:00Z".into()),
        );
        store.set(PROFILE_COLLECTION, &uid, &pin, true).await.unwrap();

        let second = p.create("a@x.com", "secret2").await.unwrap();
        assert_eq!(second, CreateOutcome::Updated { uid: uid.clone() });

        // Secret rotated, claim still present.
        assert_eq!(store.secret_of(&uid).as_deref(), Some("secret2"));
        assert!(store.find_by_email("a@x.com").await.unwrap().is_admin());

        // Merge upsert preserved createdAt and refreshed approvedBy.
        let profile = profile_of(&store, &uid).await;
        assert_eq!(
            profile.get("createdAt"),
            Some(&Value::String("2020-01-01T00:00:00Z".into()))
        );
        assert_eq!(profile.get("status"), Some(&Value::String("approved".into())));
        assert_eq!(store.identity_count(), 1);
    }

    #[tokio::test]
    async fn malformed_email_short_circuits_with_no_side_effects() {
        let store = MemoryStore::new();
        let p = provisioner(&store);

        for email in ["", "   ", "not-an-email"] {
            let err = p.create(email, "secret").await.unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)), "{email:?}");
        }
        let err = p.create("a@x.com", "").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        assert_eq!(store.identity_count(), 0);
        assert_eq!(store.collection_len(PROFILE_COLLECTION), 0);
    }

    #[tokio::test]
    async fn delete_on_absent_email_is_a_no_op_success() {
        let store = MemoryStore::new();
        let p = provisioner(&store);

        assert_eq!(
            p.delete("ghost@x.com").await.unwrap(),
            DeleteOutcome::AlreadyAbsent
        );
        // Twice in succession is equivalent to once.
        assert_eq!(
            p.delete("ghost@x.com").await.unwrap(),
            DeleteOutcome::AlreadyAbsent
        );
    }

    #[tokio::test]
    async fn create_then_delete_leaves_nothing_behind() {
        let store = MemoryStore::new();
        let p = provisioner(&store);

        let outcome = p.create("a@x.com", "secret1").await.unwrap();
        let uid = outcome.uid().to_string();

        let deleted = p.delete("a@x.com").await.unwrap();
        assert_eq!(deleted, DeleteOutcome::Deleted { uid: uid.clone() });

        assert_eq!(store.identity_count(), 0);
        assert!(store.get(PROFILE_COLLECTION, &uid).await.unwrap().is_none());

        // And a repeat delete is the no-op branch.
        assert_eq!(
            p.delete("a@x.com").await.unwrap(),
            DeleteOutcome::AlreadyAbsent
        );
    }

    #[tokio::test]
    async fn delete_tolerates_missing_profile_document() {
        let store = MemoryStore::new();
        let p = provisioner(&store);

        let identity = store
            .create(&NewIdentity::verified("a@x.com", "s"))
            .await
            .unwrap();

        let deleted = p.delete("a@x.com").await.unwrap();
        assert_eq!(deleted, DeleteOutcome::Deleted { uid: identity.uid });
        assert_eq!(store.identity_count(), 0);
    }

    #[tokio::test]
    async fn grant_requires_an_existing_identity() {
        let store = MemoryStore::new();
        let p = provisioner(&store);

        let err = p.grant("ghost@x.com").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        store
            .create(&NewIdentity::verified("a@x.com", "s"))
            .await
            .unwrap();
        let identity = p.grant("a@x.com").await.unwrap();
        assert!(identity.is_admin());
        // Grant does not mirror a profile.
        assert_eq!(store.collection_len(PROFILE_COLLECTION), 0);
    }

    #[tokio::test]
    async fn grant_replaces_existing_claims_wholesale() {
        let store = MemoryStore::new();
        let identity = store
            .create(&NewIdentity::verified("a@x.com", "s"))
            .await
            .unwrap();
        let mut claims = Map::new();
        claims.insert("moderator".into(), Value::Bool(true));
        store.set_claims(&identity.uid, &claims).await.unwrap();

        let granted = provisioner(&store).grant("a@x.com").await.unwrap();
        assert!(granted.is_admin());
        assert!(granted.claims.get("moderator").is_none());
    }
}
