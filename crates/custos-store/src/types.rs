//! Store data types
//!
//! Wire-facing representations of identities, documents, and the mirrored
//! admin profile, plus the pagination types used by collection listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Collection holding the mirrored profile documents, keyed by identity uid.
pub const PROFILE_COLLECTION: &str = "users";

/// A principal in the identity store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned identifier, immutable once created.
    pub uid: String,
    /// Unique business key used for lookup.
    pub email: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub email_verified: bool,
    /// Custom claims. The store replaces this map wholesale on
    /// [`set_claims`](crate::IdentityStore::set_claims).
    #[serde(default)]
    pub claims: Map<String, Value>,
}

impl Identity {
    /// Whether the claims map carries `admin: true`.
    pub fn is_admin(&self) -> bool {
        self.claims.get("admin") == Some(&Value::Bool(true))
    }
}

/// Input to [`IdentityStore::create`](crate::IdentityStore::create).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIdentity {
    pub email: String,
    pub secret: String,
    pub email_verified: bool,
    pub disabled: bool,
}

impl NewIdentity {
    /// A verified, enabled identity — the shape the provisioner creates.
    pub fn verified(email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
            email_verified: true,
            disabled: false,
        }
    }
}

/// Sparse update for an existing identity. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl IdentityUpdate {
    /// Update that only rotates the credential secret.
    pub fn secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            disabled: None,
        }
    }
}

/// An opaque identified document in a named collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Single-valued string field, if present.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Target of one pending delete inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub collection: String,
    pub id: String,
}

impl DocumentRef {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

/// Cursor request for a page of documents.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Maximum documents per page. `None` lets the store pick.
    pub page_size: Option<usize>,
    /// Opaque continuation token from the previous page.
    pub page_token: Option<String>,
}

/// One page of a collection listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentPage {
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Token for the next page; `None` when exhausted.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Lifecycle state of a mirrored profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Pending,
    Approved,
    Rejected,
}

/// The profile document mirrored alongside an admin identity,
/// stored at `users/{uid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub email: String,
    pub display_name: String,
    pub status: ProfileStatus,
    pub created_at: DateTime<Utc>,
    pub approved_at: DateTime<Utc>,
    pub approved_by: String,
}

impl AdminProfile {
    /// Freshly approved profile with all timestamps set to `now`.
    pub fn approved(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            email: email.into(),
            display_name: display_name.into(),
            status: ProfileStatus::Approved,
            created_at: now,
            approved_at: now,
            approved_by: "system".into(),
        }
    }

    /// Full field map for a replacing write (new account path).
    pub fn replace_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Field map for a merging upsert (existing account path).
    ///
    /// Omits `createdAt` so an existing value survives the merge while
    /// `approvedAt`/`approvedBy` are refreshed.
    pub fn merge_fields(&self) -> Map<String, Value> {
        let mut fields = self.replace_fields();
        fields.remove("createdAt");
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_claim_detection() {
        let mut identity = Identity {
            uid: "u1".into(),
            email: "a@x.com".into(),
            disabled: false,
            email_verified: true,
            claims: Map::new(),
        };
        assert!(!identity.is_admin());

        identity.claims.insert("admin".into(), Value::Bool(true));
        assert!(identity.is_admin());

        identity.claims.insert("admin".into(), Value::Bool(false));
        assert!(!identity.is_admin());
    }

    #[test]
    fn profile_merge_fields_omit_created_at() {
        let profile = AdminProfile::approved("a@x.com", "Admin");

        let replace = profile.replace_fields();
        assert!(replace.contains_key("createdAt"));
        assert_eq!(
            replace.get("status"),
            Some(&Value::String("approved".into()))
        );
        assert_eq!(
            replace.get("approvedBy"),
            Some(&Value::String("system".into()))
        );

        let merge = profile.merge_fields();
        assert!(!merge.contains_key("createdAt"));
        assert!(merge.contains_key("approvedAt"));
    }
}
