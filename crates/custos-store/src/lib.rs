//! Backing-store capability interface for the custos maintenance tools.
//!
//! The hosted identity provider and document database are external
//! collaborators. This crate defines the capability traits the maintenance
//! operations consume ([`IdentityStore`], [`DocumentStore`]), the error
//! taxonomy they branch on, a REST client implementing both against the
//! provider's admin API, and an in-memory fake for tests.

pub mod error;
pub mod memory;
pub mod rest;
pub mod traits;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use rest::RestStore;
pub use traits::{DocumentStore, IdentityStore};
pub use types::{
    AdminProfile, Document, DocumentPage, DocumentRef, Identity, IdentityUpdate, NewIdentity,
    PageRequest, ProfileStatus, PROFILE_COLLECTION,
};
