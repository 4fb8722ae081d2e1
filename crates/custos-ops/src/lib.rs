//! Core maintenance operations for the custos tools.
//!
//! Two independent, stateless operations share nothing but the
//! backing-store capability traits from `custos-store`:
//!
//! - [`CollectionPurger`] deletes every document in a collection in
//!   bounded atomic batches, strictly sequentially.
//! - [`AdminProvisioner`] converges a privileged account towards the
//!   desired end state: identity present with the admin claim and a
//!   mirrored approved profile, or fully absent.
//!
//! Store handles are injected; nothing here reaches the hosted services
//! through ambient state.

pub mod provision;
pub mod purge;

pub use provision::{AdminProvisioner, CreateOutcome, DeleteOutcome};
pub use purge::{CollectionPurger, PurgeReport};
