//! Resource reconciliation for Bitbucket Cloud.
//!
//! A [`Provider`] accepts untyped [`Descriptor`]s keyed by a
//! [`ResourceKind`] and drives them through create, read, update, delete
//! and import against the legacy and modern API surfaces. Repository
//! lookups go through a per-workspace inventory that is listed once and
//! kept coherent with every write the process makes.

pub mod config;
pub mod error;
pub mod model;
mod provider;
mod reconcile;
mod store;

pub use config::ProviderConfig;
pub use error::CoreError;
pub use model::{Descriptor, ID_FIELD, IdScheme};
pub use provider::Provider;
pub use reconcile::{ReadOutcome, ResourceKind};
