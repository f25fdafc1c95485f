// Modern (2.0) API client modules
//
// JSON throughout, consistent object/array shapes, paginated listings.
// Each entity family lives in its own file as inherent methods on
// `ModernClient`.

pub mod branch_restrictions;
pub mod client;
pub mod deploy_keys;
pub mod deployments;
pub mod permissions;
pub mod pipelines;
pub mod projects;
pub mod repositories;
pub mod reviewers;
pub mod types;
pub mod webhooks;

pub use client::ModernClient;
