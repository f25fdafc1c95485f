// Legacy (1.0) API client modules
//
// Hand-written client for the endpoints only available on the 1.0 surface:
// workspace groups and their members. Writes are form- or JSON-encoded,
// reads return bare arrays even where a single object is expected.

pub mod client;
pub mod group_members;
pub mod groups;
pub mod models;

pub use client::LegacyClient;
