// bitforge-api: Async Rust client for the Bitbucket Cloud REST API (legacy 1.0 + 2.0)

pub mod auth;
pub mod error;
pub mod legacy;
pub mod modern;
pub mod transport;

pub use auth::{AuthConfig, Credentials};
pub use error::Error;
pub use legacy::LegacyClient;
pub use legacy::models::{Group, GroupMember, Permission, UnknownPermission};
pub use modern::ModernClient;
pub use modern::types as modern_types;
pub use transport::{TlsMode, TransportConfig};

/// Default root of the legacy (1.0) API surface.
pub const LEGACY_API_URL: &str = "https://api.bitbucket.org/1.0/";

/// Default root of the modern (2.0) API surface.
pub const API_URL: &str = "https://api.bitbucket.org/2.0/";

/// OAuth2 token endpoint used for the client-credentials exchange.
pub const TOKEN_URL: &str = "https://bitbucket.org/site/oauth2/access_token";
