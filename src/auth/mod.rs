//! # Authentication
//!
//! Bearer JWT authentication for the API surface plus an alternate
//! `X-API-Key` scheme for service callers. Users are a small static
//! directory loaded from configuration; passwords are held only as
//! Argon2id hashes computed at startup.

pub mod api_key;
pub mod errors;
pub mod jwt;
pub mod user;

pub use api_key::ApiKeyDirectory;
pub use errors::{AuthError, AuthResult};
pub use jwt::{Claims, JwtConfig, JwtManager};
pub use user::{Role, UserDirectory};
