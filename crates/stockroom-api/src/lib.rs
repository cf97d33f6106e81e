//! Async HTTP client for the stockroom catalog backend.
//!
//! The backend is a Feathers-style REST API: list endpoints accept
//! `$skip`/`$limit`/`$order`/`$iLike` query operators and answer with a
//! `{ total, data }` page envelope; mutations are plain
//! `POST`/`PATCH`/`DELETE` with a bearer access token. This crate owns
//! transport mechanics only — domain types and CRUD state live in
//! `stockroom-core`.

pub mod auth;
pub mod client;
pub mod error;
pub mod query;
pub mod transport;

pub use auth::{AuthUser, RefreshedTokens, SessionTokens};
pub use client::{ApiClient, Page};
pub use error::Error;
pub use query::{DEFAULT_PAGE_SIZE, ListQuery, NO_FILTER};
pub use transport::{TlsMode, TransportConfig};
