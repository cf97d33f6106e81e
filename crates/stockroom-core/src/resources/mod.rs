//! Per-resource CRUD operations behind the generic [`CollectionStore`].
//!
//! Each resource kind implements [`ResourceOps`] once: how to build its
//! list query, which endpoint it lives at, and how its draft becomes a
//! request body. Everything else — tri-state tracking, error translation,
//! the write buffer — is shared machinery in the collection store.
//!
//! [`CollectionStore`]: crate::collection::CollectionStore

use std::future::Future;

use stockroom_api::{Error, Page};

use crate::model::Id;
use crate::session::store::SessionStore;

mod admins;
mod categories;
mod orders;
mod products;
mod table;

pub use admins::{AdminFilters, AdminOps};
pub use categories::{CategoryFilters, CategoryOps};
pub use orders::{OrderFilters, OrderOps};
pub use products::{ProductFilters, ProductOps};
pub use table::{ResourceEntry, ResourceKind, ResourceTable};

/// The CRUD surface of one resource kind.
///
/// Implementations hold the API client and session store; the access
/// token is read per request so a mid-flight refresh is picked up by the
/// next operation automatically.
pub trait ResourceOps: Send + Sync + 'static {
    /// Endpoint path segment, also used in log fields.
    const NAME: &'static str;

    type Entity: Clone + Send + Sync + 'static;
    type Draft: Clone + Default + Send + Sync + 'static;
    type Filters: Clone + Default + Send + Sync + 'static;

    fn fetch_list(
        &self,
        page: u32,
        filters: &Self::Filters,
    ) -> impl Future<Output = Result<Page<Self::Entity>, Error>> + Send;

    fn create(&self, draft: &Self::Draft) -> impl Future<Output = Result<(), Error>> + Send;

    fn edit(&self, id: Id, draft: &Self::Draft)
    -> impl Future<Output = Result<(), Error>> + Send;

    fn delete(&self, id: Id) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Current bearer token, or empty when signed out (the backend answers
/// 401 and the error path takes over).
pub(crate) fn access_token(session: &SessionStore) -> String {
    session.access_token().unwrap_or_default()
}
