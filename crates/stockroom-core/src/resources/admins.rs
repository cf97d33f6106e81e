use std::sync::Arc;

use serde_json::Value;

use stockroom_api::{ApiClient, DEFAULT_PAGE_SIZE, Error, ListQuery, Page};

use super::{ResourceOps, access_token};
use crate::model::{Admin, AdminDraft, Id};
use crate::session::store::SessionStore;

/// Filters for the admin list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminFilters {
    /// Substring match on the admin email.
    pub search: String,
}

/// CRUD operations for the `admins` endpoint.
///
/// Admins have no edit flow: accounts are created and deleted, and a
/// password change goes through a different channel entirely.
pub struct AdminOps {
    client: ApiClient,
    session: Arc<SessionStore>,
    page_size: u32,
}

impl AdminOps {
    pub fn new(client: ApiClient, session: Arc<SessionStore>) -> Self {
        Self {
            client,
            session,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

impl ResourceOps for AdminOps {
    const NAME: &'static str = "admins";

    type Entity = Admin;
    type Draft = AdminDraft;
    type Filters = AdminFilters;

    async fn fetch_list(&self, page: u32, filters: &AdminFilters) -> Result<Page<Admin>, Error> {
        let query = ListQuery::page(page)
            .page_size(self.page_size)
            .search("email", &filters.search);

        self.client.list(Self::NAME, &query).await
    }

    async fn create(&self, draft: &AdminDraft) -> Result<(), Error> {
        let token = access_token(&self.session);
        let _: Value = self.client.create(Self::NAME, &draft.body(), &token).await?;
        Ok(())
    }

    async fn edit(&self, id: Id, draft: &AdminDraft) -> Result<(), Error> {
        let token = access_token(&self.session);
        let _: Value = self
            .client
            .patch(Self::NAME, id, &draft.body(), &token)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Id) -> Result<(), Error> {
        let token = access_token(&self.session);
        self.client.delete(Self::NAME, id, &token).await
    }
}
