use std::sync::Arc;

use serde_json::Value;

use stockroom_api::{ApiClient, DEFAULT_PAGE_SIZE, Error, ListQuery, Page};

use super::{ResourceOps, access_token};
use crate::model::{Category, CategoryDraft, Id};
use crate::session::store::SessionStore;

/// Filters for the category list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilters {
    /// Substring match on the category name.
    pub search: String,
}

/// CRUD operations for the `categories` endpoint.
pub struct CategoryOps {
    client: ApiClient,
    session: Arc<SessionStore>,
    page_size: u32,
}

impl CategoryOps {
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

impl ResourceOps for CategoryOps {
    const NAME: &'static str = "categories";

    type Entity = Category;
    type Draft = CategoryDraft;
    type Filters = CategoryFilters;

    async fn fetch_list(
        &self,
        page: u32,
        filters: &CategoryFilters,
    ) -> Result<Page<Category>, Error> {
        let query = ListQuery::page(page)
            .page_size(self.page_size)
            .search("name", &filters.search);

        let mut page = self.client.list::<Category>(Self::NAME, &query).await?;

        let base = self.client.base_url().clone();
        for category in &mut page.data {
            if let Some(upload) = &mut category.upload {
                upload.absolutize(&base);
            }
        }

        Ok(page)
    }

    async fn create(&self, draft: &CategoryDraft) -> Result<(), Error> {
        let token = access_token(&self.session);
        let _: Value = self.client.create(Self::NAME, &draft.body(), &token).await?;
        Ok(())
    }

    async fn edit(&self, id: Id, draft: &CategoryDraft) -> Result<(), Error> {
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
