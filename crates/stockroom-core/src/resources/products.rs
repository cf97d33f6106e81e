use std::sync::Arc;

use serde_json::Value;

use stockroom_api::{ApiClient, DEFAULT_PAGE_SIZE, Error, ListQuery, NO_FILTER, Page};

use super::{ResourceOps, access_token};
use crate::model::{Id, Product, ProductDraft};
use crate::session::store::SessionStore;

/// Filters for the product list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilters {
    /// Substring match on the product name.
    pub search: String,
    /// Category equality filter; [`NO_FILTER`] means all categories.
    pub category_id: i64,
}

impl Default for ProductFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category_id: NO_FILTER,
        }
    }
}

/// CRUD operations for the `products` endpoint.
pub struct ProductOps {
    client: ApiClient,
    session: Arc<SessionStore>,
    page_size: u32,
}

impl ProductOps {
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

impl ResourceOps for ProductOps {
    const NAME: &'static str = "products";

    type Entity = Product;
    type Draft = ProductDraft;
    type Filters = ProductFilters;

    async fn fetch_list(
        &self,
        page: u32,
        filters: &ProductFilters,
    ) -> Result<Page<Product>, Error> {
        let query = ListQuery::page(page)
            .page_size(self.page_size)
            .search("name", &filters.search)
            .equals("categoryId", filters.category_id);

        let mut page = self.client.list::<Product>(Self::NAME, &query).await?;

        // Upload paths arrive relative; the view wants absolute URLs.
        let base = self.client.base_url().clone();
        for product in &mut page.data {
            if let Some(upload) = &mut product.upload {
                upload.absolutize(&base);
            }
        }

        Ok(page)
    }

    async fn create(&self, draft: &ProductDraft) -> Result<(), Error> {
        let token = access_token(&self.session);
        let _: Value = self.client.create(Self::NAME, &draft.body(), &token).await?;
        Ok(())
    }

    async fn edit(&self, id: Id, draft: &ProductDraft) -> Result<(), Error> {
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
