use std::sync::Arc;

use serde_json::Value;

use stockroom_api::{ApiClient, DEFAULT_PAGE_SIZE, Error, ListQuery, Page};

use super::{ResourceOps, access_token};
use crate::model::{Id, Order, OrderDraft, OrderStatus};
use crate::session::store::SessionStore;

/// Filters for the order list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilters {
    /// Show only orders in this fulfilment state.
    pub status: Option<OrderStatus>,
}

/// CRUD operations for the `orders` endpoint.
///
/// Orders are customer-created: the console only lists them, moves them
/// between fulfilment states, and removes cancelled ones.
pub struct OrderOps {
    client: ApiClient,
    session: Arc<SessionStore>,
    page_size: u32,
}

impl OrderOps {
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

impl ResourceOps for OrderOps {
    const NAME: &'static str = "orders";

    type Entity = Order;
    type Draft = OrderDraft;
    type Filters = OrderFilters;

    async fn fetch_list(&self, page: u32, filters: &OrderFilters) -> Result<Page<Order>, Error> {
        let mut query = ListQuery::page(page)
            .page_size(self.page_size)
            .order_desc("createdAt");

        if let Some(status) = filters.status {
            query = query.equals_str("status", &status.to_string());
        }

        self.client.list(Self::NAME, &query).await
    }

    async fn create(&self, draft: &OrderDraft) -> Result<(), Error> {
        let token = access_token(&self.session);
        let _: Value = self.client.create(Self::NAME, &draft.body(), &token).await?;
        Ok(())
    }

    async fn edit(&self, id: Id, draft: &OrderDraft) -> Result<(), Error> {
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
