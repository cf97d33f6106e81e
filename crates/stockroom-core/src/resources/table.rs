// ── Resource dispatch table ──
//
// Maps a resource kind to its type-erased edit workflow and toast labels,
// so one generic "edit this row" flow serves every registered kind without
// choosing a kind-specific store at the call site. Built once at startup;
// the set of kinds never changes afterwards.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use indexmap::IndexMap;

use super::{CategoryOps, ProductOps, ResourceOps};
use crate::collection::{CollectionStore, OpState};
use crate::model::Id;

/// Resource kinds wired into the generic edit workflow.
///
/// Admins and orders keep their own dedicated flows; only the kinds that
/// share the common edit form live here.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Products,
    Categories,
}

type EditFn = Box<dyn Fn(Id) -> BoxFuture<'static, ()> + Send + Sync>;
type ClearFn = Box<dyn Fn() + Send + Sync>;
type StateFn = Box<dyn Fn() -> OpState + Send + Sync>;

/// One registered resource: its edit dispatch, lifecycle accessors, and
/// the label shown when an edit lands.
pub struct ResourceEntry {
    edit_fn: EditFn,
    clear_fn: ClearFn,
    clear_error_fn: ClearFn,
    state_fn: StateFn,
    success_label: &'static str,
}

impl ResourceEntry {
    /// Erase a typed collection store into a table entry.
    ///
    /// The edit dispatch patches from the store's staged draft; an entry
    /// never carries entity data of its own.
    fn for_store<O: ResourceOps>(
        store: Arc<CollectionStore<O>>,
        success_label: &'static str,
    ) -> Self {
        let edit_store = Arc::clone(&store);
        let clear_store = Arc::clone(&store);
        let clear_error_store = Arc::clone(&store);

        Self {
            edit_fn: Box::new(move |id| {
                let store = Arc::clone(&edit_store);
                Box::pin(async move {
                    let draft = store.current().write_data.unwrap_or_default();
                    store.edit(id, draft).await;
                })
            }),
            clear_fn: Box::new(move || clear_store.clear_edit()),
            clear_error_fn: Box::new(move || clear_error_store.clear_edit_error()),
            state_fn: Box::new(move || store.current().edit),
            success_label,
        }
    }

    /// Patch entity `id` from the staged draft.
    pub async fn edit(&self, id: Id) {
        (self.edit_fn)(id).await;
    }

    pub fn clear_edit(&self) {
        (self.clear_fn)();
    }

    pub fn clear_edit_error(&self) {
        (self.clear_error_fn)();
    }

    /// Snapshot of the edit lifecycle.
    pub fn edit_state(&self) -> OpState {
        (self.state_fn)()
    }

    /// Toast text for a successful edit.
    pub fn success_label(&self) -> &'static str {
        self.success_label
    }
}

/// Fixed-at-startup registry of [`ResourceEntry`] by kind.
pub struct ResourceTable {
    entries: IndexMap<ResourceKind, ResourceEntry>,
}

impl ResourceTable {
    pub fn new(
        products: &Arc<CollectionStore<ProductOps>>,
        categories: &Arc<CollectionStore<CategoryOps>>,
    ) -> Self {
        let mut entries = IndexMap::new();
        entries.insert(
            ResourceKind::Products,
            ResourceEntry::for_store(Arc::clone(products), "Product updated."),
        );
        entries.insert(
            ResourceKind::Categories,
            ResourceEntry::for_store(Arc::clone(categories), "Category updated."),
        );
        Self { entries }
    }

    /// Look up a kind's entry. Every variant is registered at
    /// construction, so a miss is a programming error.
    pub fn entry(&self, kind: ResourceKind) -> &ResourceEntry {
        self.entries
            .get(&kind)
            .expect("every resource kind is registered at construction")
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.entries.keys().copied()
    }

    /// Run the whole edit workflow for one row: dispatch the patch, then
    /// settle into either the kind's success label or the user-facing
    /// error message, clearing the consumed flag either way.
    pub async fn submit_edit(&self, kind: ResourceKind, id: Id) -> Result<&'static str, String> {
        let entry = self.entry(kind);
        entry.edit(id).await;

        let state = entry.edit_state();
        if let Some(message) = state.error {
            entry.clear_edit_error();
            return Err(message);
        }

        entry.clear_edit();
        Ok(entry.success_label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use crate::session::store::SessionStore;
    use stockroom_api::ApiClient;

    fn table() -> ResourceTable {
        let client = ApiClient::with_client(
            reqwest::Client::new(),
            "http://localhost:1".parse().unwrap(),
        );
        let session = Arc::new(SessionStore::new());

        let products = Arc::new(CollectionStore::new(ProductOps::new(
            client.clone(),
            Arc::clone(&session),
        )));
        let categories = Arc::new(CollectionStore::new(CategoryOps::new(client, session)));

        ResourceTable::new(&products, &categories)
    }

    #[test]
    fn every_kind_is_registered() {
        let table = table();
        let kinds: Vec<_> = table.kinds().collect();
        assert_eq!(kinds, vec![ResourceKind::Products, ResourceKind::Categories]);
    }

    #[test]
    fn entries_start_idle() {
        let table = table();
        let state = table.entry(ResourceKind::Categories).edit_state();
        assert_eq!(state, OpState::default());
    }

    #[test]
    fn kind_names_round_trip() {
        assert_eq!(ResourceKind::Products.to_string(), "products");
        assert_eq!(
            ResourceKind::from_str("categories").unwrap(),
            ResourceKind::Categories
        );
    }
}
