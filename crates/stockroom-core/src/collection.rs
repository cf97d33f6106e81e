// ── Resource collection store ──
//
// One generic CRUD state machine per resource kind. Each operation
// (fetch / create / edit / delete) runs an independent
// idle → pending → settled lifecycle; a settled success or error sticks
// until the consumer clears it, so a toast shown from the flag cannot be
// lost to a later state change.
//
// Concurrent fetches are not serialized: both run, and whichever settles
// last owns the list. Consumers that care about ordering await one fetch
// before issuing the next.

use tokio::sync::watch;
use tracing::debug;

use crate::messages;
use crate::model::Id;
use crate::resources::ResourceOps;

/// Whether an operation is currently in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Loading {
    #[default]
    Idle,
    Pending,
}

/// Tri-state lifecycle of one CRUD operation.
///
/// `error` and `success` are sticky: they survive until cleared, and are
/// mutually exclusive after a settle because starting an operation resets
/// both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpState {
    pub loading: Loading,
    pub error: Option<String>,
    pub success: bool,
}

impl OpState {
    pub fn is_pending(&self) -> bool {
        self.loading == Loading::Pending
    }

    fn begin(&mut self) {
        self.loading = Loading::Pending;
        self.error = None;
        self.success = false;
    }

    fn succeed(&mut self) {
        self.loading = Loading::Idle;
        self.success = true;
    }

    fn fail(&mut self, message: String) {
        self.loading = Loading::Idle;
        self.error = Some(message);
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Everything a resource screen renders from.
pub struct CollectionState<O: ResourceOps> {
    /// Current page of entities, replaced wholesale by every fetch.
    pub data: Vec<O::Entity>,
    /// Total matching entities server-side, for pagination controls.
    pub total: u64,
    /// 1-based page last requested.
    pub page: u32,
    /// Filters the page was requested with.
    pub filters: O::Filters,
    /// Staging buffer for the create/edit form, if one is open.
    pub write_data: Option<O::Draft>,

    pub fetch: OpState,
    pub create: OpState,
    pub edit: OpState,
    pub delete: OpState,
}

// Manual impl: the derive would demand `O: Clone` even though only the
// associated types appear in the fields.
impl<O: ResourceOps> Clone for CollectionState<O> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            total: self.total,
            page: self.page,
            filters: self.filters.clone(),
            write_data: self.write_data.clone(),
            fetch: self.fetch.clone(),
            create: self.create.clone(),
            edit: self.edit.clone(),
            delete: self.delete.clone(),
        }
    }
}

impl<O: ResourceOps> Default for CollectionState<O> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: 1,
            filters: O::Filters::default(),
            write_data: None,
            fetch: OpState::default(),
            create: OpState::default(),
            edit: OpState::default(),
            delete: OpState::default(),
        }
    }
}

/// Reactive CRUD store for one resource kind.
///
/// Mutations never touch the list directly: a successful create / edit /
/// delete only raises the success flag, and the consumer refetches — the
/// server stays the single source of truth for list contents.
pub struct CollectionStore<O: ResourceOps> {
    ops: O,
    state: watch::Sender<CollectionState<O>>,
}

impl<O: ResourceOps> CollectionStore<O> {
    pub fn new(ops: O) -> Self {
        let (tx, _) = watch::channel(CollectionState::default());
        Self { ops, state: tx }
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> CollectionState<O> {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<CollectionState<O>> {
        self.state.subscribe()
    }

    // ── Fetch ────────────────────────────────────────────────────────

    /// Fetch one page of the collection and replace the list with it.
    pub async fn fetch_list(&self, page: u32, filters: O::Filters) {
        self.state.send_modify(|s| {
            s.fetch.begin();
            s.page = page;
            s.filters = filters.clone();
        });

        match self.ops.fetch_list(page, &filters).await {
            Ok(page_data) => {
                debug!(
                    resource = O::NAME,
                    page,
                    total = page_data.total,
                    "fetched collection page"
                );
                self.state.send_modify(|s| {
                    s.data = page_data.data;
                    s.total = page_data.total;
                    s.fetch.succeed();
                });
            }
            Err(e) => {
                let message = messages::user_message(&e);
                debug!(resource = O::NAME, error = %e, "fetch failed");
                self.state.send_modify(|s| s.fetch.fail(message));
            }
        }
    }

    // ── Create ───────────────────────────────────────────────────────

    /// Create an entity from the staged draft.
    pub async fn create(&self, draft: O::Draft) {
        self.state.send_modify(|s| s.create.begin());

        match self.ops.create(&draft).await {
            Ok(()) => self.state.send_modify(|s| {
                s.create.succeed();
                s.write_data = None;
            }),
            Err(e) => {
                let message = messages::user_message(&e);
                self.state.send_modify(|s| s.create.fail(message));
            }
        }
    }

    /// Reset the create lifecycle and drop the staged draft (typically
    /// after showing a toast, or when the form closes).
    pub fn clear_create(&self) {
        self.state.send_modify(|s| {
            s.create.clear();
            s.write_data = None;
        });
    }

    /// Drop only the create error, keeping any in-flight state.
    pub fn clear_create_error(&self) {
        self.state.send_modify(|s| s.create.error = None);
    }

    // ── Edit ─────────────────────────────────────────────────────────

    /// Patch an existing entity from the staged draft.
    pub async fn edit(&self, id: Id, draft: O::Draft) {
        self.state.send_modify(|s| s.edit.begin());

        match self.ops.edit(id, &draft).await {
            Ok(()) => self.state.send_modify(|s| {
                s.edit.succeed();
                s.write_data = None;
            }),
            Err(e) => {
                let message = messages::user_message(&e);
                self.state.send_modify(|s| s.edit.fail(message));
            }
        }
    }

    /// Reset the edit lifecycle and drop the staged draft.
    pub fn clear_edit(&self) {
        self.state.send_modify(|s| {
            s.edit.clear();
            s.write_data = None;
        });
    }

    pub fn clear_edit_error(&self) {
        self.state.send_modify(|s| s.edit.error = None);
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Delete an entity by id.
    pub async fn delete(&self, id: Id) {
        self.state.send_modify(|s| s.delete.begin());

        match self.ops.delete(id).await {
            Ok(()) => self.state.send_modify(|s| s.delete.succeed()),
            Err(e) => {
                let message = messages::user_message(&e);
                self.state.send_modify(|s| s.delete.fail(message));
            }
        }
    }

    pub fn clear_delete(&self) {
        self.state.send_modify(|s| s.delete.clear());
    }

    // ── Write buffer ─────────────────────────────────────────────────

    /// Stage a draft for the create/edit form.
    pub fn set_write_data(&self, draft: O::Draft) {
        self.state.send_modify(|s| s.write_data = Some(draft));
    }

    /// Mutate the staged draft in place, creating a default one if the
    /// form has not staged anything yet.
    pub fn update_draft(&self, f: impl FnOnce(&mut O::Draft)) {
        self.state.send_modify(|s| {
            f(s.write_data.get_or_insert_with(O::Draft::default));
        });
    }

    /// Discard the staged draft (form closed without saving).
    pub fn clear_write_data(&self) {
        self.state.send_modify(|s| s.write_data = None);
    }
}
