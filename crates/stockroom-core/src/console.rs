// ── Console facade ──
//
// Owns every stateful subsystem: the API client, the session store and
// its background lifecycle/persistence tasks, one collection store per
// resource kind, and the dispatch table. Cheap to clone; all clones share
// the same state.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

use crate::collection::CollectionStore;
use crate::error::CoreError;
use crate::resources::{AdminOps, CategoryOps, OrderOps, ProductOps, ResourceTable};
use crate::session::guard::{GuardDecision, RouteAccess, check_route};
use crate::session::lifecycle::SessionLifecycle;
use crate::session::persist;
use crate::session::store::{Session, SessionStore};
use stockroom_api::{ApiClient, DEFAULT_PAGE_SIZE, TransportConfig};

/// Everything needed to stand up a [`Console`].
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend root URL.
    pub backend_url: Url,
    pub transport: TransportConfig,
    /// Items per page on every list screen.
    pub page_size: u32,
    /// Where the session survives restarts; `None` uses the platform
    /// data directory.
    pub session_path: Option<PathBuf>,
}

impl ConsoleConfig {
    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url,
            transport: TransportConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            session_path: None,
        }
    }
}

struct ConsoleInner {
    client: ApiClient,
    session: Arc<SessionStore>,
    products: Arc<CollectionStore<ProductOps>>,
    categories: Arc<CollectionStore<CategoryOps>>,
    admins: Arc<CollectionStore<AdminOps>>,
    orders: Arc<CollectionStore<OrderOps>>,
    table: ResourceTable,
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// Handle to the whole console state.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

impl Console {
    /// Build the console: restore any persisted session, spawn the
    /// lifecycle and persistence tasks, and wire up the stores.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.backend_url, &config.transport)?;

        let path = match config.session_path {
            Some(path) => path,
            None => persist::session_path()?,
        };
        let restored = match persist::load_session(&path) {
            Ok(session) => session,
            // Unreadable file means a fresh session, never a refusal to start.
            Err(e) => {
                warn!(error = %e, "discarding unreadable session file");
                Session::default()
            }
        };
        if restored.is_signed_in() {
            info!("restored a signed-in session");
        }

        let session = Arc::new(SessionStore::with_session(restored));
        let cancel = CancellationToken::new();

        let tasks = vec![
            SessionLifecycle::spawn(
                Arc::clone(&session),
                Arc::new(client.clone()),
                cancel.clone(),
            ),
            persist::spawn_persist(&session, path, cancel.clone()),
        ];

        let products = Arc::new(CollectionStore::new(
            ProductOps::new(client.clone(), Arc::clone(&session))
                .with_page_size(config.page_size),
        ));
        let categories = Arc::new(CollectionStore::new(
            CategoryOps::new(client.clone(), Arc::clone(&session))
                .with_page_size(config.page_size),
        ));
        let admins = Arc::new(CollectionStore::new(
            AdminOps::new(client.clone(), Arc::clone(&session)).with_page_size(config.page_size),
        ));
        let orders = Arc::new(CollectionStore::new(
            OrderOps::new(client.clone(), Arc::clone(&session)).with_page_size(config.page_size),
        ));

        let table = ResourceTable::new(&products, &categories);

        Ok(Self {
            inner: Arc::new(ConsoleInner {
                client,
                session,
                products,
                categories,
                admins,
                orders,
                table,
                cancel,
                tasks: Mutex::new(tasks),
            }),
        })
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Exchange credentials for a session. The lifecycle manager picks up
    /// the new token pair and schedules its timers automatically.
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<(), CoreError> {
        let tokens = self.inner.client.sign_in(email, password).await?;
        self.inner.session.sign_in(tokens);
        Ok(())
    }

    /// Clear the session immediately. Pending timers are cancelled by the
    /// lifecycle manager observing the cleared session.
    pub fn sign_out(&self) {
        self.inner.session.clear();
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.inner.session.current()
    }

    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    /// Whether the session may enter a route with the given requirement.
    pub fn guard(&self, access: RouteAccess) -> GuardDecision {
        check_route(&self.session(), access)
    }

    // ── Resource stores ──────────────────────────────────────────────

    pub fn products(&self) -> &Arc<CollectionStore<ProductOps>> {
        &self.inner.products
    }

    pub fn categories(&self) -> &Arc<CollectionStore<CategoryOps>> {
        &self.inner.categories
    }

    pub fn admins(&self) -> &Arc<CollectionStore<AdminOps>> {
        &self.inner.admins
    }

    pub fn orders(&self) -> &Arc<CollectionStore<OrderOps>> {
        &self.inner.orders
    }

    pub fn resource_table(&self) -> &ResourceTable {
        &self.inner.table
    }

    // ── Shutdown ─────────────────────────────────────────────────────

    /// Stop the background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let tasks = match self.inner.tasks.lock() {
            Ok(mut guard) => guard.drain(..).collect::<Vec<_>>(),
            Err(_) => return,
        };
        for task in tasks {
            let _ = task.await;
        }
    }
}
