//! Session lifecycle and resource CRUD state for the stockroom admin console.
//!
//! This crate owns the two stateful subsystems behind every screen of the
//! console, decoupled from any rendering layer:
//!
//! - **[`SessionStore`]** + **[`SessionLifecycle`]** — the authenticated
//!   session as a single-writer reactive container, kept valid by two
//!   superseding one-shot timers: an access-token refresh and a
//!   refresh-token-expiry sign-out. A failed refresh is silent; the sign-out
//!   timer is the backstop.
//!
//! - **[`CollectionStore`]** — one generic CRUD state machine per resource
//!   kind (products, categories, admins, orders). Each of fetch / create /
//!   edit / delete runs an independent idle → pending → settled lifecycle;
//!   settled success/error stick until the consumer clears them.
//!
//! - **[`ResourceTable`]** — a fixed-at-startup registry resolving a resource
//!   kind to its type-erased edit workflow and toast labels, so one generic
//!   "edit a resource" flow works across kinds without choosing the
//!   kind-specific action at the call site.
//!
//! - **[`Console`]** — the facade wiring the API client, session store,
//!   lifecycle driver, collection stores, and registry together.

pub mod collection;
pub mod console;
pub mod error;
pub mod messages;
pub mod model;
pub mod resources;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collection::{CollectionState, CollectionStore, Loading, OpState};
pub use console::{Console, ConsoleConfig};
pub use error::CoreError;
pub use resources::{
    AdminFilters, AdminOps, CategoryFilters, CategoryOps, OrderFilters, OrderOps, ProductFilters,
    ProductOps, ResourceEntry, ResourceKind, ResourceOps, ResourceTable,
};
pub use session::guard::{GuardDecision, RouteAccess, check_route};
pub use session::lifecycle::{RefreshApi, SessionLifecycle};
pub use session::store::{Session, SessionStore, SessionUser};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Admin, AdminDraft, Category, CategoryDraft, Id, Order, OrderDraft, OrderStatus, Product,
    ProductDraft, Role, Upload,
};
