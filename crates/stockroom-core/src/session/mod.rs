//! The authenticated session: reactive store, lifecycle timers, route
//! guard, and restart persistence.

pub mod guard;
pub mod lifecycle;
pub mod persist;
pub mod store;
pub(crate) mod timer;
