//! Canonical domain types for the catalog the console manages.

mod admin;
mod category;
mod order;
mod product;

pub use admin::{Admin, AdminDraft};
pub use category::{Category, CategoryDraft};
pub use order::{Order, OrderDraft, OrderStatus};
pub use product::{Product, ProductDraft, Upload};

use serde::{Deserialize, Serialize};

/// Backend entity identifier (integer primary key).
pub type Id = i64;

/// Account role, as issued by the sign-in endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    /// Storefront customer — never allowed past the sign-in surface.
    #[default]
    Client,
}
