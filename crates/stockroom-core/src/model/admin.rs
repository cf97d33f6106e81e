use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{Id, Role};

/// A console administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Staging buffer for the admin create form.
///
/// The password lives here only while the form is open; it is never part
/// of fetched data and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDraft {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl AdminDraft {
    pub fn body(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password,
            "role": Role::Admin,
        })
    }
}
