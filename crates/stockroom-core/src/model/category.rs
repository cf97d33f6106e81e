use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{Id, Upload};
use stockroom_api::NO_FILTER;

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub upload: Option<Upload>,
}

/// Staging buffer for the in-progress category create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: Option<String>,
    pub upload_id: Option<Id>,
}

impl CategoryDraft {
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: Some(category.name.clone()),
            upload_id: category.upload.as_ref().map(|u| u.id),
        }
    }

    /// Compose the request body; the `-1` sentinel upload id is omitted.
    pub fn body(&self) -> Value {
        let mut body = json!({ "name": self.name });
        if let Some(id) = self.upload_id.filter(|id| *id != NO_FILTER) {
            body["uploadId"] = json!(id);
        }
        body
    }
}
