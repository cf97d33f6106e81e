use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use super::Id;
use stockroom_api::NO_FILTER;

/// Stored image attached to a product or category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub id: Id,
    /// Path relative to the backend root (e.g. `/uploads/abc.jpg`).
    pub path: String,
}

impl Upload {
    /// Rewrite `path` to an absolute URL against the backend base.
    ///
    /// The backend serves relative upload paths; the view needs absolute
    /// URLs, so list responses are rewritten once at fetch time.
    pub fn absolutize(&mut self, base: &Url) {
        if self.path.starts_with('/') {
            let base = base.as_str().trim_end_matches('/');
            self.path = format!("{base}{}", self.path);
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub height: Option<f64>,
    /// ISO date string; the catalog sells plants, so products have one.
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub category_id: Option<Id>,
    #[serde(default)]
    pub upload: Option<Upload>,
    #[serde(default)]
    pub photos_uploads_ids: Vec<Id>,
}

/// Staging buffer for the in-progress product create/edit form.
///
/// Independent of fetched `data`; field setters on the collection store
/// mutate this incrementally as the user edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub height: Option<f64>,
    pub birthdate: Option<String>,
    pub category_id: Option<Id>,
    pub upload_id: Option<Id>,
    pub photos_uploads_ids: Vec<Id>,
}

impl ProductDraft {
    /// Load a fetched product into the draft for editing.
    ///
    /// Drops the nested `upload` object (the backend rejects it on write)
    /// and keeps only the upload id reference.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            description: product.description.clone(),
            price: Some(product.price),
            height: product.height,
            birthdate: product.birthdate.clone(),
            category_id: product.category_id,
            upload_id: product.upload.as_ref().map(|u| u.id),
            photos_uploads_ids: product.photos_uploads_ids.clone(),
        }
    }

    /// Compose the request body for create/edit.
    ///
    /// The `-1` sentinel upload id means "no image selected" and is omitted
    /// from the body entirely.
    pub fn body(&self) -> Value {
        let upload_id = self.upload_id.filter(|id| *id != NO_FILTER);

        let mut body = json!({
            "name": self.name,
            "description": self.description,
            "price": self.price,
            "height": self.height,
            "birthdate": self.birthdate,
            "categoryId": self.category_id,
            "photosUploadsIds": self.photos_uploads_ids,
        });

        if let Some(id) = upload_id {
            body["uploadId"] = json!(id);
        }

        body
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: 7,
            name: "Desk lamp".to_owned(),
            description: None,
            price: 19.5,
            height: Some(40.0),
            birthdate: None,
            category_id: Some(3),
            upload: Some(Upload {
                id: 11,
                path: "/uploads/lamp.jpg".to_owned(),
            }),
            photos_uploads_ids: vec![12, 13],
        }
    }

    #[test]
    fn draft_from_product_keeps_upload_id_only() {
        let draft = ProductDraft::from_product(&product());
        assert_eq!(draft.upload_id, Some(11));
        assert_eq!(draft.price, Some(19.5));
        assert_eq!(draft.photos_uploads_ids, vec![12, 13]);
    }

    #[test]
    fn sentinel_upload_id_is_omitted_from_body() {
        let draft = ProductDraft {
            upload_id: Some(NO_FILTER),
            ..ProductDraft::default()
        };
        assert!(draft.body().get("uploadId").is_none());
    }

    #[test]
    fn real_upload_id_is_included_in_body() {
        let draft = ProductDraft {
            upload_id: Some(11),
            ..ProductDraft::default()
        };
        assert_eq!(draft.body()["uploadId"], 11);
    }

    #[test]
    fn absolutize_prefixes_relative_paths() {
        let mut upload = Upload {
            id: 1,
            path: "/uploads/lamp.jpg".to_owned(),
        };
        let base: Url = "https://api.example.com".parse().unwrap();
        upload.absolutize(&base);
        assert_eq!(upload.path, "https://api.example.com/uploads/lamp.jpg");
    }
}
