// Catalog backend HTTP client
//
// Wraps `reqwest::Client` with resource URL construction, the
// `{ total, data }` page envelope, bearer-token headers, and error-body
// extraction. Auth endpoints live in `auth.rs` as inherent methods.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::query::ListQuery;
use crate::transport::TransportConfig;

/// One page of a list endpoint's response.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Server-reported count for the whole (filtered) set, not this page.
    pub total: u64,
    /// Entities in server page order.
    pub data: Vec<T>,
}

/// Backends answer failures with `{ "message": "...", ... }` JSON bodies.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Raw HTTP client for the catalog backend.
///
/// All methods return decoded payloads — envelope handling and error
/// classification happen here, before the caller sees anything.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `https://api.example.com`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Build a full URL for a resource path: `{base}/{resource}`.
    pub(crate) fn resource_url(&self, resource: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{resource}"))?)
    }

    /// Build a full URL for a single entity: `{base}/{resource}/{id}`.
    pub(crate) fn entity_url(&self, resource: &str, id: i64) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{resource}/{id}"))?)
    }

    // ── CRUD verbs ───────────────────────────────────────────────────

    /// Fetch one page of a resource list.
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &ListQuery,
    ) -> Result<Page<T>, Error> {
        let url = self.resource_url(resource)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .query(&query.to_pairs())
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_response(resp).await
    }

    /// Create an entity. Requires a bearer access token.
    pub async fn create<T: DeserializeOwned>(
        &self,
        resource: &str,
        body: &(impl Serialize + Sync),
        access_token: &str,
    ) -> Result<T, Error> {
        let url = self.resource_url(resource)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_response(resp).await
    }

    /// Update an entity's changed fields. Requires a bearer access token.
    pub async fn patch<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: i64,
        body: &(impl Serialize + Sync),
        access_token: &str,
    ) -> Result<T, Error> {
        let url = self.entity_url(resource, id)?;
        debug!("PATCH {url}");

        let resp = self
            .http
            .patch(url)
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_response(resp).await
    }

    /// Delete an entity. Requires a bearer access token.
    pub async fn delete(&self, resource: &str, id: i64, access_token: &str) -> Result<(), Error> {
        let url = self.entity_url(resource, id)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(Error::Transport)?;

        check_status(resp).await.map(|_| ())
    }
}

/// Classify a non-success response, or hand back the body for decoding.
///
/// 401 always means the token is invalid or expired. Other failures carry
/// the backend's `message` when the body is a JSON error object; the raw
/// body is never surfaced past this crate.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        let message = extract_message(resp)
            .await
            .unwrap_or_else(|| "access token expired or invalid".to_owned());
        return Err(Error::Authentication { message });
    }

    if !status.is_success() {
        let message = extract_message(resp)
            .await
            .unwrap_or_else(|| format!("HTTP {status}"));
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    resp.text().await.map_err(Error::Transport)
}

async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = check_status(resp).await?;

    serde_json::from_str(&body).map_err(|e| {
        let preview = truncate_on_char_boundary(&body, 200);
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}

/// Truncate to at most `max` bytes without splitting a UTF-8 character.
fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

async fn extract_message(resp: reqwest::Response) -> Option<String> {
    let body = resp.text().await.ok()?;
    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|e| e.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'й' is two bytes; a 150-char string is 300 bytes, and byte 200
        // falls mid-character.
        let body = "й".repeat(150);
        let preview = truncate_on_char_boundary(&body, 200);
        assert_eq!(preview.len(), 198);
        assert_eq!(preview.chars().count(), 99);
    }

    #[test]
    fn short_bodies_are_untouched() {
        assert_eq!(truncate_on_char_boundary("plain ascii", 200), "plain ascii");
    }

    #[test]
    fn ascii_is_cut_at_the_limit() {
        let body = "x".repeat(500);
        assert_eq!(truncate_on_char_boundary(&body, 200).len(), 200);
    }
}
