// Authentication endpoints
//
// Local-strategy sign-in and refresh-token exchange. The backend issues a
// token pair with explicit expiry timestamps (epoch milliseconds); the
// session lifecycle in `stockroom-core` schedules against those.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{ApiClient, check_status};
use crate::error::Error;

/// The authenticated account, as the sign-in endpoint reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub role: String,
}

/// Full token pair issued on sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub access_token_expire_at: DateTime<Utc>,
    pub refresh_token: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub refresh_token_expire_at: DateTime<Utc>,
    pub user: AuthUser,
}

/// Tokens issued by the refresh endpoint.
///
/// The refresh token fields are only present when the backend rotated it;
/// otherwise the existing refresh token stays valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedTokens {
    pub access_token: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub access_token_expire_at: DateTime<Utc>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub refresh_token_expire_at: Option<DateTime<Utc>>,
}

impl ApiClient {
    /// Authenticate with email and password.
    ///
    /// `POST /authentication` with the local strategy. On success the
    /// backend issues both tokens plus the authenticated user.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SessionTokens, Error> {
        let url = self.resource_url("authentication")?;
        debug!("signing in at {url}");

        let body = json!({
            "strategy": "local",
            "email": email,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("sign-in failed (HTTP {status})"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let tokens: SessionTokens = serde_json::from_str(&body).map_err(|e| {
            Error::Deserialization {
                message: format!("sign-in response: {e}"),
                body,
            }
        })?;

        debug!("sign-in successful");
        Ok(tokens)
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// `POST /refresh-tokens`. The backend may also rotate the refresh
    /// token; callers must apply the rotated pair when present.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, Error> {
        let url = self.resource_url("refresh-tokens")?;
        debug!("refreshing access token at {url}");

        let body = json!({ "refreshToken": refresh_token });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let body = check_status(resp).await?;
        let tokens: RefreshedTokens = serde_json::from_str(&body).map_err(|e| {
            Error::Deserialization {
                message: format!("refresh response: {e}"),
                body,
            }
        })?;

        debug!("access token refreshed");
        Ok(tokens)
    }
}
