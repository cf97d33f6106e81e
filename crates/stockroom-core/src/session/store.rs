// ── Session store ──
//
// Single-writer reactive container for the authenticated session.
// All mutations go through the named transitions below; the lifecycle
// manager and views only ever observe through `subscribe()`/`current()`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::model::{Id, Role};
use stockroom_api::{RefreshedTokens, SessionTokens};

/// The signed-in account carried inside the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Id,
    pub role: Role,
}

/// The authenticated user's token pair and expiry timestamps.
///
/// Invariants: a token implies its expiry is set, and the refresh token
/// always outlives the access token. Both hold by construction — the only
/// writers are [`SessionStore`] transitions fed from backend responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: Option<String>,
    pub access_token_expire_at: Option<DateTime<Utc>>,
    pub refresh_token: Option<String>,
    pub refresh_token_expire_at: Option<DateTime<Utc>>,
    pub user: Option<SessionUser>,
}

impl Session {
    /// A session is signed in while it holds an unexpired refresh token.
    pub fn is_signed_in(&self) -> bool {
        match (&self.refresh_token, self.refresh_token_expire_at) {
            (Some(_), Some(expire_at)) => expire_at > Utc::now(),
            _ => false,
        }
    }

    /// Whether the signed-in account has the admin role.
    pub fn is_admin(&self) -> bool {
        self.is_signed_in()
            && self
                .user
                .as_ref()
                .is_some_and(|user| user.role == Role::Admin)
    }
}

/// Single-writer container publishing [`Session`] changes over a `watch`
/// channel. Owned by the [`Console`](crate::Console); the lifecycle
/// manager never mutates the session directly, only through these
/// transitions.
pub struct SessionStore {
    session: watch::Sender<Session>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_session(Session::default())
    }

    /// Start from a previously persisted session (restart path).
    pub fn with_session(session: Session) -> Self {
        let (tx, _) = watch::channel(session);
        Self { session: tx }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Convenience accessor for the current access token.
    pub fn access_token(&self) -> Option<String> {
        self.session.borrow().access_token.clone()
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Replace the whole session with a freshly issued token pair.
    pub fn sign_in(&self, tokens: SessionTokens) {
        if tokens.refresh_token_expire_at < tokens.access_token_expire_at {
            warn!("backend issued a refresh token expiring before the access token");
        }

        let role = Role::from_str(&tokens.user.role).unwrap_or_default();
        debug!(user_id = tokens.user.id, %role, "session created");

        self.session.send_modify(|session| {
            *session = Session {
                access_token: Some(tokens.access_token),
                access_token_expire_at: Some(tokens.access_token_expire_at),
                refresh_token: Some(tokens.refresh_token),
                refresh_token_expire_at: Some(tokens.refresh_token_expire_at),
                user: Some(SessionUser {
                    id: tokens.user.id,
                    role,
                }),
            };
        });
    }

    /// Replace the access fields after a successful refresh; the refresh
    /// fields only change when the backend rotated them.
    pub fn apply_refresh(&self, tokens: RefreshedTokens) {
        debug!("applying refreshed access token");

        self.session.send_modify(|session| {
            session.access_token = Some(tokens.access_token);
            session.access_token_expire_at = Some(tokens.access_token_expire_at);
            if let (Some(token), Some(expire_at)) =
                (tokens.refresh_token, tokens.refresh_token_expire_at)
            {
                session.refresh_token = Some(token);
                session.refresh_token_expire_at = Some(expire_at);
            }
        });
    }

    /// Sign out: clear every field synchronously.
    pub fn clear(&self) {
        debug!("session cleared");
        self.session.send_modify(|session| *session = Session::default());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use stockroom_api::AuthUser;

    fn tokens(access_mins: i64, refresh_days: i64) -> SessionTokens {
        SessionTokens {
            access_token: "acc-1".to_owned(),
            access_token_expire_at: Utc::now() + Duration::minutes(access_mins),
            refresh_token: "ref-1".to_owned(),
            refresh_token_expire_at: Utc::now() + Duration::days(refresh_days),
            user: AuthUser {
                id: 1,
                role: "admin".to_owned(),
            },
        }
    }

    #[test]
    fn sign_in_populates_all_fields() {
        let store = SessionStore::new();
        store.sign_in(tokens(5, 30));

        let session = store.current();
        assert_eq!(session.access_token.as_deref(), Some("acc-1"));
        assert!(session.is_signed_in());
        assert!(session.is_admin());
    }

    #[test]
    fn unknown_role_defaults_to_client() {
        let store = SessionStore::new();
        let mut t = tokens(5, 30);
        t.user.role = "superuser".to_owned();
        store.sign_in(t);

        assert!(!store.current().is_admin());
    }

    #[test]
    fn refresh_without_rotation_keeps_refresh_token() {
        let store = SessionStore::new();
        store.sign_in(tokens(5, 30));

        store.apply_refresh(RefreshedTokens {
            access_token: "acc-2".to_owned(),
            access_token_expire_at: Utc::now() + Duration::minutes(5),
            refresh_token: None,
            refresh_token_expire_at: None,
        });

        let session = store.current();
        assert_eq!(session.access_token.as_deref(), Some("acc-2"));
        assert_eq!(session.refresh_token.as_deref(), Some("ref-1"));
    }

    #[test]
    fn refresh_with_rotation_replaces_refresh_token() {
        let store = SessionStore::new();
        store.sign_in(tokens(5, 30));

        store.apply_refresh(RefreshedTokens {
            access_token: "acc-2".to_owned(),
            access_token_expire_at: Utc::now() + Duration::minutes(5),
            refresh_token: Some("ref-2".to_owned()),
            refresh_token_expire_at: Some(Utc::now() + Duration::days(30)),
        });

        assert_eq!(store.current().refresh_token.as_deref(), Some("ref-2"));
    }

    #[test]
    fn clear_empties_everything() {
        let store = SessionStore::new();
        store.sign_in(tokens(5, 30));
        store.clear();

        let session = store.current();
        assert_eq!(session, Session::default());
        assert!(!session.is_signed_in());
    }

    #[test]
    fn expired_refresh_token_is_not_signed_in() {
        let store = SessionStore::new();
        store.sign_in(tokens(-10, -1));

        assert!(!store.current().is_signed_in());
    }
}
