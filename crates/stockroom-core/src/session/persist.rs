// ── Session persistence ──
//
// Only the session survives a restart; every other piece of state is
// refetched. The session is written as JSON under the platform data dir
// and removed on sign-out so a cleared session never resurrects.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::store::{Session, SessionStore};
use crate::error::CoreError;

/// Platform path for the persisted session file.
pub fn session_path() -> Result<PathBuf, CoreError> {
    let dirs = directories::ProjectDirs::from("com", "stockroom", "stockroom").ok_or_else(|| {
        CoreError::Config {
            message: "cannot determine a platform data directory".to_owned(),
        }
    })?;
    Ok(dirs.data_dir().join("session.json"))
}

/// Load a previously saved session, or a default one when none exists.
pub fn load_session(path: &Path) -> Result<Session, CoreError> {
    if !path.exists() {
        return Ok(Session::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write the session to disk, creating parent directories as needed.
pub fn save_session(path: &Path, session: &Session) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(session)?;
    fs::write(path, raw)?;
    Ok(())
}

/// Remove the persisted session, if any.
pub fn clear_session(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Spawn a task mirroring every session change to disk.
///
/// A signed-out (default) session deletes the file instead of writing an
/// empty one. Write failures are logged and skipped; persistence is a
/// convenience, not a correctness requirement.
pub fn spawn_persist(
    store: &Arc<SessionStore>,
    path: PathBuf,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut session_rx = store.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                changed = session_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let session = session_rx.borrow_and_update().clone();
                    let result = if session == Session::default() {
                        clear_session(&path)
                    } else {
                        save_session(&path, &session)
                    };
                    match result {
                        Ok(()) => debug!(path = %path.display(), "session persisted"),
                        Err(e) => warn!(error = %e, "failed to persist session"),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Role;
    use crate::session::store::SessionUser;
    use chrono::{Duration, Utc};

    fn sample() -> Session {
        Session {
            access_token: Some("acc".to_owned()),
            access_token_expire_at: Some(Utc::now() + Duration::minutes(5)),
            refresh_token: Some("ref".to_owned()),
            refresh_token_expire_at: Some(Utc::now() + Duration::days(30)),
            user: Some(SessionUser {
                id: 1,
                role: Role::Admin,
            }),
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let session = sample();
        save_session(&path, &session).unwrap();
        assert_eq!(load_session(&path).unwrap(), session);
    }

    #[test]
    fn missing_file_loads_a_default_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = load_session(&dir.path().join("absent.json")).unwrap();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        save_session(&path, &sample()).unwrap();

        clear_session(&path).unwrap();
        assert!(!path.exists());
        // Clearing twice is fine.
        clear_session(&path).unwrap();
    }

    #[tokio::test]
    async fn persist_task_mirrors_sign_in_and_sign_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = Arc::new(SessionStore::new());
        let cancel = CancellationToken::new();
        let task = spawn_persist(&store, path.clone(), cancel.clone());

        store.sign_in(stockroom_api::SessionTokens {
            access_token: "acc".to_owned(),
            access_token_expire_at: Utc::now() + Duration::minutes(5),
            refresh_token: "ref".to_owned(),
            refresh_token_expire_at: Utc::now() + Duration::days(30),
            user: stockroom_api::AuthUser {
                id: 1,
                role: "admin".to_owned(),
            },
        });
        // Give the task a moment to observe the change.
        for _ in 0..50 {
            if path.exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(path.exists());

        store.clear();
        for _ in 0..50 {
            if !path.exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(!path.exists());

        cancel.cancel();
        task.await.unwrap();
    }
}
