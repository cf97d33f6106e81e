// ── Session lifecycle manager ──
//
// Keeps the session valid without user intervention, and terminates it
// deterministically when it cannot be kept valid. Pure side-effect
// scheduler over the SessionStore: it observes token expiry timestamps
// and owns exactly two superseding one-shot timers:
//
//   access token expiry  → refresh the access token
//   refresh token expiry → sign out
//
// A failed refresh is swallowed (logged at debug) — the sign-out timer
// is the backstop, so an invalid refresh token costs at most one access
// token lifetime before the session ends.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::store::{Session, SessionStore};
use super::timer::OneShotTimer;
use stockroom_api::{ApiClient, RefreshedTokens};

/// The transport surface the lifecycle needs: just the refresh exchange.
pub trait RefreshApi: Send + Sync + 'static {
    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<RefreshedTokens, stockroom_api::Error>> + Send;
}

impl RefreshApi for ApiClient {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, stockroom_api::Error> {
        ApiClient::refresh(self, refresh_token).await
    }
}

/// What a fired timer asks the driver to do.
enum Due {
    Refresh,
    SignOut,
}

/// Spawns the driver task that runs the two scheduling rules.
pub struct SessionLifecycle;

impl SessionLifecycle {
    /// Spawn the lifecycle driver.
    ///
    /// The driver schedules against whatever session the store currently
    /// holds (covering the restored-from-disk path), then re-syncs its
    /// timers on every session change. Cancelling `cancel` stops the
    /// driver and both timers.
    pub fn spawn<A: RefreshApi>(
        store: Arc<SessionStore>,
        api: Arc<A>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(drive(store, api, cancel))
    }
}

async fn drive<A: RefreshApi>(store: Arc<SessionStore>, api: Arc<A>, cancel: CancellationToken) {
    let mut session_rx = store.subscribe();
    let (due_tx, mut due_rx) = mpsc::unbounded_channel();

    let mut refresh_timer = OneShotTimer::new();
    let mut signout_timer = OneShotTimer::new();
    // Timestamps the timers are currently scheduled for; a change in the
    // governing timestamp supersedes the old schedule.
    let mut scheduled_access: Option<DateTime<Utc>> = None;
    let mut scheduled_signout: Option<DateTime<Utc>> = None;

    sync_timers(
        &store.current(),
        &mut refresh_timer,
        &mut signout_timer,
        &mut scheduled_access,
        &mut scheduled_signout,
        &due_tx,
    );

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            changed = session_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let session = session_rx.borrow_and_update().clone();
                sync_timers(
                    &session,
                    &mut refresh_timer,
                    &mut signout_timer,
                    &mut scheduled_access,
                    &mut scheduled_signout,
                    &due_tx,
                );
            }
            Some(due) = due_rx.recv() => match due {
                Due::Refresh => run_refresh(&store, api.as_ref()).await,
                Due::SignOut => {
                    info!("refresh token expired; signing out");
                    store.clear();
                }
            }
        }
    }
    // Dropping the timers aborts anything still pending.
}

/// Re-derive both schedules from the session's expiry timestamps.
///
/// Each timer is rescheduled only when its governing timestamp actually
/// changed, and rescheduling cancels the prior schedule first — at most
/// one pending refresh and one pending sign-out exist at any instant.
fn sync_timers(
    session: &Session,
    refresh_timer: &mut OneShotTimer,
    signout_timer: &mut OneShotTimer,
    scheduled_access: &mut Option<DateTime<Utc>>,
    scheduled_signout: &mut Option<DateTime<Utc>>,
    due_tx: &mpsc::UnboundedSender<Due>,
) {
    // Refresh only makes sense while a refresh token exists.
    let access_goal = if session.refresh_token.is_some() {
        session.access_token_expire_at
    } else {
        None
    };

    if access_goal != *scheduled_access {
        *scheduled_access = access_goal;
        match access_goal {
            Some(expire_at) => {
                let delay = delay_until(expire_at);
                debug!(?delay, "scheduling access token refresh");
                let tx = due_tx.clone();
                refresh_timer.schedule(delay, async move {
                    let _ = tx.send(Due::Refresh);
                });
            }
            None => refresh_timer.cancel(),
        }
    }

    if session.refresh_token_expire_at != *scheduled_signout {
        *scheduled_signout = session.refresh_token_expire_at;
        match session.refresh_token_expire_at {
            Some(expire_at) => {
                let delay = delay_until(expire_at);
                debug!(?delay, "scheduling sign-out at refresh token expiry");
                let tx = due_tx.clone();
                signout_timer.schedule(delay, async move {
                    let _ = tx.send(Due::SignOut);
                });
            }
            None => signout_timer.cancel(),
        }
    }
}

async fn run_refresh<A: RefreshApi>(store: &SessionStore, api: &A) {
    let Some(token) = store.current().refresh_token else {
        return;
    };

    match api.refresh(&token).await {
        Ok(tokens) => store.apply_refresh(tokens),
        // Silent by design: the sign-out timer is the recovery path.
        Err(e) => debug!(error = %e, "token refresh failed; awaiting sign-out backstop"),
    }
}

fn delay_until(at: DateTime<Utc>) -> Duration {
    (at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
}
