//! Bridge tasks forwarding external event streams into [`AppState`].
//!
//! One task per stream: the listing subscription and the session watch.
//! Each holds the lock only long enough to apply an update, then emits an
//! [`AppEvent`] for the rendering layer.

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use market_auth::Session;
use market_store::{ListingEvent, ListingSubscription};

use crate::events::{emit, AppEvent};
use crate::state::AppState;

/// Forward listing snapshots into the state. A subscription error is logged
/// and surfaced, but the last-known snapshot stays in place — the cache is
/// never cleared on a live-read failure.
///
/// The subscription handle is owned by the task; when the task ends (stream
/// closed or task aborted on shutdown) the handle drops and detaches from
/// the backend exactly once.
pub fn spawn_listing_bridge(
    state: Arc<Mutex<AppState>>,
    mut subscription: ListingSubscription,
    events_tx: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            match event {
                ListingEvent::Snapshot(listings) => {
                    let count = listings.len();
                    {
                        let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
                        guard.apply_snapshot(listings);
                    }
                    emit(&events_tx, AppEvent::ListingsRefreshed { count });
                }
                ListingEvent::Error(message) => {
                    warn!(error = %message, "listing subscription failed; keeping last snapshot");
                    emit(&events_tx, AppEvent::SubscriptionFailed { message });
                }
            }
        }
        info!("listing bridge ended");
    })
}

/// Forward session changes into the state, including the initial value.
pub fn spawn_session_bridge(
    state: Arc<Mutex<AppState>>,
    mut session_rx: watch::Receiver<Session>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let session = session_rx.borrow_and_update().clone();
            let authenticated = session.is_authenticated();
            {
                let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
                guard.apply_session(session);
            }
            emit(&events_tx, AppEvent::SessionChanged { authenticated });

            if session_rx.changed().await.is_err() {
                break;
            }
        }
        info!("session bridge ended");
    })
}
