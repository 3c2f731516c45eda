//! Live session state driven by the provider's event feed.
//!
//! The tracker runs in a background task and publishes [`Session`] values on
//! a watch channel. Readiness flips true on the first provider event and
//! stays true for the lifetime of the process; a signed-out session after
//! that point means "resolved absent", not "still resolving".

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use market_shared::UserId;
use market_store::{ProfileStore, UserProfile};

use crate::provider::{IdentityProvider, SessionEvent};

/// Process-local view of "who is currently authenticated".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Current user identifier, or `None` when signed out.
    pub uid: Option<UserId>,
    /// Derived profile, populated asynchronously after the uid is known.
    pub profile: Option<UserProfile>,
    /// False only until the first provider event arrives.
    pub is_ready: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.uid.is_some()
    }
}

/// Background listener keeping a watch channel in step with the provider.
pub struct SessionTracker {
    rx: watch::Receiver<Session>,
    handle: JoinHandle<()>,
}

impl SessionTracker {
    /// Subscribe to the provider and start the tracking task.
    pub fn spawn(provider: Arc<dyn IdentityProvider>, profiles: ProfileStore) -> Self {
        let (tx, rx) = watch::channel(Session::default());
        let mut events = provider.subscribe();

        let handle = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let session = match event {
                    SessionEvent::SignedIn { uid } => {
                        let profile = match profiles.get(&uid).await {
                            Ok(profile) => profile,
                            Err(e) => {
                                warn!(uid = %uid, error = %e, "failed to fetch profile");
                                None
                            }
                        };
                        info!(uid = %uid, "session established");
                        Session {
                            uid: Some(uid),
                            profile,
                            is_ready: true,
                        }
                    }
                    SessionEvent::SignedOut => Session {
                        uid: None,
                        profile: None,
                        is_ready: true,
                    },
                };

                if tx.send(session).is_err() {
                    break;
                }
            }
        });

        Self { rx, handle }
    }

    /// Watch handle for consumers; `borrow()` gives the current session.
    pub fn watch(&self) -> watch::Receiver<Session> {
        self.rx.clone()
    }

    /// Current session snapshot.
    pub fn current(&self) -> Session {
        self.rx.borrow().clone()
    }

    /// Stop the background task.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}
