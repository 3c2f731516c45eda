//! Composition root wiring adapters, state, and bridge tasks together.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use market_auth::{Authenticator, IdentityProvider, SessionTracker};
use market_shared::AppConfig;
use market_store::{DocumentBackend, Listing, ListingStore, ProfileStore};

use crate::bridge::{spawn_listing_bridge, spawn_session_bridge};
use crate::error::MarketError;
use crate::events::AppEvent;
use crate::filter::ListingFilter;
use crate::state::{AppState, Screen};

/// The running client: shared state plus the adapters commands talk to.
pub struct MarketApp {
    state: Arc<Mutex<AppState>>,
    listings: ListingStore,
    profiles: ProfileStore,
    auth: Authenticator,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    tracker: SessionTracker,
    listing_bridge: JoinHandle<()>,
    session_bridge: JoinHandle<()>,
}

impl MarketApp {
    /// Wire the adapters, open the live subscription, and start the bridge
    /// tasks. Returns the app handle plus the event stream for a rendering
    /// layer.
    pub async fn start(
        backend: Arc<dyn DocumentBackend>,
        provider: Arc<dyn IdentityProvider>,
        config: &AppConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<AppEvent>), MarketError> {
        let listings = ListingStore::new(backend.clone(), config);
        let profiles = ProfileStore::new(backend, config);
        let auth = Authenticator::new(provider.clone(), profiles.clone());
        let tracker = SessionTracker::spawn(provider, profiles.clone());

        let state = Arc::new(Mutex::new(AppState::new()));
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let subscription = listings.subscribe().await?;
        let listing_bridge =
            spawn_listing_bridge(state.clone(), subscription, events_tx.clone());
        let session_bridge =
            spawn_session_bridge(state.clone(), tracker.watch(), events_tx.clone());

        info!(app_id = %config.app_id, "client started");

        Ok((
            Self {
                state,
                listings,
                profiles,
                auth,
                events_tx,
                tracker,
                listing_bridge,
                session_bridge,
            },
            events_rx,
        ))
    }

    /// Stop the bridge tasks and tear down the live subscription. The
    /// subscription handle lives inside the listing bridge task, so aborting
    /// the task drops it and detaches from the backend exactly once.
    pub fn shutdown(self) {
        self.listing_bridge.abort();
        self.session_bridge.abort();
        self.tracker.shutdown();
        info!("client shut down");
    }

    // ------------------------------------------------------------------
    // State access
    // ------------------------------------------------------------------

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a closure against the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.lock_state())
    }

    /// Run a transition against the state machine.
    pub fn with_state_mut<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        f(&mut self.lock_state())
    }

    /// What the rendering layer should draw right now.
    pub fn screen(&self) -> Screen {
        self.lock_state().current_screen()
    }

    /// Filtered home-page listings, newest first.
    pub fn visible_listings(&self, filter: &ListingFilter) -> Vec<Listing> {
        let state = self.lock_state();
        filter.apply(&state.listings).into_iter().cloned().collect()
    }

    /// The current user's own listings, newest first.
    pub fn my_listings(&self) -> Vec<Listing> {
        let state = self.lock_state();
        state.my_listings().into_iter().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Adapter access for the command layer
    // ------------------------------------------------------------------

    pub(crate) fn listings(&self) -> &ListingStore {
        &self.listings
    }

    pub(crate) fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub(crate) fn auth(&self) -> &Authenticator {
        &self.auth
    }

    pub(crate) fn events_tx(&self) -> &mpsc::UnboundedSender<AppEvent> {
        &self.events_tx
    }
}
