//! Application state shared across all commands and bridge tasks.
//!
//! [`AppState`] is wrapped in `Arc<Mutex<>>` by [`crate::MarketApp`]. All
//! view/session transitions go through the methods here — the single
//! authoring point — so no consumer mutates fields ad hoc.
//!
//! The "selected for detail" and "edit target" references are stable ids
//! re-resolved against the latest snapshot on every arrival, never stale
//! object captures, so a concurrent edit by another session shows up
//! immediately and a concurrent delete clears the reference.

use market_auth::Session;
use market_shared::ListingId;
use market_store::{Listing, UserProfile};

/// The page selector. Meaningful only while a user is authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Sell,
    MyProducts,
    ProductDetail,
    MyProfile,
}

/// Which auth screen an unauthenticated session shows. Local to the client,
/// independent of the page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScreen {
    #[default]
    Login,
    Signup,
}

/// Ephemeral view state, reset on reload and on sign-out.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub page: Page,
    /// Listing being edited on the sell page; `None` means create mode.
    pub editing: Option<ListingId>,
    /// Listing shown on the detail page.
    pub selected: Option<ListingId>,
    /// Delete target awaiting confirmation.
    pub pending_delete: Option<ListingId>,
    pub confirm_visible: bool,
    pub auth_screen: AuthScreen,
}

/// Central application state.
#[derive(Debug, Default)]
pub struct AppState {
    pub session: Session,
    /// Last-known snapshot, sorted newest first. Replaced wholesale by the
    /// subscription bridge; never mutated in place.
    pub listings: Vec<Listing>,
    pub view: ViewState,
    /// True while a form submission is in flight; gates duplicate submits.
    pub is_submitting: bool,
}

/// What the rendering layer should draw right now.
#[derive(Debug, Clone)]
pub enum Screen {
    /// Auth state still resolving.
    Loading,
    Login,
    Signup,
    Home,
    Sell { editing: Option<Listing> },
    MyProducts,
    ProductDetail { listing: Listing },
    MyProfile { profile: Option<UserProfile> },
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Navigation transitions
    // ------------------------------------------------------------------

    /// Switch pages. Clears any previously selected or edited entity; a
    /// `Sell` navigation with an edit target enters edit mode, otherwise
    /// the sell form starts empty.
    pub fn navigate(&mut self, page: Page, edit_target: Option<ListingId>) {
        self.view.page = page;
        self.view.editing = None;
        self.view.selected = None;
        if page == Page::Sell {
            self.view.editing = edit_target;
        }
    }

    /// Select a listing and force the detail page. An id absent from the
    /// cache is ignored, so the page selector never points at a detail view
    /// the projection cannot render.
    pub fn view_details(&mut self, id: ListingId) {
        if self.listing(&id).is_none() {
            return;
        }
        self.view.selected = Some(id);
        self.view.page = Page::ProductDetail;
    }

    /// Return from detail or profile to home, clearing the selection.
    pub fn back(&mut self) {
        self.view.selected = None;
        self.view.page = Page::Home;
    }

    pub fn set_auth_screen(&mut self, screen: AuthScreen) {
        self.view.auth_screen = screen;
    }

    // ------------------------------------------------------------------
    // Delete confirmation
    // ------------------------------------------------------------------

    pub fn request_delete(&mut self, id: ListingId) {
        self.view.pending_delete = Some(id);
        self.view.confirm_visible = true;
    }

    /// Take the pending target and hide the confirmation. The pending state
    /// is cleared here, before any store call, so a confirm after a cancel
    /// deletes nothing.
    pub fn take_pending_delete(&mut self) -> Option<ListingId> {
        self.view.confirm_visible = false;
        self.view.pending_delete.take()
    }

    pub fn cancel_delete(&mut self) {
        self.view.confirm_visible = false;
        self.view.pending_delete = None;
    }

    // ------------------------------------------------------------------
    // Bridge-applied updates
    // ------------------------------------------------------------------

    /// Replace the session. A transition to signed-out resets the whole
    /// view: back to home, selection cleared, auth toggle on login. The
    /// listing cache is kept — the auth gate hides it, and the live
    /// subscription outlives the session.
    pub fn apply_session(&mut self, session: Session) {
        let was_authenticated = self.session.is_authenticated();
        let is_authenticated = session.is_authenticated();
        self.session = session;

        if was_authenticated && !is_authenticated {
            self.view = ViewState::default();
        }
    }

    /// Replace the listing cache with a fresh snapshot and re-resolve the
    /// id-keyed references. A selected listing that vanished drops the
    /// detail view back to home; a vanished edit target falls back to
    /// create mode.
    pub fn apply_snapshot(&mut self, listings: Vec<Listing>) {
        self.listings = listings;

        if let Some(selected) = &self.view.selected {
            if self.listing(selected).is_none() {
                self.view.selected = None;
                if self.view.page == Page::ProductDetail {
                    self.view.page = Page::Home;
                }
            }
        }

        if let Some(editing) = &self.view.editing {
            if self.listing(editing).is_none() {
                self.view.editing = None;
            }
        }

        if let Some(pending) = &self.view.pending_delete {
            if self.listing(pending).is_none() {
                self.cancel_delete();
            }
        }
    }

    /// Update the derived profile after a successful profile save.
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.session.profile = Some(profile);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn listing(&self, id: &ListingId) -> Option<&Listing> {
        self.listings.iter().find(|l| &l.id == id)
    }

    /// Listings owned by the current session.
    pub fn my_listings(&self) -> Vec<&Listing> {
        match &self.session.uid {
            Some(uid) => self
                .listings
                .iter()
                .filter(|l| &l.seller_id == uid)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Project the current state into the screen a renderer should draw.
    /// The unauthenticated mode gates everything: whatever the page
    /// selector says, a session without a uid only ever renders an auth
    /// screen.
    pub fn current_screen(&self) -> Screen {
        if !self.session.is_ready {
            return Screen::Loading;
        }
        if !self.session.is_authenticated() {
            return match self.view.auth_screen {
                AuthScreen::Login => Screen::Login,
                AuthScreen::Signup => Screen::Signup,
            };
        }

        match self.view.page {
            Page::Home => Screen::Home,
            Page::Sell => Screen::Sell {
                editing: self
                    .view
                    .editing
                    .as_ref()
                    .and_then(|id| self.listing(id))
                    .cloned(),
            },
            Page::MyProducts => Screen::MyProducts,
            Page::MyProfile => Screen::MyProfile {
                profile: self.session.profile.clone(),
            },
            Page::ProductDetail => match self
                .view
                .selected
                .as_ref()
                .and_then(|id| self.listing(id))
            {
                Some(listing) => Screen::ProductDetail {
                    listing: listing.clone(),
                },
                // Selection did not survive the latest snapshot.
                None => Screen::Home,
            },
        }
    }
}
