//! Listing commands: sell-form submission, status toggle, and the delete
//! confirmation flow.
//!
//! None of these update the listing cache on success; the effect is observed
//! when the next subscription snapshot arrives. Ownership checks here are
//! client-side convenience only, not a trust boundary.

use tracing::{info, warn};

use market_shared::{Category, ListingId, ListingStatus, UserId};
use market_store::{ListingPatch, NewListing};

use crate::app::MarketApp;
use crate::error::MarketError;
use crate::state::Page;

/// What the sell form collects. Used for both create and edit; which one
/// happens depends on the view's edit target.
#[derive(Debug, Clone)]
pub struct ListingForm {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    pub status: ListingStatus,
    pub image_url: Option<String>,
}

/// Submit the sell form. Creates a listing, or edits the current edit
/// target; either way navigation returns to home on success. A second
/// submit while one is in flight is rejected.
pub async fn submit_listing(app: &MarketApp, form: ListingForm) -> Result<ListingId, MarketError> {
    if form.price.is_nan() || form.price < 0.0 {
        return Err(MarketError::Validation(
            "Price must be a non-negative number.".to_string(),
        ));
    }

    // Resolve mode and claim the submit guard under one lock.
    let (uid, edit_target) = {
        let mut state = app.lock_state();
        let uid = state.session.uid.clone().ok_or(MarketError::NotAuthenticated)?;
        if state.is_submitting {
            return Err(MarketError::SubmitInFlight);
        }

        let edit_target = match &state.view.editing {
            Some(id) => {
                let listing = state.listing(id).ok_or(MarketError::ListingNotFound)?;
                if listing.seller_id != uid {
                    return Err(MarketError::NotOwner);
                }
                Some(id.clone())
            }
            None => None,
        };

        state.is_submitting = true;
        (uid, edit_target)
    };

    let result = match &edit_target {
        Some(id) => app
            .listings()
            .update(
                id,
                ListingPatch {
                    name: Some(form.name),
                    description: Some(form.description),
                    price: Some(form.price),
                    category: Some(form.category),
                    status: Some(form.status),
                    image_url: form.image_url,
                },
            )
            .await
            .map(|_| id.clone()),
        None => {
            app.listings()
                .create(NewListing {
                    name: form.name,
                    description: form.description,
                    price: form.price,
                    category: form.category,
                    status: Some(form.status),
                    seller_id: uid,
                    image_url: form.image_url,
                })
                .await
        }
    };

    let mut state = app.lock_state();
    state.is_submitting = false;

    match result {
        Ok(id) => {
            info!(id = %id, edited = edit_target.is_some(), "listing saved");
            state.navigate(Page::Home, None);
            Ok(id)
        }
        Err(e) => Err(e.into()),
    }
}

/// Flip a listing between available and sold. No optimistic local flip; the
/// UI updates when the next snapshot arrives.
pub async fn toggle_status(
    app: &MarketApp,
    id: &ListingId,
    current: ListingStatus,
) -> Result<(), MarketError> {
    require_owner(app, id)?;

    app.listings()
        .update(id, ListingPatch::status_only(current.toggled()))
        .await?;
    info!(id = %id, to = %current.toggled(), "status toggle requested");
    Ok(())
}

/// Stage a delete and show the confirmation modal.
pub fn request_delete(app: &MarketApp, id: &ListingId) -> Result<(), MarketError> {
    require_owner(app, id)?;
    app.lock_state().request_delete(id.clone());
    Ok(())
}

/// Carry out a staged delete. The pending state is cleared regardless of
/// the store outcome; returns `false` when nothing was staged.
pub async fn confirm_delete(app: &MarketApp) -> Result<bool, MarketError> {
    let Some(id) = app.lock_state().take_pending_delete() else {
        return Ok(false);
    };

    match app.listings().delete(&id).await {
        Ok(()) => {
            info!(id = %id, "listing deleted");
            Ok(true)
        }
        Err(e) => {
            warn!(id = %id, error = %e, "delete failed");
            Err(e.into())
        }
    }
}

/// Dismiss the confirmation without touching the store.
pub fn cancel_delete(app: &MarketApp) {
    app.lock_state().cancel_delete();
}

/// Client-side ownership gate shared by the mutating commands.
fn require_owner(app: &MarketApp, id: &ListingId) -> Result<UserId, MarketError> {
    let state = app.lock_state();
    let uid = state.session.uid.clone().ok_or(MarketError::NotAuthenticated)?;
    let listing = state.listing(id).ok_or(MarketError::ListingNotFound)?;
    if listing.seller_id != uid {
        return Err(MarketError::NotOwner);
    }
    Ok(uid)
}
