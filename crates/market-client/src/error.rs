use thiserror::Error;

use market_auth::AuthError;
use market_store::StoreError;

/// Errors surfaced to the rendering layer. All are local to the operation
/// that raised them; the UI stays interactive and the operation can be
/// re-attempted.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("You must be signed in to do that.")]
    NotAuthenticated,

    /// Client-side ownership check only; not a trust boundary.
    #[error("Only the seller can modify this listing.")]
    NotOwner,

    #[error("Another submission is already in progress.")]
    SubmitInFlight,

    #[error("This listing no longer exists.")]
    ListingNotFound,

    #[error("{0}")]
    Validation(String),
}
