//! Operations the rendering layer invokes, grouped by domain.

pub mod auth;
pub mod listings;
pub mod profile;

pub use auth::{sign_in, sign_out, sign_up};
pub use listings::{
    cancel_delete, confirm_delete, request_delete, submit_listing, toggle_status, ListingForm,
};
pub use profile::{save_profile, ProfileForm};
