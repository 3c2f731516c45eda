//! Profile screen command.

use tracing::info;

use market_store::ProfilePatch;

use crate::app::MarketApp;
use crate::error::MarketError;
use crate::events::{emit, AppEvent};

/// Editable profile fields. Email is deliberately absent: it is sourced
/// from the identity provider and never offered for edit.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub hostel: String,
    pub department: String,
    pub contact_phone: String,
    pub bio: String,
}

/// Merge the form into the stored profile, then refresh the session's
/// derived profile from the store.
pub async fn save_profile(app: &MarketApp, form: ProfileForm) -> Result<(), MarketError> {
    let uid = app
        .lock_state()
        .session
        .uid
        .clone()
        .ok_or(MarketError::NotAuthenticated)?;

    app.profiles()
        .upsert(
            &uid,
            ProfilePatch {
                name: Some(form.name),
                hostel: Some(form.hostel),
                department: Some(form.department),
                contact_phone: Some(form.contact_phone),
                bio: Some(form.bio),
            },
        )
        .await?;

    if let Some(profile) = app.profiles().get(&uid).await? {
        app.lock_state().set_profile(profile);
    }

    info!(uid = %uid, "profile saved");
    emit(app.events_tx(), AppEvent::ProfileSaved);
    Ok(())
}
