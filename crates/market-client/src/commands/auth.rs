//! Sign-up / sign-in / sign-out commands.
//!
//! Session state is not written here: the provider fires a session event
//! and the session bridge applies it, so there is exactly one author for
//! session transitions.

use tracing::info;

use market_auth::AuthError;

use crate::app::MarketApp;
use crate::error::MarketError;

/// Create an account. The signup screen collects the password twice; a
/// mismatch is rejected before the provider is involved.
pub async fn sign_up(
    app: &MarketApp,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), MarketError> {
    if password != confirm_password {
        return Err(AuthError::PasswordMismatch.into());
    }

    let uid = app.auth().sign_up(email, password).await?;
    info!(uid = %uid, "sign-up complete");
    Ok(())
}

pub async fn sign_in(app: &MarketApp, email: &str, password: &str) -> Result<(), MarketError> {
    let uid = app.auth().sign_in(email, password).await?;
    info!(uid = %uid, "sign-in complete");
    Ok(())
}

/// End the session. The session bridge resets the view and the auth toggle
/// when the signed-out event lands.
pub async fn sign_out(app: &MarketApp) -> Result<(), MarketError> {
    app.auth().sign_out().await?;
    Ok(())
}
