//! Sign-up / sign-in flows over a provider, including the idempotent
//! default-profile synthesis both flows share.

use std::sync::Arc;

use tracing::info;

use market_shared::UserId;
use market_store::{ProfileStore, StoreError, UserProfile};

use crate::error::AuthError;
use crate::provider::IdentityProvider;

/// Drives account flows against the provider and keeps the profile document
/// in step with the identity.
#[derive(Clone)]
pub struct Authenticator {
    provider: Arc<dyn IdentityProvider>,
    profiles: ProfileStore,
}

impl Authenticator {
    pub fn new(provider: Arc<dyn IdentityProvider>, profiles: ProfileStore) -> Self {
        Self { provider, profiles }
    }

    pub fn provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.provider
    }

    /// Create an account and its initial profile document.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let uid = self.provider.create_account(email, password).await?;
        self.ensure_profile(&uid, email)
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        info!(uid = %uid, "signed up");
        Ok(uid)
    }

    /// Resolve an existing account. Historical accounts without a profile
    /// document get one synthesized here (self-healing).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let uid = self.provider.sign_in(email, password).await?;
        self.ensure_profile(&uid, email)
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(uid)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await
    }

    /// Create the default profile for `uid` if none exists yet. Idempotent:
    /// an existing profile is left untouched.
    pub async fn ensure_profile(&self, uid: &UserId, email: &str) -> Result<(), StoreError> {
        if self.profiles.get(uid).await?.is_some() {
            return Ok(());
        }

        let profile = UserProfile::default_for(email);
        self.profiles.put(uid, &profile).await?;
        info!(uid = %uid, "default profile created");
        Ok(())
    }
}
