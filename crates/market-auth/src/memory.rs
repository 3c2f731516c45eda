//! In-process [`IdentityProvider`] used for local development and tests.
//!
//! Accounts live in memory; passwords are stored as salted blake3 digests,
//! never in the clear. One session at a time, like the provider it stands
//! in for.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::RngCore;
use tokio::sync::mpsc;
use tracing::info;

use market_shared::UserId;

use crate::error::AuthError;
use crate::provider::{IdentityProvider, SessionEvent};

struct Account {
    uid: UserId,
    salt: [u8; 16],
    digest: [u8; 32],
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    current: Option<UserId>,
    listeners: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

/// In-memory identity provider.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    inner: Mutex<Inner>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an externally expired session: the current uid is dropped
    /// and listeners are notified, without a client-side `sign_out` call.
    pub fn expire_session(&self) {
        let mut inner = self.lock();
        if inner.current.take().is_some() {
            info!("session expired externally");
            notify(&mut inner, SessionEvent::SignedOut);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn notify(inner: &mut Inner, event: SessionEvent) {
    inner.listeners.retain(|tx| tx.send(event.clone()).is_ok());
}

fn digest_password(salt: &[u8; 16], password: &str) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    *hasher.finalize().as_bytes()
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AuthError::InvalidEmail);
    }
    Ok(())
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        validate_email(email)?;
        if password.len() < 6 {
            return Err(AuthError::WeakPassword);
        }

        let mut inner = self.lock();
        if inner.accounts.contains_key(email) {
            return Err(AuthError::EmailInUse);
        }

        let uid = UserId::generate();
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = digest_password(&salt, password);

        inner.accounts.insert(
            email.to_string(),
            Account {
                uid: uid.clone(),
                salt,
                digest,
            },
        );
        inner.current = Some(uid.clone());
        info!(uid = %uid, "account created");
        notify(&mut inner, SessionEvent::SignedIn { uid: uid.clone() });

        Ok(uid)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let mut inner = self.lock();

        // Missing account and wrong password are indistinguishable to the
        // caller, matching the provider's credential error codes.
        let uid = match inner.accounts.get(email) {
            Some(account) if digest_password(&account.salt, password) == account.digest => {
                account.uid.clone()
            }
            _ => return Err(AuthError::InvalidCredentials),
        };

        inner.current = Some(uid.clone());
        info!(uid = %uid, "signed in");
        notify(&mut inner, SessionEvent::SignedIn { uid: uid.clone() });

        Ok(uid)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut inner = self.lock();
        if inner.current.take().is_some() {
            info!("signed out");
            notify(&mut inner, SessionEvent::SignedOut);
        }
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();

        // Deliver the current state immediately so the listener can resolve
        // readiness without waiting for the next change.
        let initial = match &inner.current {
            Some(uid) => SessionEvent::SignedIn { uid: uid.clone() },
            None => SessionEvent::SignedOut,
        };
        let _ = tx.send(initial);

        inner.listeners.push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let provider = MemoryIdentityProvider::new();
        provider
            .create_account("alice@example.com", "secret1")
            .await
            .unwrap();

        let err = provider
            .create_account("alice@example.com", "other-password")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailInUse);
    }

    #[tokio::test]
    async fn weak_password_and_malformed_email_are_rejected() {
        let provider = MemoryIdentityProvider::new();

        assert_eq!(
            provider
                .create_account("alice@example.com", "12345")
                .await
                .unwrap_err(),
            AuthError::WeakPassword
        );
        assert_eq!(
            provider.create_account("not-an-email", "secret1").await.unwrap_err(),
            AuthError::InvalidEmail
        );
        assert_eq!(
            provider.create_account("@example.com", "secret1").await.unwrap_err(),
            AuthError::InvalidEmail
        );
    }

    #[tokio::test]
    async fn wrong_password_and_missing_user_look_identical() {
        let provider = MemoryIdentityProvider::new();
        provider
            .create_account("alice@example.com", "secret1")
            .await
            .unwrap();

        let wrong = provider
            .sign_in("alice@example.com", "wrong")
            .await
            .unwrap_err();
        let missing = provider
            .sign_in("bob@example.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(wrong, AuthError::InvalidCredentials);
        assert_eq!(missing, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn sign_in_returns_the_original_uid() {
        let provider = MemoryIdentityProvider::new();
        let uid = provider
            .create_account("alice@example.com", "secret1")
            .await
            .unwrap();
        provider.sign_out().await.unwrap();

        let again = provider
            .sign_in("alice@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(uid, again);
    }

    #[tokio::test]
    async fn listeners_get_current_state_then_changes() {
        let provider = MemoryIdentityProvider::new();
        let mut rx = provider.subscribe();
        assert_eq!(rx.recv().await, Some(SessionEvent::SignedOut));

        let uid = provider
            .create_account("alice@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some(SessionEvent::SignedIn { uid }));

        provider.expire_session();
        assert_eq!(rx.recv().await, Some(SessionEvent::SignedOut));
    }
}
