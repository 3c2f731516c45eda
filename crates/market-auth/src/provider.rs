//! The identity-provider seam.

use async_trait::async_trait;
use tokio::sync::mpsc;

use market_shared::UserId;

use crate::error::AuthError;

/// A provider-driven session change. Listeners receive the current state
/// immediately on subscribing, then one event per change, including external
/// session expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { uid: UserId },
    SignedOut,
}

/// Operations consumed from the external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new account and start a session for it.
    async fn create_account(&self, email: &str, password: &str) -> Result<UserId, AuthError>;

    /// Resolve an existing account and start a session for it.
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, AuthError>;

    /// End the current session. Observers learn about it via the event feed.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Subscribe to session changes. The current state is delivered as the
    /// first event, so a fresh listener resolves "still unknown" into either
    /// a uid or a definite absence.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent>;
}
