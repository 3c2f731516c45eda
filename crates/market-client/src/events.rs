//! Notifications pushed to the rendering layer.

use tokio::sync::mpsc;

/// Something the rendering layer may want to react to. The channel is
/// best-effort; a consumer that has gone away is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The session changed (sign-in, sign-out, external expiry).
    SessionChanged { authenticated: bool },
    /// A fresh listing snapshot was applied.
    ListingsRefreshed { count: usize },
    /// The live subscription failed; the last-known snapshot is retained.
    SubscriptionFailed { message: String },
    /// The user's profile was saved and re-fetched.
    ProfileSaved,
}

pub fn emit(tx: &mpsc::UnboundedSender<AppEvent>, event: AppEvent) {
    if tx.send(event).is_err() {
        tracing::debug!("no event consumer attached");
    }
}
