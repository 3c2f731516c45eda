//! # market-auth
//!
//! Session and identity layer for the campus-market client.
//!
//! Wraps an external identity provider behind the [`IdentityProvider`] trait,
//! maps its error codes to the user-facing [`AuthError`] messages, owns the
//! idempotent default-profile synthesis, and tracks the live session
//! (uid / profile / readiness) from the provider's event stream.

pub mod memory;
pub mod provider;
pub mod session;

mod authenticator;
mod error;

pub use authenticator::Authenticator;
pub use error::AuthError;
pub use memory::MemoryIdentityProvider;
pub use provider::{IdentityProvider, SessionEvent};
pub use session::{Session, SessionTracker};
