use thiserror::Error;

/// Credential and account errors, mapped to the messages shown inline to the
/// user. All are recoverable; the auth screens stay interactive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("This email is already in use.")]
    EmailInUse,

    #[error("Password should be at least 6 characters.")]
    WeakPassword,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    /// Wrong password or no such account. Deliberately one message for both.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    /// Anything else the provider reports, passed through.
    #[error("Authentication failed: {0}")]
    Provider(String),
}
