//! # market-store
//!
//! Remote document-store layer for the campus-market client.
//!
//! Listings and profiles live in a hosted document database; this crate owns
//! the [`DocumentBackend`] seam that a real deployment plugs into, an
//! in-memory backend for local development and tests, and the two typed
//! adapters the application talks to: [`ListingStore`] (live-subscribed
//! shared collection) and [`ProfileStore`] (one document per user).
//!
//! Writes are acknowledged by the backend but never update any local cache
//! synchronously; consumers observe effects through the next subscription
//! snapshot.

pub mod backend;
pub mod listings;
pub mod memory;
pub mod models;
pub mod paths;
pub mod profiles;

mod error;

pub use backend::{CollectionEvent, CollectionSubscription, Document, DocumentBackend, DocumentEntry};
pub use error::{Result, StoreError};
pub use listings::{ListingEvent, ListingStore, ListingSubscription};
pub use memory::MemoryBackend;
pub use models::*;
pub use paths::{products_collection, profile_document, CollectionPath, DocumentPath};
pub use profiles::ProfileStore;
