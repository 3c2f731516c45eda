//! The document-backend seam.
//!
//! [`DocumentBackend`] is the contract a hosted document database fulfils:
//! point reads, merge-writes, collection mutations, and live collection
//! subscriptions that deliver a full fresh snapshot on every change, in
//! emission order. [`crate::MemoryBackend`] implements it in-process; a real
//! deployment would implement it over the provider's SDK.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::paths::{CollectionPath, DocumentPath};

/// A document body: a flat JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// One document in a collection snapshot, paired with its store-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEntry {
    pub id: String,
    pub body: Document,
}

/// Events delivered on a live collection subscription.
#[derive(Debug, Clone)]
pub enum CollectionEvent {
    /// A full, fresh snapshot of the collection. Delivered once immediately
    /// after subscribing and again after every server-side change, by any
    /// client. Intermediate snapshots are never coalesced or dropped.
    Snapshot(Vec<DocumentEntry>),
    /// The live read failed. The subscription delivers no further snapshots;
    /// consumers keep their last-known snapshot.
    Error(String),
}

/// Handle to a live collection subscription.
///
/// Tearing down is idempotent: [`unsubscribe`](Self::unsubscribe) detaches
/// from the backend exactly once, and dropping the handle without calling it
/// performs the same teardown.
pub struct CollectionSubscription {
    rx: mpsc::UnboundedReceiver<CollectionEvent>,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl CollectionSubscription {
    pub fn new(
        rx: mpsc::UnboundedReceiver<CollectionEvent>,
        cancel: Box<dyn FnOnce() + Send>,
    ) -> Self {
        Self {
            rx,
            cancel: Some(cancel),
        }
    }

    /// Receive the next event, or `None` once the subscription has ended.
    pub async fn recv(&mut self) -> Option<CollectionEvent> {
        self.rx.recv().await
    }

    /// Detach from the backend. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for CollectionSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for CollectionSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Operations consumed from the hosted document database.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Point-read a document. Absence is `Ok(None)`, not an error.
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>>;

    /// Merge `body` into the document at `path`, creating it if absent.
    /// Fields not present in `body` are left untouched.
    async fn set_document_merged(&self, path: &DocumentPath, body: Document) -> Result<()>;

    /// Add a new document to a collection; the backend assigns and returns
    /// its id.
    async fn add_document(&self, collection: &CollectionPath, body: Document) -> Result<String>;

    /// Merge `patch` into an existing document, field-level last-write-wins.
    async fn update_document(
        &self,
        collection: &CollectionPath,
        id: &str,
        patch: Document,
    ) -> Result<()>;

    /// Delete a document.
    async fn delete_document(&self, collection: &CollectionPath, id: &str) -> Result<()>;

    /// Open a live subscription over a whole collection.
    async fn subscribe_collection(
        &self,
        collection: &CollectionPath,
    ) -> Result<CollectionSubscription>;
}
