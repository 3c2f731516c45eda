//! Typed adapter over the shared listings collection.
//!
//! Reads flow one way: the backend pushes full snapshots through a live
//! subscription and [`ListingSubscription`] decodes and sorts them. Writes
//! are request/response and never touch a local cache; callers observe their
//! own writes through the next snapshot, like everyone else's.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use market_shared::{AppConfig, ListingId, ListingStatus};

use crate::backend::{CollectionEvent, CollectionSubscription, Document, DocumentBackend};
use crate::error::{Result, StoreError};
use crate::models::{Listing, ListingPatch, NewListing};
use crate::paths::{products_collection, CollectionPath};

/// Adapter for the shared listings collection.
#[derive(Clone)]
pub struct ListingStore {
    backend: Arc<dyn DocumentBackend>,
    collection: CollectionPath,
}

/// Events delivered to listing subscribers.
#[derive(Debug, Clone)]
pub enum ListingEvent {
    /// A full refresh of the collection, sorted by timestamp descending
    /// (stable; equal timestamps keep store order).
    Snapshot(Vec<Listing>),
    /// The live read failed. Consumers keep their last-known snapshot.
    Error(String),
}

/// Live subscription handle decoding raw collection events into listings.
#[derive(Debug)]
pub struct ListingSubscription {
    inner: CollectionSubscription,
}

impl ListingSubscription {
    /// Receive the next snapshot or error, `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<ListingEvent> {
        let event = self.inner.recv().await?;
        Some(match event {
            CollectionEvent::Snapshot(entries) => {
                let mut listings: Vec<Listing> = entries
                    .into_iter()
                    .filter_map(|entry| {
                        let value = serde_json::Value::Object(entry.body);
                        match serde_json::from_value::<Listing>(value) {
                            Ok(mut listing) => {
                                listing.id = ListingId(entry.id);
                                Some(listing)
                            }
                            Err(e) => {
                                warn!(id = %entry.id, error = %e, "skipping malformed listing document");
                                None
                            }
                        }
                    })
                    .collect();
                // Newest first; stable so equal timestamps keep store order.
                listings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                ListingEvent::Snapshot(listings)
            }
            CollectionEvent::Error(message) => ListingEvent::Error(message),
        })
    }

    /// Detach from the backend. Idempotent; dropping the handle does the same.
    pub fn unsubscribe(&mut self) {
        self.inner.unsubscribe();
    }
}

impl ListingStore {
    pub fn new(backend: Arc<dyn DocumentBackend>, config: &AppConfig) -> Self {
        Self {
            backend,
            collection: products_collection(&config.app_id),
        }
    }

    /// Open a live subscription over the full collection.
    pub async fn subscribe(&self) -> Result<ListingSubscription> {
        let inner = self.backend.subscribe_collection(&self.collection).await?;
        Ok(ListingSubscription { inner })
    }

    /// Create a listing. The store assigns the id; the creation timestamp is
    /// set here and never rewritten. Status defaults to available.
    pub async fn create(&self, new: NewListing) -> Result<ListingId> {
        let listing = Listing {
            id: ListingId::default(),
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            status: new.status.unwrap_or(ListingStatus::Available),
            seller_id: new.seller_id,
            image_url: new.image_url,
            timestamp: Utc::now(),
        };

        let body = to_document(&listing)?;
        let id = self.backend.add_document(&self.collection, body).await?;
        Ok(ListingId(id))
    }

    /// Merge a field-level patch into an existing listing. Last-write-wins
    /// per field; `seller_id` and `timestamp` are unreachable by the patch
    /// type and therefore survive every edit.
    pub async fn update(&self, id: &ListingId, patch: ListingPatch) -> Result<()> {
        let body = to_document(&patch)?;
        self.backend
            .update_document(&self.collection, id.as_str(), body)
            .await
    }

    /// Delete a listing. Succeeds or rejects; the disappearance is observed
    /// via the next snapshot.
    pub async fn delete(&self, id: &ListingId) -> Result<()> {
        self.backend
            .delete_document(&self.collection, id.as_str())
            .await
    }
}

fn to_document<T: serde::Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::Write(format!(
            "expected document object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use market_shared::{Category, UserId};

    fn store() -> (MemoryBackend, ListingStore) {
        let backend = MemoryBackend::new();
        let config = AppConfig::default();
        let store = ListingStore::new(Arc::new(backend.clone()), &config);
        (backend, store)
    }

    fn draft(name: &str, seller: &str) -> NewListing {
        NewListing {
            name: name.to_string(),
            description: format!("{name} in good shape"),
            price: 120.0,
            category: Category::Books,
            status: None,
            seller_id: UserId::from(seller),
            image_url: None,
        }
    }

    async fn next_snapshot(sub: &mut ListingSubscription) -> Vec<Listing> {
        match sub.recv().await {
            Some(ListingEvent::Snapshot(listings)) => listings,
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn created_listing_appears_in_next_snapshot_with_id_and_default_status() {
        let (_, store) = store();
        let mut sub = store.subscribe().await.unwrap();
        next_snapshot(&mut sub).await; // initial, empty

        let id = store.create(draft("Algebra textbook", "u1")).await.unwrap();

        let snapshot = next_snapshot(&mut sub).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert_eq!(snapshot[0].status, ListingStatus::Available);
        assert_eq!(snapshot[0].seller_id, UserId::from("u1"));
    }

    #[tokio::test]
    async fn explicit_status_is_respected_on_create() {
        let (_, store) = store();
        let mut sub = store.subscribe().await.unwrap();
        next_snapshot(&mut sub).await;

        let mut new = draft("Old cycle", "u1");
        new.status = Some(ListingStatus::Sold);
        store.create(new).await.unwrap();

        let snapshot = next_snapshot(&mut sub).await;
        assert_eq!(snapshot[0].status, ListingStatus::Sold);
    }

    #[tokio::test]
    async fn snapshots_are_sorted_newest_first() {
        let (_, store) = store();
        store.create(draft("first", "u1")).await.unwrap();
        store.create(draft("second", "u1")).await.unwrap();
        store.create(draft("third", "u1")).await.unwrap();

        let mut sub = store.subscribe().await.unwrap();
        let snapshot = next_snapshot(&mut sub).await;

        let names: Vec<&str> = snapshot.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
        assert!(snapshot
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn edit_preserves_seller_and_timestamp() {
        let (_, store) = store();
        let id = store.create(draft("Desk", "u1")).await.unwrap();

        let mut sub = store.subscribe().await.unwrap();
        let original = next_snapshot(&mut sub).await.remove(0);

        store
            .update(
                &id,
                ListingPatch {
                    name: Some("Standing desk".into()),
                    description: Some("Now with new description".into()),
                    price: Some(999.0),
                    category: Some(Category::Furniture),
                    status: Some(ListingStatus::Sold),
                    image_url: Some("https://example.com/desk.jpg".into()),
                },
            )
            .await
            .unwrap();

        let edited = next_snapshot(&mut sub).await.remove(0);
        assert_eq!(edited.name, "Standing desk");
        assert_eq!(edited.status, ListingStatus::Sold);
        assert_eq!(edited.seller_id, original.seller_id);
        assert_eq!(edited.timestamp, original.timestamp);
    }

    #[tokio::test]
    async fn deleted_listing_is_gone_from_the_very_next_snapshot() {
        let (_, store) = store();
        let keep = store.create(draft("keep", "u1")).await.unwrap();
        let gone = store.create(draft("gone", "u1")).await.unwrap();

        let mut sub = store.subscribe().await.unwrap();
        next_snapshot(&mut sub).await;

        store.delete(&gone).await.unwrap();

        let snapshot = next_snapshot(&mut sub).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, keep);
        // No residual state under any status.
        assert!(snapshot.iter().all(|l| l.id != gone));
    }

    #[tokio::test]
    async fn rejected_write_surfaces_store_error() {
        let (backend, store) = store();
        backend.fail_next_write("permission denied");

        let err = store.create(draft("nope", "u1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
    }

    #[tokio::test]
    async fn subscription_error_is_delivered_as_event() {
        let (backend, store) = store();
        store.create(draft("survivor", "u1")).await.unwrap();

        let mut sub = store.subscribe().await.unwrap();
        next_snapshot(&mut sub).await;

        backend.inject_subscription_error(
            &products_collection(&AppConfig::default().app_id),
            "stream closed",
        );

        match sub.recv().await {
            Some(ListingEvent::Error(message)) => assert_eq!(message, "stream closed"),
            other => panic!("expected error event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_documents_are_skipped_not_fatal() {
        let (backend, store) = store();
        let collection = products_collection(&AppConfig::default().app_id);

        // A document missing required fields sits alongside a valid one.
        let mut bad = Document::new();
        bad.insert("name".into(), serde_json::json!("incomplete"));
        backend.add_document(&collection, bad).await.unwrap();
        store.create(draft("valid", "u1")).await.unwrap();

        let mut sub = store.subscribe().await.unwrap();
        let snapshot = next_snapshot(&mut sub).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name, "valid");
    }
}
