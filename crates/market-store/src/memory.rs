//! In-process [`DocumentBackend`] used for local development and tests.
//!
//! Mutations and snapshot fan-out happen under one lock, so every subscriber
//! observes snapshots in emission order with nothing coalesced. Failure
//! hooks let consumers exercise the write-rejection and subscription-failure
//! paths without a real backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::backend::{
    CollectionEvent, CollectionSubscription, Document, DocumentBackend, DocumentEntry,
};
use crate::error::{Result, StoreError};
use crate::paths::{CollectionPath, DocumentPath};

struct Subscriber {
    id: u64,
    tx: mpsc::UnboundedSender<CollectionEvent>,
}

#[derive(Default)]
struct Inner {
    /// Documents per collection, in insertion order.
    collections: HashMap<String, Vec<(String, Document)>>,
    subscribers: HashMap<String, Vec<Subscriber>>,
    next_subscriber_id: u64,
    /// When set, the next mutating operation fails with this message.
    fail_next_write: Option<String>,
}

/// In-memory document store with live collection subscriptions.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next create/update/delete/merge fail with `message`,
    /// simulating a network or permission rejection.
    pub fn fail_next_write(&self, message: &str) {
        self.lock().fail_next_write = Some(message.to_string());
    }

    /// Deliver a subscription error to every live subscriber of
    /// `collection`, simulating a live-read failure.
    pub fn inject_subscription_error(&self, collection: &CollectionPath, message: &str) {
        let inner = self.lock();
        if let Some(subs) = inner.subscribers.get(collection.as_str()) {
            for sub in subs {
                let _ = sub.tx.send(CollectionEvent::Error(message.to_string()));
            }
        }
    }

    /// Number of live subscribers on a collection.
    pub fn subscriber_count(&self, collection: &CollectionPath) -> usize {
        self.lock()
            .subscribers
            .get(collection.as_str())
            .map(|s| s.len())
            .unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Inner {
    fn take_write_failure(&mut self) -> Result<()> {
        match self.fail_next_write.take() {
            Some(message) => Err(StoreError::Write(message)),
            None => Ok(()),
        }
    }

    fn snapshot(&self, collection: &str) -> Vec<DocumentEntry> {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, body)| DocumentEntry {
                        id: id.clone(),
                        body: body.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Push a fresh snapshot to every subscriber, dropping closed channels.
    fn publish(&mut self, collection: &str) {
        let snapshot = self.snapshot(collection);
        if let Some(subs) = self.subscribers.get_mut(collection) {
            subs.retain(|sub| sub.tx.send(CollectionEvent::Snapshot(snapshot.clone())).is_ok());
        }
    }
}

fn merge_into(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>> {
        let inner = self.lock();
        let doc = inner
            .collections
            .get(path.collection.as_str())
            .and_then(|docs| docs.iter().find(|(id, _)| id == &path.id))
            .map(|(_, body)| body.clone());
        Ok(doc)
    }

    async fn set_document_merged(&self, path: &DocumentPath, body: Document) -> Result<()> {
        let mut inner = self.lock();
        inner.take_write_failure()?;

        let docs = inner
            .collections
            .entry(path.collection.as_str().to_string())
            .or_default();

        match docs.iter_mut().find(|(id, _)| id == &path.id) {
            Some((_, existing)) => merge_into(existing, body),
            None => docs.push((path.id.clone(), body)),
        }

        inner.publish(path.collection.as_str());
        Ok(())
    }

    async fn add_document(&self, collection: &CollectionPath, body: Document) -> Result<String> {
        let mut inner = self.lock();
        inner.take_write_failure()?;

        let id = Uuid::new_v4().to_string();
        inner
            .collections
            .entry(collection.as_str().to_string())
            .or_default()
            .push((id.clone(), body));

        debug!(collection = %collection, id = %id, "document added");
        inner.publish(collection.as_str());
        Ok(id)
    }

    async fn update_document(
        &self,
        collection: &CollectionPath,
        id: &str,
        patch: Document,
    ) -> Result<()> {
        let mut inner = self.lock();
        inner.take_write_failure()?;

        let found = inner
            .collections
            .get_mut(collection.as_str())
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .map(|(_, body)| merge_into(body, patch))
            .is_some();

        if found {
            inner.publish(collection.as_str());
            Ok(())
        } else {
            Err(StoreError::NotFound(format!("{collection}/{id}")))
        }
    }

    async fn delete_document(&self, collection: &CollectionPath, id: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.take_write_failure()?;

        let removed = inner
            .collections
            .get_mut(collection.as_str())
            .map(|docs| {
                let before = docs.len();
                docs.retain(|(doc_id, _)| doc_id != id);
                docs.len() != before
            })
            .unwrap_or(false);

        if removed {
            debug!(collection = %collection, id = %id, "document deleted");
            inner.publish(collection.as_str());
        }
        Ok(())
    }

    async fn subscribe_collection(
        &self,
        collection: &CollectionPath,
    ) -> Result<CollectionSubscription> {
        let (tx, rx) = mpsc::unbounded_channel();

        let subscriber_id = {
            let mut inner = self.lock();
            let subscriber_id = inner.next_subscriber_id;
            inner.next_subscriber_id += 1;

            // Initial snapshot fires immediately, before any later change.
            let initial = inner.snapshot(collection.as_str());
            let _ = tx.send(CollectionEvent::Snapshot(initial));

            inner
                .subscribers
                .entry(collection.as_str().to_string())
                .or_default()
                .push(Subscriber {
                    id: subscriber_id,
                    tx,
                });
            subscriber_id
        };

        let backend = self.inner.clone();
        let collection_key = collection.as_str().to_string();
        let cancel = Box::new(move || {
            let mut inner = backend.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(subs) = inner.subscribers.get_mut(&collection_key) {
                subs.retain(|sub| sub.id != subscriber_id);
            }
            debug!(collection = %collection_key, "subscription detached");
        });

        Ok(CollectionSubscription::new(rx, cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(pairs: &[(&str, &str)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect()
    }

    fn products() -> CollectionPath {
        crate::paths::products_collection("test-app")
    }

    #[tokio::test]
    async fn subscribe_delivers_initial_snapshot_immediately() {
        let backend = MemoryBackend::new();
        backend
            .add_document(&products(), doc(&[("name", "Lamp")]))
            .await
            .unwrap();

        let mut sub = backend.subscribe_collection(&products()).await.unwrap();
        match sub.recv().await {
            Some(CollectionEvent::Snapshot(entries)) => assert_eq!(entries.len(), 1),
            other => panic!("expected initial snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn every_mutation_emits_a_fresh_snapshot_in_order() {
        let backend = MemoryBackend::new();
        let mut sub = backend.subscribe_collection(&products()).await.unwrap();

        // Initial (empty).
        assert!(matches!(
            sub.recv().await,
            Some(CollectionEvent::Snapshot(ref s)) if s.is_empty()
        ));

        let id1 = backend
            .add_document(&products(), doc(&[("name", "A")]))
            .await
            .unwrap();
        backend
            .add_document(&products(), doc(&[("name", "B")]))
            .await
            .unwrap();
        backend.delete_document(&products(), &id1).await.unwrap();

        // Three mutations, three snapshots, none coalesced.
        let sizes: Vec<usize> = [sub.recv().await, sub.recv().await, sub.recv().await]
            .into_iter()
            .map(|ev| match ev {
                Some(CollectionEvent::Snapshot(s)) => s.len(),
                other => panic!("expected snapshot, got {other:?}"),
            })
            .collect();
        assert_eq!(sizes, vec![1, 2, 1]);
    }

    #[tokio::test]
    async fn set_merged_preserves_unlisted_fields() {
        let backend = MemoryBackend::new();
        let path = crate::paths::profile_document("test-app", &market_shared::UserId::from("u1"));

        backend
            .set_document_merged(&path, doc(&[("name", "alice"), ("email", "a@x.com")]))
            .await
            .unwrap();
        backend
            .set_document_merged(&path, doc(&[("name", "Alice B")]))
            .await
            .unwrap();

        let stored = backend.get_document(&path).await.unwrap().unwrap();
        assert_eq!(stored["name"], "Alice B");
        assert_eq!(stored["email"], "a@x.com");
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .update_document(&products(), "nope", doc(&[("name", "X")]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent_and_detaches_once() {
        let backend = MemoryBackend::new();
        let mut sub = backend.subscribe_collection(&products()).await.unwrap();
        assert_eq!(backend.subscriber_count(&products()), 1);

        sub.unsubscribe();
        sub.unsubscribe();
        assert_eq!(backend.subscriber_count(&products()), 0);

        // Dropping after an explicit unsubscribe must not panic or double-detach.
        drop(sub);
        assert_eq!(backend.subscriber_count(&products()), 0);
    }

    #[tokio::test]
    async fn drop_detaches_subscription() {
        let backend = MemoryBackend::new();
        let sub = backend.subscribe_collection(&products()).await.unwrap();
        assert_eq!(backend.subscriber_count(&products()), 1);
        drop(sub);
        assert_eq!(backend.subscriber_count(&products()), 0);
    }

    #[tokio::test]
    async fn injected_write_failure_rejects_next_mutation_only() {
        let backend = MemoryBackend::new();
        backend.fail_next_write("permission denied");

        let err = backend
            .add_document(&products(), doc(&[("name", "A")]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));

        // Subsequent writes succeed again.
        backend
            .add_document(&products(), doc(&[("name", "A")]))
            .await
            .unwrap();
    }
}
