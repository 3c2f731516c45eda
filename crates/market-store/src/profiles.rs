//! Typed adapter over the per-user profile document.

use std::sync::Arc;

use chrono::Utc;

use market_shared::{AppConfig, UserId};

use crate::backend::{Document, DocumentBackend};
use crate::error::{Result, StoreError};
use crate::models::{ProfilePatch, UserProfile};
use crate::paths::profile_document;

/// Adapter reading and merge-writing one profile document per user.
#[derive(Clone)]
pub struct ProfileStore {
    backend: Arc<dyn DocumentBackend>,
    app_id: String,
}

impl ProfileStore {
    pub fn new(backend: Arc<dyn DocumentBackend>, config: &AppConfig) -> Self {
        Self {
            backend,
            app_id: config.app_id.clone(),
        }
    }

    /// Fetch a user's profile. Absence is a legitimate state, not an error.
    pub async fn get(&self, uid: &UserId) -> Result<Option<UserProfile>> {
        let path = profile_document(&self.app_id, uid);
        let doc = self.backend.get_document(&path).await?;
        match doc {
            Some(body) => {
                let profile = serde_json::from_value(serde_json::Value::Object(body))?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    /// Write a full profile document with merge semantics, creating it if
    /// absent. Used for the synthesized default profile.
    pub async fn put(&self, uid: &UserId, profile: &UserProfile) -> Result<()> {
        let path = profile_document(&self.app_id, uid);
        self.backend
            .set_document_merged(&path, to_document(profile)?)
            .await
    }

    /// Merge a partial update into the profile. Unlisted fields are never
    /// cleared. Sets `updatedAt` to now.
    ///
    /// The typed patch cannot touch `email`; a caller going through the raw
    /// [`DocumentBackend`] still could. Known gap, not enforced here.
    pub async fn upsert(&self, uid: &UserId, patch: ProfilePatch) -> Result<()> {
        let path = profile_document(&self.app_id, uid);

        let mut body = to_document(&patch)?;
        body.insert(
            "updatedAt".to_string(),
            serde_json::to_value(Utc::now())?,
        );

        self.backend.set_document_merged(&path, body).await
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
