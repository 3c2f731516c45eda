//! Domain model structs stored as documents in the remote database.
//!
//! Field names are serialized camelCase to match the document format the
//! store actually holds, so every struct round-trips through the backend's
//! JSON maps unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use market_shared::{Category, ListingId, ListingStatus, UserId};

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// A product listed for sale in the shared collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Store-assigned document id. Not part of the document body; attached
    /// when a snapshot is decoded.
    #[serde(skip)]
    pub id: ListingId,
    pub name: String,
    pub description: String,
    /// Non-negative price.
    pub price: f64,
    pub category: Category,
    pub status: ListingStatus,
    /// Identifier of the owning seller. Immutable after creation.
    pub seller_id: UserId,
    /// Optional free-text image URL (no upload pipeline).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Creation instant. Immutable after creation; sort key for all views.
    pub timestamp: DateTime<Utc>,
}

/// Fields a seller supplies when creating a listing. The store assigns the
/// id and the creation timestamp.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    /// Defaults to [`ListingStatus::Available`] when not set.
    pub status: Option<ListingStatus>,
    pub seller_id: UserId,
    pub image_url: Option<String>,
}

/// Field-level patch for an existing listing.
///
/// Deliberately has no `seller_id` or `timestamp` field: both are immutable
/// after creation, so an edit cannot touch them.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ListingPatch {
    /// Patch that only flips the status, as the toggle operation issues.
    pub fn status_only(status: ListingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// UserProfile
// ---------------------------------------------------------------------------

/// The extended identity record layered over the bare authenticated
/// identity, keyed 1:1 by user identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    /// Sourced from the identity provider; write-protected by convention
    /// (the typed patch cannot touch it).
    pub email: String,
    #[serde(default)]
    pub hostel: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub bio: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// The default profile synthesized at sign-up (and self-healed at
    /// sign-in when the document is missing): name derived from the email
    /// local-part, everything else empty.
    pub fn default_for(email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            name,
            email: email.to_string(),
            hostel: String::new(),
            department: String::new(),
            contact_phone: String::new(),
            bio: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Field-level patch for a profile. Merged into the stored document; fields
/// left as `None` are never cleared. Carries no `email` or `created_at`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_derives_name_from_email_local_part() {
        let profile = UserProfile::default_for("alice@example.com");
        assert_eq!(profile.name, "alice");
        assert_eq!(profile.email, "alice@example.com");
        assert!(profile.hostel.is_empty());
        assert!(profile.bio.is_empty());
        assert!(profile.updated_at.is_none());
    }

    #[test]
    fn listing_serializes_camel_case_without_id() {
        let listing = Listing {
            id: ListingId::from("p1"),
            name: "Desk lamp".into(),
            description: "Barely used".into(),
            price: 250.0,
            category: Category::Furniture,
            status: ListingStatus::Available,
            seller_id: UserId::from("u1"),
            image_url: None,
            timestamp: Utc::now(),
        };

        let value = serde_json::to_value(&listing).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["sellerId"], "u1");
        assert_eq!(value["status"], "available");
        assert!(value.get("imageUrl").is_none());
    }

    #[test]
    fn status_only_patch_serializes_single_field() {
        let patch = ListingPatch::status_only(ListingStatus::Sold);
        let value = serde_json::to_value(&patch).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["status"], "sold");
    }
}
