//! Document path namespace.
//!
//! Every document lives under `artifacts/{app_id}/...` so that multiple
//! deployments can share one store instance:
//!
//! - `artifacts/{app_id}/public/data/products` — the shared listings
//!   collection.
//! - `artifacts/{app_id}/users/{uid}/profile/data` — one profile document
//!   per user.

use market_shared::UserId;

/// Path of a collection in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(pub String);

impl CollectionPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Path of a single document in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    pub collection: CollectionPath,
    pub id: String,
}

impl std::fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection.0, self.id)
    }
}

/// The shared listings collection for a deployment.
pub fn products_collection(app_id: &str) -> CollectionPath {
    CollectionPath(format!("artifacts/{app_id}/public/data/products"))
}

/// The per-user profile document for a deployment.
pub fn profile_document(app_id: &str, uid: &UserId) -> DocumentPath {
    DocumentPath {
        collection: CollectionPath(format!("artifacts/{app_id}/users/{uid}/profile")),
        id: "data".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_namespaced_by_app_id() {
        assert_eq!(
            products_collection("default-app-id").as_str(),
            "artifacts/default-app-id/public/data/products"
        );

        let profile = profile_document("default-app-id", &UserId::from("u1"));
        assert_eq!(
            profile.to_string(),
            "artifacts/default-app-id/users/u1/profile/data"
        );
    }
}
