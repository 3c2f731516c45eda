use serde::{Deserialize, Serialize};
use uuid::Uuid;

// User identity = opaque identifier assigned by the identity provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl UserId {
    /// Generate a fresh provider-style identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque document identifier assigned by the store when a listing is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ListingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Product category. Serialized capitalized, matching the stored documents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Cycles,
    Electronics,
    Books,
    Furniture,
    Others,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Cycles,
        Category::Electronics,
        Category::Books,
        Category::Furniture,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cycles => "Cycles",
            Category::Electronics => "Electronics",
            Category::Books => "Books",
            Category::Furniture => "Furniture",
            Category::Others => "Others",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sale status of a listing. Serialized lowercase ("available" / "sold").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Sold,
}

impl ListingStatus {
    /// The status a toggle transitions to. Flips between exactly the two
    /// variants, never a third value.
    pub fn toggled(&self) -> Self {
        match self {
            ListingStatus::Available => ListingStatus::Sold,
            ListingStatus::Sold => ListingStatus::Available,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "available",
            ListingStatus::Sold => "sold",
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_toggles_between_two_values() {
        assert_eq!(ListingStatus::Available.toggled(), ListingStatus::Sold);
        assert_eq!(ListingStatus::Sold.toggled(), ListingStatus::Available);
        assert_eq!(
            ListingStatus::Available.toggled().toggled(),
            ListingStatus::Available
        );
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ListingStatus::Available).unwrap(),
            "\"available\""
        );
        assert_eq!(
            serde_json::to_string(&ListingStatus::Sold).unwrap(),
            "\"sold\""
        );
    }

    #[test]
    fn category_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&Category::Cycles).unwrap(),
            "\"Cycles\""
        );
        let parsed: Category = serde_json::from_str("\"Books\"").unwrap();
        assert_eq!(parsed, Category::Books);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ListingId::generate(), ListingId::generate());
        assert_ne!(UserId::generate(), UserId::generate());
    }
}
