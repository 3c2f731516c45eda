//! Search and filter over the listing snapshot.

use market_shared::{Category, ListingStatus};
use market_store::Listing;

/// Filter applied to the home page grid.
///
/// `None` for category or status means "All". The default mirrors the home
/// page's initial controls: empty search, all categories, available only.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    /// Case-insensitive substring match on name or description.
    pub search: String,
    pub category: Option<Category>,
    pub status: Option<ListingStatus>,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            status: Some(ListingStatus::Available),
        }
    }
}

impl ListingFilter {
    /// Filter with no constraints at all.
    pub fn all() -> Self {
        Self {
            search: String::new(),
            category: None,
            status: None,
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let matches_search = self.search.is_empty() || {
            let term = self.search.to_lowercase();
            listing.name.to_lowercase().contains(&term)
                || listing.description.to_lowercase().contains(&term)
        };
        let matches_category = self.category.map_or(true, |c| listing.category == c);
        let matches_status = self.status.map_or(true, |s| listing.status == s);

        matches_search && matches_category && matches_status
    }

    /// Apply to a snapshot slice, preserving its order.
    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        listings.iter().filter(|l| self.matches(l)).collect()
    }
}
