//! # market-shared
//!
//! Domain types shared by every crate in the campus-market workspace:
//! identifiers, the category/status enums, and the deployment configuration
//! that namespaces all remote documents.

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::{Category, ListingId, ListingStatus, UserId};
