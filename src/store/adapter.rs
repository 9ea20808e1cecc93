//! Store Adapter Contract
//!
//! Defines the query intents the ranking engine is allowed to issue against
//! the engagement store, and the error surface of a fetch.
//!
//! The engine never reaches around this trait: a ranking pass is at most one
//! candidate fetch (covering every requested category) followed by one
//! like-set fetch for the viewer. Keeping the contract this narrow is what
//! lets the scoring logic stay store-agnostic and testable against the
//! in-memory implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{PageCandidate, PageId, UserId, UserProfile};

/// Failure surface of a store fetch.
///
/// There are no distinguished "not found" kinds here; an empty result set is
/// a normal outcome. `Unavailable` propagates to the HTTP layer as a
/// 5xx-equivalent and is never retried by the engine.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("engagement store unavailable: {0}")]
    Unavailable(String),
}

/// Which entity kinds a candidate fetch should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    pub content: bool,
    pub users: bool,
}

/// Result of a single batched candidate fetch.
///
/// Pages arrive in the store's native order (creation recency, newest
/// first); users arrive in a stable order by display name.
#[derive(Debug, Default)]
pub struct CandidateSet {
    pub pages: Vec<PageCandidate>,
    pub users: Vec<UserProfile>,
}

/// Read-only query surface the discovery subsystem consumes.
///
/// Text matching is case-insensitive substring matching over the documented
/// fields: title, description, album, artist, and the owner's display name
/// for pages; display name for users.
#[async_trait]
pub trait EngagementStore: Send + Sync {
    /// One batched fetch for every candidate the ranking pass needs.
    ///
    /// Only public pages are returned. With `text` present, a page qualifies
    /// when any single documented field matches (the fields are OR-ed, not
    /// AND-ed). Users are matched on display name and never enumerated
    /// without query text.
    async fn find_public_candidates(
        &self,
        text: Option<&str>,
        filter: CategoryFilter,
    ) -> Result<CandidateSet, StoreError>;

    /// Which of `candidates` the viewer has liked, as one batched lookup.
    async fn find_liked_ids(
        &self,
        viewer: &UserId,
        candidates: &[PageId],
    ) -> Result<HashSet<PageId>, StoreError>;
}
