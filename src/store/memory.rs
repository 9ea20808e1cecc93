use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;

use super::adapter::{CandidateSet, CategoryFilter, EngagementStore, StoreError};
use super::types::{
    Comment, CommentId, PageCandidate, PageId, TreePage, UserId, UserProfile, now_ms,
};

/// In-memory engagement store.
///
/// Backs both the discovery read path (via the `EngagementStore` trait) and
/// the CRUD surface. All collections are concurrent maps; individual
/// operations are atomic per key and no cross-key transactions exist, which
/// is acceptable for the read-committed consistency the ranking engine
/// assumes.
pub struct MemoryStore {
    pages: DashMap<PageId, TreePage>,
    users: DashMap<UserId, UserProfile>,
    /// Like edges per page. The set form makes duplicate likes idempotent.
    likes: DashMap<PageId, HashSet<UserId>>,
    /// Comments per page, insertion order.
    comments: DashMap<PageId, Vec<Comment>>,
    /// Newsletter subscriptions, keyed by address.
    subscribers: DashMap<String, ()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            pages: DashMap::new(),
            users: DashMap::new(),
            likes: DashMap::new(),
            comments: DashMap::new(),
            subscribers: DashMap::new(),
        }
    }

    // --- Users ---

    pub fn upsert_user(&self, profile: UserProfile) {
        self.users.insert(profile.id.clone(), profile);
    }

    pub fn get_user(&self, id: &UserId) -> Option<UserProfile> {
        self.users.get(id).map(|entry| entry.value().clone())
    }

    // --- Pages ---

    /// Inserts or replaces a page.
    pub fn upsert_page(&self, page: TreePage) {
        self.pages.insert(page.id.clone(), page);
    }

    pub fn get_page(&self, id: &PageId) -> Option<TreePage> {
        self.pages.get(id).map(|entry| entry.value().clone())
    }

    /// Removes a page together with its like edges and comments.
    pub fn delete_page(&self, id: &PageId) -> Option<TreePage> {
        let removed = self.pages.remove(id).map(|(_, page)| page);
        if removed.is_some() {
            self.likes.remove(id);
            self.comments.remove(id);
        }
        removed
    }

    /// Increments the click counter and returns the updated page.
    pub fn record_click(&self, id: &PageId) -> Option<TreePage> {
        self.pages.get_mut(id).map(|mut entry| {
            entry.clicks += 1;
            entry.clone()
        })
    }

    /// All pages of one owner, hydrated, newest first. `include_private`
    /// is set when the owner themselves is asking.
    pub fn pages_of_owner(&self, owner: &UserId, include_private: bool) -> Vec<PageCandidate> {
        let mut result: Vec<PageCandidate> = self
            .pages
            .iter()
            .filter(|entry| &entry.owner == owner && (include_private || entry.is_public))
            .filter_map(|entry| self.hydrate(entry.value()))
            .collect();
        sort_native(&mut result);
        result
    }

    // --- Likes ---

    /// Adds a like edge. Returns `false` when the page does not exist or the
    /// viewer already liked it.
    pub fn add_like(&self, page: &PageId, user: &UserId) -> bool {
        if !self.pages.contains_key(page) {
            return false;
        }
        self.likes
            .entry(page.clone())
            .or_default()
            .insert(user.clone())
    }

    /// Removes a like edge. Returns `false` when no such edge existed.
    pub fn remove_like(&self, page: &PageId, user: &UserId) -> bool {
        self.likes
            .get_mut(page)
            .map(|mut entry| entry.remove(user))
            .unwrap_or(false)
    }

    pub fn like_count(&self, page: &PageId) -> u64 {
        self.likes
            .get(page)
            .map(|entry| entry.len() as u64)
            .unwrap_or(0)
    }

    /// Hydrated pages the user has liked, newest first.
    pub fn pages_liked_by(&self, user: &UserId) -> Vec<PageCandidate> {
        let mut result: Vec<PageCandidate> = self
            .likes
            .iter()
            .filter(|entry| entry.value().contains(user))
            .filter_map(|entry| self.get_page(entry.key()))
            .filter_map(|page| self.hydrate(&page))
            .collect();
        sort_native(&mut result);
        result
    }

    // --- Comments ---

    /// Appends a comment. Returns `None` when the page does not exist.
    pub fn add_comment(&self, page: &PageId, author: &UserId, message: String) -> Option<Comment> {
        if !self.pages.contains_key(page) {
            return None;
        }
        let comment = Comment {
            id: CommentId::new(),
            page_id: page.clone(),
            author: author.clone(),
            message,
            created_at: now_ms(),
        };
        self.comments
            .entry(page.clone())
            .or_default()
            .push(comment.clone());
        Some(comment)
    }

    /// Comments on a page, newest first.
    pub fn comments_for(&self, page: &PageId) -> Vec<Comment> {
        let mut result = self
            .comments
            .get(page)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }

    pub fn comment_count(&self, page: &PageId) -> u64 {
        self.comments
            .get(page)
            .map(|entry| entry.len() as u64)
            .unwrap_or(0)
    }

    pub fn find_comment(&self, page: &PageId, comment: &CommentId) -> Option<Comment> {
        self.comments
            .get(page)
            .and_then(|entry| entry.iter().find(|c| &c.id == comment).cloned())
    }

    /// Removes a comment. Returns `false` when no such comment existed.
    pub fn delete_comment(&self, page: &PageId, comment: &CommentId) -> bool {
        self.comments
            .get_mut(page)
            .map(|mut entry| {
                let before = entry.len();
                entry.retain(|c| &c.id != comment);
                entry.len() < before
            })
            .unwrap_or(false)
    }

    /// Hydrated pages the user has commented on, newest first.
    pub fn pages_commented_by(&self, user: &UserId) -> Vec<PageCandidate> {
        let mut result: Vec<PageCandidate> = self
            .comments
            .iter()
            .filter(|entry| entry.value().iter().any(|c| &c.author == user))
            .filter_map(|entry| self.get_page(entry.key()))
            .filter_map(|page| self.hydrate(&page))
            .collect();
        sort_native(&mut result);
        result
    }

    // --- Newsletter ---

    /// Returns `false` when the address was already subscribed.
    pub fn subscribe(&self, email: String) -> bool {
        self.subscribers.insert(email, ()).is_none()
    }

    /// Returns `false` when the address was not subscribed.
    pub fn unsubscribe(&self, email: &str) -> bool {
        self.subscribers.remove(email).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // --- Hydration ---

    /// Attaches aggregate counts and the owner summary to a page. Pages
    /// whose owner record is missing are dropped rather than served with a
    /// hole where the owner belongs.
    pub fn hydrate(&self, page: &TreePage) -> Option<PageCandidate> {
        let owner = match self.get_user(&page.owner) {
            Some(owner) => owner,
            None => {
                tracing::warn!("Dropping page {} with missing owner record", page.id.0);
                return None;
            }
        };
        Some(PageCandidate {
            like_count: self.like_count(&page.id),
            comment_count: self.comment_count(&page.id),
            page: page.clone(),
            owner,
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngagementStore for MemoryStore {
    async fn find_public_candidates(
        &self,
        text: Option<&str>,
        filter: CategoryFilter,
    ) -> Result<CandidateSet, StoreError> {
        let mut set = CandidateSet::default();
        let needle = text.map(str::to_lowercase).filter(|t| !t.is_empty());

        if filter.content {
            for entry in self.pages.iter() {
                let page = entry.value();
                if !page.is_public {
                    continue;
                }
                let Some(candidate) = self.hydrate(page) else {
                    continue;
                };
                if let Some(needle) = &needle {
                    if !page_matches(&candidate, needle) {
                        continue;
                    }
                }
                set.pages.push(candidate);
            }
            sort_native(&mut set.pages);
        }

        // Users are never enumerated without query text.
        if filter.users {
            if let Some(needle) = &needle {
                for entry in self.users.iter() {
                    if contains_ci(&entry.name, needle) {
                        set.users.push(entry.value().clone());
                    }
                }
                set.users
                    .sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.0.cmp(&b.id.0)));
            }
        }

        tracing::debug!(
            "Candidate fetch matched {} pages, {} users",
            set.pages.len(),
            set.users.len()
        );
        Ok(set)
    }

    async fn find_liked_ids(
        &self,
        viewer: &UserId,
        candidates: &[PageId],
    ) -> Result<HashSet<PageId>, StoreError> {
        Ok(candidates
            .iter()
            .filter(|id| {
                self.likes
                    .get(*id)
                    .map(|entry| entry.contains(viewer))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

/// Any single field match qualifies the page; `needle` must already be
/// lowercased.
fn page_matches(candidate: &PageCandidate, needle: &str) -> bool {
    let page = &candidate.page;
    contains_ci(&page.title, needle)
        || contains_ci(&page.description, needle)
        || page
            .album
            .as_deref()
            .map(|album| contains_ci(album, needle))
            .unwrap_or(false)
        || contains_ci(&page.artist, needle)
        || contains_ci(&candidate.owner.name, needle)
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Native order: creation recency, newest first, page id as a final
/// tiebreaker so identical timestamps still order deterministically.
fn sort_native(pages: &mut [PageCandidate]) {
    pages.sort_by(|a, b| {
        b.page
            .created_at
            .cmp(&a.page.created_at)
            .then_with(|| a.page.id.cmp(&b.page.id))
    });
}
