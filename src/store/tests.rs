//! Store Module Tests
//!
//! Validates the in-memory engagement store: CRUD mechanics, candidate
//! matching, and aggregate hydration.
//!
//! ## Test Scopes
//! - **CRUD**: page/like/comment/newsletter lifecycle operations.
//! - **Matching**: case-insensitive field matching and visibility filtering.
//! - **Hydration**: derived counts and owner summaries on candidates.

#[cfg(test)]
mod tests {
    use crate::store::adapter::{CategoryFilter, EngagementStore};
    use crate::store::memory::MemoryStore;
    use crate::store::types::{PageId, ServiceLinks, TreePage, UserId, UserProfile};

    const BOTH: CategoryFilter = CategoryFilter {
        content: true,
        users: true,
    };

    fn user(store: &MemoryStore, name: &str) -> UserProfile {
        let profile = UserProfile {
            id: UserId(format!("user-{name}")),
            name: name.to_string(),
            image: None,
        };
        store.upsert_user(profile.clone());
        profile
    }

    fn page(store: &MemoryStore, owner: &UserId, title: &str, created_at: u64) -> TreePage {
        let page = TreePage {
            id: PageId(format!("page-{title}")),
            owner: owner.clone(),
            title: title.to_string(),
            artist: "Some Artist".to_string(),
            album: None,
            description: String::new(),
            cover: None,
            is_public: true,
            release_date: created_at,
            created_at,
            clicks: 0,
            urls: ServiceLinks::default(),
            yt_id: None,
        };
        store.upsert_page(page.clone());
        page
    }

    // ============================================================
    // PAGE CRUD
    // ============================================================

    #[test]
    fn test_upsert_and_get_page() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let page = page(&store, &owner.id, "First", 100);

        let fetched = store.get_page(&page.id).expect("page should exist");
        assert_eq!(fetched.title, "First");
    }

    #[test]
    fn test_upsert_overwrites_page() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let mut page = page(&store, &owner.id, "First", 100);

        page.title = "Renamed".to_string();
        store.upsert_page(page.clone());

        assert_eq!(store.get_page(&page.id).unwrap().title, "Renamed");
    }

    #[test]
    fn test_delete_page_cascades_engagement() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let fan = user(&store, "bob");
        let page = page(&store, &owner.id, "First", 100);

        store.add_like(&page.id, &fan.id);
        store.add_comment(&page.id, &fan.id, "nice".to_string());

        assert!(store.delete_page(&page.id).is_some());
        assert_eq!(store.like_count(&page.id), 0);
        assert_eq!(store.comment_count(&page.id), 0);
        assert!(store.get_page(&page.id).is_none());
    }

    #[test]
    fn test_record_click_increments() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let page = page(&store, &owner.id, "First", 100);

        store.record_click(&page.id);
        let updated = store.record_click(&page.id).unwrap();
        assert_eq!(updated.clicks, 2);
    }

    #[test]
    fn test_pages_of_owner_visibility() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let mut hidden = page(&store, &owner.id, "Hidden", 200);
        hidden.is_public = false;
        store.upsert_page(hidden);
        page(&store, &owner.id, "Visible", 100);

        assert_eq!(store.pages_of_owner(&owner.id, true).len(), 2);
        let public_only = store.pages_of_owner(&owner.id, false);
        assert_eq!(public_only.len(), 1);
        assert_eq!(public_only[0].page.title, "Visible");
    }

    // ============================================================
    // LIKES
    // ============================================================

    #[test]
    fn test_like_is_idempotent() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let fan = user(&store, "bob");
        let page = page(&store, &owner.id, "First", 100);

        assert!(store.add_like(&page.id, &fan.id));
        assert!(!store.add_like(&page.id, &fan.id), "duplicate like");
        assert_eq!(store.like_count(&page.id), 1);
    }

    #[test]
    fn test_like_missing_page_rejected() {
        let store = MemoryStore::new();
        let fan = user(&store, "bob");
        assert!(!store.add_like(&PageId("ghost".to_string()), &fan.id));
    }

    #[test]
    fn test_unlike_removes_edge() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let fan = user(&store, "bob");
        let page = page(&store, &owner.id, "First", 100);

        store.add_like(&page.id, &fan.id);
        assert!(store.remove_like(&page.id, &fan.id));
        assert!(!store.remove_like(&page.id, &fan.id));
        assert_eq!(store.like_count(&page.id), 0);
    }

    #[test]
    fn test_pages_liked_by_user() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let fan = user(&store, "bob");
        let first = page(&store, &owner.id, "First", 100);
        let second = page(&store, &owner.id, "Second", 200);
        page(&store, &owner.id, "Third", 300);

        store.add_like(&first.id, &fan.id);
        store.add_like(&second.id, &fan.id);

        let liked = store.pages_liked_by(&fan.id);
        assert_eq!(liked.len(), 2);
        // Newest first
        assert_eq!(liked[0].page.title, "Second");
    }

    // ============================================================
    // COMMENTS
    // ============================================================

    #[test]
    fn test_comment_lifecycle() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let fan = user(&store, "bob");
        let page = page(&store, &owner.id, "First", 100);

        let comment = store
            .add_comment(&page.id, &fan.id, "great release".to_string())
            .expect("comment should be stored");
        assert_eq!(store.comment_count(&page.id), 1);

        let found = store.find_comment(&page.id, &comment.id).unwrap();
        assert_eq!(found.message, "great release");

        assert!(store.delete_comment(&page.id, &comment.id));
        assert!(!store.delete_comment(&page.id, &comment.id));
        assert_eq!(store.comment_count(&page.id), 0);
    }

    #[test]
    fn test_comment_missing_page_rejected() {
        let store = MemoryStore::new();
        let fan = user(&store, "bob");
        assert!(
            store
                .add_comment(&PageId("ghost".to_string()), &fan.id, "hi".to_string())
                .is_none()
        );
    }

    #[test]
    fn test_pages_commented_by_user() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let fan = user(&store, "bob");
        let first = page(&store, &owner.id, "First", 100);
        page(&store, &owner.id, "Second", 200);

        store.add_comment(&first.id, &fan.id, "hello".to_string());

        let commented = store.pages_commented_by(&fan.id);
        assert_eq!(commented.len(), 1);
        assert_eq!(commented[0].page.title, "First");
    }

    // ============================================================
    // NEWSLETTER
    // ============================================================

    #[test]
    fn test_newsletter_subscribe_unsubscribe() {
        let store = MemoryStore::new();

        assert!(store.subscribe("fan@example.com".to_string()));
        assert!(!store.subscribe("fan@example.com".to_string()));
        assert_eq!(store.subscriber_count(), 1);

        assert!(store.unsubscribe("fan@example.com"));
        assert!(!store.unsubscribe("fan@example.com"));
        assert_eq!(store.subscriber_count(), 0);
    }

    // ============================================================
    // CANDIDATE FETCH
    // ============================================================

    #[tokio::test]
    async fn test_candidates_exclude_private_pages() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        page(&store, &owner.id, "Public", 100);
        let mut hidden = page(&store, &owner.id, "Secret", 200);
        hidden.is_public = false;
        store.upsert_page(hidden);

        let set = store.find_public_candidates(None, BOTH).await.unwrap();
        assert_eq!(set.pages.len(), 1);
        assert_eq!(set.pages[0].page.title, "Public");
    }

    #[tokio::test]
    async fn test_candidates_match_case_insensitive() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        page(&store, &owner.id, "Midnight Drive", 100);

        let set = store
            .find_public_candidates(Some("MIDNIGHT"), BOTH)
            .await
            .unwrap();
        assert_eq!(set.pages.len(), 1);
    }

    #[tokio::test]
    async fn test_candidates_match_any_field() {
        let store = MemoryStore::new();
        let owner = user(&store, "Starlight Collective");
        let mut with_album = page(&store, &owner.id, "First", 100);
        with_album.album = Some("Neon Skies".to_string());
        store.upsert_page(with_album);

        // Album match
        let set = store
            .find_public_candidates(Some("neon"), BOTH)
            .await
            .unwrap();
        assert_eq!(set.pages.len(), 1);

        // Owner display-name match
        let set = store
            .find_public_candidates(Some("starlight"), BOTH)
            .await
            .unwrap();
        assert_eq!(set.pages.len(), 1);

        // No match anywhere
        let set = store
            .find_public_candidates(Some("zzz"), BOTH)
            .await
            .unwrap();
        assert!(set.pages.is_empty());
    }

    #[tokio::test]
    async fn test_candidates_native_order_is_recency() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        page(&store, &owner.id, "Old", 100);
        page(&store, &owner.id, "New", 300);
        page(&store, &owner.id, "Mid", 200);

        let set = store.find_public_candidates(None, BOTH).await.unwrap();
        let titles: Vec<&str> = set.pages.iter().map(|c| c.page.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Mid", "Old"]);
    }

    #[tokio::test]
    async fn test_candidates_hydrate_counts() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let fan = user(&store, "bob");
        let page = page(&store, &owner.id, "First", 100);

        store.add_like(&page.id, &fan.id);
        store.add_comment(&page.id, &fan.id, "one".to_string());
        store.add_comment(&page.id, &fan.id, "two".to_string());

        let set = store.find_public_candidates(None, BOTH).await.unwrap();
        assert_eq!(set.pages[0].like_count, 1);
        assert_eq!(set.pages[0].comment_count, 2);
        assert_eq!(set.pages[0].owner.name, "alice");
    }

    #[tokio::test]
    async fn test_users_require_query_text() {
        let store = MemoryStore::new();
        user(&store, "alice");
        user(&store, "bob");

        let set = store.find_public_candidates(None, BOTH).await.unwrap();
        assert!(set.users.is_empty(), "no enumeration without text");

        let set = store
            .find_public_candidates(Some("ali"), BOTH)
            .await
            .unwrap();
        assert_eq!(set.users.len(), 1);
        assert_eq!(set.users[0].name, "alice");
    }

    #[tokio::test]
    async fn test_find_liked_ids_is_scoped_to_candidates() {
        let store = MemoryStore::new();
        let owner = user(&store, "alice");
        let fan = user(&store, "bob");
        let first = page(&store, &owner.id, "First", 100);
        let second = page(&store, &owner.id, "Second", 200);

        store.add_like(&first.id, &fan.id);
        store.add_like(&second.id, &fan.id);

        // Only ids passed in may come back, even though both are liked.
        let liked = store
            .find_liked_ids(&fan.id, std::slice::from_ref(&first.id))
            .await
            .unwrap();
        assert!(liked.contains(&first.id));
        assert!(!liked.contains(&second.id));
    }
}
