use serde::{Deserialize, Serialize};

/// Unique identifier for a shareable link page.
///
/// Wrapper around a UUID string; the string form doubles as the URL path
/// segment clients use to reference the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub String);

impl PageId {
    /// Generates a new random UUID v4-based PageId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Unique identifier for a registered user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl UserId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Unique identifier for a comment on a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// External music-service links attached to a page. Every field is optional;
/// a page typically carries two or three of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceLinks {
    pub amazonmusic: Option<String>,
    pub applemusic: Option<String>,
    pub soundcloud: Option<String>,
    pub spotify: Option<String>,
    pub youtube: Option<String>,
    pub youtubemusic: Option<String>,
}

/// A shareable "tree" page for a single release.
///
/// Aggregate engagement counts (likes, comments) are not stored here; they
/// are derived by the store when a page is hydrated into a `PageCandidate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreePage {
    pub id: PageId,
    pub owner: UserId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub description: String,
    /// Reference to a cover image held by external image storage.
    pub cover: Option<String>,
    /// Private pages are visible to their owner only and never enter discovery.
    pub is_public: bool,
    /// Release timestamp of the work the page links to (epoch ms).
    pub release_date: u64,
    /// Timestamp (ms) when the page was created.
    pub created_at: u64,
    /// Number of times the page was opened.
    pub clicks: u64,
    pub urls: ServiceLinks,
    pub yt_id: Option<String>,
}

/// Public profile of a registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    /// Reference to an avatar held by external image storage.
    pub image: Option<String>,
}

/// A comment left on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub page_id: PageId,
    pub author: UserId,
    pub message: String,
    pub created_at: u64,
}

/// A page hydrated with its aggregate engagement counts and owner summary,
/// as produced by a candidate fetch. This is the unit the ranking engine
/// scores and sorts.
#[derive(Debug, Clone)]
pub struct PageCandidate {
    pub page: TreePage,
    pub like_count: u64,
    pub comment_count: u64,
    pub owner: UserProfile,
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
