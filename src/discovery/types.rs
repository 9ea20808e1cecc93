use std::collections::HashSet;

use serde::Serialize;

use crate::store::types::{PageCandidate, PageId, ServiceLinks, UserId};

/// Weights of the engagement signals in the relevance score.
///
/// Likes and comments are deliberate engagement and weigh more; raw clicks
/// are the noisiest signal and weigh least. This is a policy constant, not a
/// derived quantity - tune it here without touching the algorithm.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceWeights {
    pub likes: f64,
    pub comments: f64,
    pub clicks: f64,
}

pub const RELEVANCE_WEIGHTS: RelevanceWeights = RelevanceWeights {
    likes: 0.5,
    comments: 0.3,
    clicks: 0.2,
};

/// Hard truncation applied to the assembled result sequence. Not a cursor;
/// deep pagination is a known limitation.
pub const RESULT_CAP: usize = 100;

/// Cap on user matches per request.
pub const USER_RESULT_CAP: usize = 50;

/// Sort key of a discovery request. Anything unrecognized becomes `None`
/// (native order) rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Relevance,
    Likes,
    Comments,
    Clicks,
    Recency,
    #[default]
    None,
}

impl SortKey {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("relevance") => SortKey::Relevance,
            Some("likes") => SortKey::Likes,
            Some("comments") => SortKey::Comments,
            Some("clicks") => SortKey::Clicks,
            Some("recency") | Some("releasedate") => SortKey::Recency,
            _ => SortKey::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

/// Result categories a request may ask for. `tree` and `artist` are accepted
/// as legacy aliases for content; unknown values are ignored upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Content,
    Users,
}

impl Category {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "content" | "tree" | "artist" => Some(Category::Content),
            "users" => Some(Category::Users),
            _ => None,
        }
    }
}

/// A fully parsed discovery request. Immutable; constructed once per call.
#[derive(Debug, Clone)]
pub struct RankingRequest {
    /// Free-text query; empty means "browse".
    pub query: String,
    /// Requested categories; empty means both.
    pub categories: HashSet<Category>,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl RankingRequest {
    /// Browse mode: no text, no category filter, native order.
    pub fn browse() -> Self {
        Self {
            query: String::new(),
            categories: HashSet::new(),
            sort: SortKey::None,
            direction: SortDirection::Desc,
        }
    }
}

/// Like count plus the viewer-specific flag. `liked` stays `null` in JSON
/// when the viewer is anonymous - "unknown" is a different fact than
/// "confirmed not liked" and clients render them differently.
#[derive(Debug, Serialize)]
pub struct LikesSummary {
    pub count: u64,
    pub liked: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct Analytics {
    pub clicks: u64,
    pub likes: LikesSummary,
    pub comments: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: UserId,
    pub name: String,
    pub profile_image: Option<String>,
}

/// What the viewer may do with the page. Owner-only; always false for
/// anonymous viewers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_edit: bool,
    pub can_delete: bool,
}

/// A ranked content entry in its response shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEntry {
    pub id: PageId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub description: String,
    pub cover: Option<String>,
    pub is_public: bool,
    pub release_date: u64,
    pub urls: ServiceLinks,
    pub yt_id: Option<String>,
    pub analytics: Analytics,
    pub owner: OwnerSummary,
    pub permissions: Permissions,
    pub score: f64,
}

impl PageEntry {
    /// Assembles the response shape from a hydrated candidate.
    ///
    /// `liked` must be `None` exactly when the viewer identity is absent.
    pub fn from_candidate(
        candidate: &PageCandidate,
        liked: Option<bool>,
        viewer: Option<&UserId>,
        score: f64,
    ) -> Self {
        let page = &candidate.page;
        let is_owner = viewer == Some(&page.owner);
        Self {
            id: page.id.clone(),
            title: page.title.clone(),
            artist: page.artist.clone(),
            album: page.album.clone(),
            description: page.description.clone(),
            cover: page.cover.clone(),
            is_public: page.is_public,
            release_date: page.release_date,
            urls: page.urls.clone(),
            yt_id: page.yt_id.clone(),
            analytics: Analytics {
                clicks: page.clicks,
                likes: LikesSummary {
                    count: candidate.like_count,
                    liked,
                },
                comments: candidate.comment_count,
            },
            owner: OwnerSummary {
                id: candidate.owner.id.clone(),
                name: candidate.owner.name.clone(),
                profile_image: candidate.owner.image.clone(),
            },
            permissions: Permissions {
                can_edit: is_owner,
                can_delete: is_owner,
            },
            score,
        }
    }
}

/// A ranked user entry. Users carry no engagement counters; their score is
/// always zero.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    pub id: UserId,
    pub name: String,
    pub profile_image: Option<String>,
    pub score: f64,
}

/// One entry of the ranked sequence, tagged with its category.
#[derive(Debug, Serialize)]
#[serde(tag = "category")]
pub enum RankedEntry {
    #[serde(rename = "users")]
    User(UserEntry),
    #[serde(rename = "content")]
    Content(PageEntry),
}

impl RankedEntry {
    pub fn as_content(&self) -> Option<&PageEntry> {
        match self {
            RankedEntry::Content(entry) => Some(entry),
            RankedEntry::User(_) => None,
        }
    }

    pub fn as_user(&self) -> Option<&UserEntry> {
        match self {
            RankedEntry::User(entry) => Some(entry),
            RankedEntry::Content(_) => None,
        }
    }
}

/// Ordered, capped, personalized result of one ranking pass.
#[derive(Debug, Serialize)]
pub struct RankedResult {
    pub entries: Vec<RankedEntry>,
}
