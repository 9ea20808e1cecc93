use serde::{Deserialize, Serialize};

use crate::discovery::types::{OwnerSummary, PageEntry};
use crate::store::types::{CommentId, PageId, ServiceLinks};

/// Payload for creating a page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub release_date: Option<u64>,
    #[serde(default)]
    pub urls: ServiceLinks,
    #[serde(default)]
    pub yt_id: Option<String>,
}

fn default_public() -> bool {
    true
}

/// Partial update of a page; absent fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdate {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub description: Option<String>,
    pub cover: Option<String>,
    pub is_public: Option<bool>,
    pub release_date: Option<u64>,
    pub urls: Option<ServiceLinks>,
    pub yt_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentInput {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEntry {
    pub id: CommentId,
    pub message: String,
    pub created_at: u64,
    pub owner: OwnerSummary,
}

#[derive(Debug, Serialize)]
pub struct CreatePageResponse {
    pub id: PageId,
}

/// Standard acknowledgment body, `{"message": ...}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// List response keyed the way the frontend expects.
#[derive(Debug, Serialize)]
pub struct PageList {
    pub treelist: Vec<PageEntry>,
}

/// Single-page response.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub tree: PageEntry,
}
