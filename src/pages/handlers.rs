use std::sync::Arc;

use axum::{Extension, Json, extract::Path, http::StatusCode};

use crate::discovery::types::{OwnerSummary, PageEntry};
use crate::error::ApiError;
use crate::store::adapter::EngagementStore;
use crate::store::memory::MemoryStore;
use crate::store::types::{
    CommentId, PageCandidate, PageId, TreePage, UserId, UserProfile, now_ms,
};
use crate::viewer::ViewerContext;

use super::types::{
    CommentEntry, CommentInput, CreatePageResponse, MessageResponse, PageInput, PageList,
    PageResponse, PageUpdate,
};

fn require_user(viewer: &ViewerContext) -> Result<&UserId, ApiError> {
    viewer.user().ok_or(ApiError::Unauthorized)
}

/// Builds the response shape for a batch of hydrated pages, resolving the
/// viewer's like flags with one batched lookup.
async fn assemble_entries(
    store: &MemoryStore,
    candidates: Vec<PageCandidate>,
    viewer: &ViewerContext,
) -> Result<Vec<PageEntry>, ApiError> {
    let liked_ids = match viewer.user() {
        Some(user) => {
            let ids: Vec<PageId> = candidates
                .iter()
                .map(|candidate| candidate.page.id.clone())
                .collect();
            Some(store.find_liked_ids(user, &ids).await?)
        }
        None => None,
    };

    Ok(candidates
        .iter()
        .map(|candidate| {
            let liked = liked_ids
                .as_ref()
                .map(|ids| ids.contains(&candidate.page.id));
            PageEntry::from_candidate(candidate, liked, viewer.user(), 0.0)
        })
        .collect())
}

// --- Page lifecycle ---

/// GET /api/tree/:id - fetch one page and count the visit.
pub async fn handle_get_page(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
) -> Result<Json<PageResponse>, ApiError> {
    let id = PageId(id);
    let page = store.record_click(&id).ok_or(ApiError::NotFound)?;
    let candidate = store.hydrate(&page).ok_or(ApiError::NotFound)?;

    let liked = match viewer.user() {
        Some(user) => {
            let liked_ids = store
                .find_liked_ids(user, std::slice::from_ref(&id))
                .await?;
            Some(liked_ids.contains(&id))
        }
        None => None,
    };

    Ok(Json(PageResponse {
        tree: PageEntry::from_candidate(&candidate, liked, viewer.user(), 0.0),
    }))
}

/// GET /api/tree - every page of the authenticated owner, private included.
pub async fn handle_list_own(
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
) -> Result<Json<PageList>, ApiError> {
    let user = require_user(&viewer)?;
    let candidates = store.pages_of_owner(user, true);
    let treelist = assemble_entries(&store, candidates, &viewer).await?;
    Ok(Json(PageList { treelist }))
}

/// POST /api/tree - create a page owned by the viewer.
pub async fn handle_create_page(
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
    Json(input): Json<PageInput>,
) -> Result<(StatusCode, Json<CreatePageResponse>), ApiError> {
    let user = require_user(&viewer)?;
    if input.title.trim().is_empty() {
        return Err(ApiError::InvalidInput("Title must not be empty.".into()));
    }

    let now = now_ms();
    let page = TreePage {
        id: PageId::new(),
        owner: user.clone(),
        title: input.title,
        artist: input.artist,
        album: input.album,
        description: input.description,
        cover: input.cover,
        is_public: input.is_public,
        release_date: input.release_date.unwrap_or(now),
        created_at: now,
        clicks: 0,
        urls: input.urls,
        yt_id: input.yt_id,
    };
    let id = page.id.clone();
    store.upsert_page(page);
    tracing::debug!("Created page {}", id.0);

    Ok((StatusCode::CREATED, Json(CreatePageResponse { id })))
}

/// PUT /api/tree/:id - owner-only partial update.
pub async fn handle_update_page(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
    Json(update): Json<PageUpdate>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_user(&viewer)?;
    let mut page = store.get_page(&PageId(id)).ok_or(ApiError::NotFound)?;
    if &page.owner != user {
        return Err(ApiError::Forbidden);
    }

    if let Some(title) = update.title {
        page.title = title;
    }
    if let Some(artist) = update.artist {
        page.artist = artist;
    }
    if let Some(album) = update.album {
        page.album = Some(album);
    }
    if let Some(description) = update.description {
        page.description = description;
    }
    if let Some(cover) = update.cover {
        page.cover = Some(cover);
    }
    if let Some(is_public) = update.is_public {
        page.is_public = is_public;
    }
    if let Some(release_date) = update.release_date {
        page.release_date = release_date;
    }
    if let Some(urls) = update.urls {
        page.urls = urls;
    }
    if let Some(yt_id) = update.yt_id {
        page.yt_id = Some(yt_id);
    }
    store.upsert_page(page);

    Ok(Json(MessageResponse::new("Page updated.")))
}

/// DELETE /api/tree/:id - owner-only removal, cascading engagement.
pub async fn handle_delete_page(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_user(&viewer)?;
    let id = PageId(id);
    let page = store.get_page(&id).ok_or(ApiError::NotFound)?;
    if &page.owner != user {
        return Err(ApiError::Forbidden);
    }
    store.delete_page(&id);

    Ok(Json(MessageResponse::new("Page deleted.")))
}

// --- Likes ---

/// PUT /api/tree/:id/likes
pub async fn handle_like(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_user(&viewer)?;
    let id = PageId(id);
    if store.get_page(&id).is_none() {
        return Err(ApiError::NotFound);
    }
    // Liking twice is a no-op, not an error.
    store.add_like(&id, user);
    Ok(Json(MessageResponse::new("Like added.")))
}

/// DELETE /api/tree/:id/likes
pub async fn handle_unlike(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_user(&viewer)?;
    store.remove_like(&PageId(id), user);
    Ok(Json(MessageResponse::new("Like removed.")))
}

/// GET /api/like/tree - pages the viewer liked.
pub async fn handle_liked_pages(
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
) -> Result<Json<PageList>, ApiError> {
    let user = require_user(&viewer)?;
    let candidates = store.pages_liked_by(user);
    let treelist = assemble_entries(&store, candidates, &viewer).await?;
    Ok(Json(PageList { treelist }))
}

// --- Comments ---

/// GET /api/tree/:id/comments
pub async fn handle_list_comments(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MemoryStore>>,
) -> Result<Json<Vec<CommentEntry>>, ApiError> {
    let id = PageId(id);
    if store.get_page(&id).is_none() {
        return Err(ApiError::NotFound);
    }

    let comments = store
        .comments_for(&id)
        .into_iter()
        .filter_map(|comment| {
            // Comments from deleted accounts are skipped rather than served
            // without an author.
            let owner = store.get_user(&comment.author)?;
            Some(CommentEntry {
                id: comment.id,
                message: comment.message,
                created_at: comment.created_at,
                owner: OwnerSummary {
                    id: owner.id,
                    name: owner.name,
                    profile_image: owner.image,
                },
            })
        })
        .collect();

    Ok(Json(comments))
}

/// PUT /api/tree/:id/comments
pub async fn handle_add_comment(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
    Json(input): Json<CommentInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_user(&viewer)?;
    if input.message.trim().is_empty() {
        return Err(ApiError::InvalidInput("Message must not be empty.".into()));
    }
    store
        .add_comment(&PageId(id), user, input.message)
        .ok_or(ApiError::NotFound)?;
    Ok(Json(MessageResponse::new("Comment added.")))
}

/// DELETE /api/tree/:id/comments/:comment_id - author-only.
pub async fn handle_delete_comment(
    Path((id, comment_id)): Path<(String, String)>,
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_user(&viewer)?;
    let id = PageId(id);
    let comment_id = CommentId(comment_id);
    let comment = store
        .find_comment(&id, &comment_id)
        .ok_or(ApiError::NotFound)?;
    if &comment.author != user {
        return Err(ApiError::Forbidden);
    }
    store.delete_comment(&id, &comment_id);
    Ok(Json(MessageResponse::new("Comment deleted.")))
}

/// GET /api/comment/tree - pages the viewer commented on.
pub async fn handle_commented_pages(
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
) -> Result<Json<PageList>, ApiError> {
    let user = require_user(&viewer)?;
    let candidates = store.pages_commented_by(user);
    let treelist = assemble_entries(&store, candidates, &viewer).await?;
    Ok(Json(PageList { treelist }))
}

// --- User-facing page listings ---

/// GET /api/user/:id - a user's public profile.
pub async fn handle_get_user(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MemoryStore>>,
) -> Result<Json<UserProfile>, ApiError> {
    store
        .get_user(&UserId(id))
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// GET /api/user/:id/tree - a user's public pages, newest first.
pub async fn handle_user_pages(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
) -> Result<Json<PageList>, ApiError> {
    let candidates = store.pages_of_owner(&UserId(id), false);
    let treelist = assemble_entries(&store, candidates, &viewer).await?;
    Ok(Json(PageList { treelist }))
}
