use std::cmp::Ordering;
use std::collections::HashSet;

use crate::store::adapter::{CategoryFilter, EngagementStore, StoreError};
use crate::store::types::{PageCandidate, PageId};
use crate::viewer::ViewerContext;

use super::types::{
    Category, PageEntry, RELEVANCE_WEIGHTS, RESULT_CAP, RankedEntry, RankedResult, RankingRequest,
    RelevanceWeights, SortDirection, SortKey, USER_RESULT_CAP, UserEntry,
};

/// Produces the ordered, personalized result for one discovery request.
///
/// Pure over its inputs and the store snapshot: holds no state, takes no
/// locks, and issues at most two store fetches - one candidate fetch for all
/// requested categories, then (only with a viewer identity) one batched
/// like-set fetch over the surviving candidate ids. Store failures propagate;
/// everything else is normalized to a safe default instead of erroring.
pub async fn rank<S: EngagementStore>(
    store: &S,
    request: &RankingRequest,
    viewer: &ViewerContext,
) -> Result<RankedResult, StoreError> {
    let filter = resolve_categories(request);
    if !filter.content && !filter.users {
        // e.g. category=users with no query text: nothing to search
        return Ok(RankedResult {
            entries: Vec::new(),
        });
    }

    let text = (!request.query.is_empty()).then_some(request.query.as_str());
    let mut candidates = store.find_public_candidates(text, filter).await?;

    sort_pages(&mut candidates.pages, request.sort, request.direction);
    candidates.pages.truncate(RESULT_CAP);
    candidates.users.truncate(USER_RESULT_CAP);

    let liked_ids = match viewer.user() {
        Some(user) if !candidates.pages.is_empty() => {
            let ids: Vec<PageId> = candidates
                .pages
                .iter()
                .map(|candidate| candidate.page.id.clone())
                .collect();
            Some(store.find_liked_ids(user, &ids).await?)
        }
        Some(_) => Some(HashSet::new()),
        None => None,
    };

    let mut entries: Vec<RankedEntry> =
        Vec::with_capacity(candidates.users.len() + candidates.pages.len());
    for profile in candidates.users {
        entries.push(RankedEntry::User(UserEntry {
            id: profile.id,
            name: profile.name,
            profile_image: profile.image,
            score: 0.0,
        }));
    }
    for candidate in &candidates.pages {
        let score = match request.sort {
            SortKey::Relevance => relevance_score(candidate, &RELEVANCE_WEIGHTS),
            _ => 0.0,
        };
        let liked = liked_ids
            .as_ref()
            .map(|ids| ids.contains(&candidate.page.id));
        entries.push(RankedEntry::Content(PageEntry::from_candidate(
            candidate,
            liked,
            viewer.user(),
            score,
        )));
    }
    entries.truncate(RESULT_CAP);

    tracing::debug!(
        "Ranked {} entries (sort {:?}, query {:?})",
        entries.len(),
        request.sort,
        request.query
    );
    Ok(RankedResult { entries })
}

/// Weighted linear combination of the engagement counters. A sort key, not a
/// probability.
pub fn relevance_score(candidate: &PageCandidate, weights: &RelevanceWeights) -> f64 {
    candidate.like_count as f64 * weights.likes
        + candidate.comment_count as f64 * weights.comments
        + candidate.page.clicks as f64 * weights.clicks
}

/// Empty category set means both. A users search additionally requires query
/// text; an empty-text user search would otherwise enumerate every account.
fn resolve_categories(request: &RankingRequest) -> CategoryFilter {
    let all = request.categories.is_empty();
    CategoryFilter {
        content: all || request.categories.contains(&Category::Content),
        users: (all || request.categories.contains(&Category::Users))
            && !request.query.is_empty(),
    }
}

/// Stable sort by the requested key. Ties break by creation recency
/// (descending, regardless of direction) so pagination stays deterministic
/// across calls with identical primary keys. `None` keeps the store's
/// native order.
fn sort_pages(pages: &mut [PageCandidate], sort: SortKey, direction: SortDirection) {
    if sort == SortKey::None {
        return;
    }
    pages.sort_by(|a, b| {
        let primary = match sort {
            SortKey::Relevance => relevance_score(a, &RELEVANCE_WEIGHTS)
                .total_cmp(&relevance_score(b, &RELEVANCE_WEIGHTS)),
            SortKey::Likes => a.like_count.cmp(&b.like_count),
            SortKey::Comments => a.comment_count.cmp(&b.comment_count),
            SortKey::Clicks => a.page.clicks.cmp(&b.page.clicks),
            SortKey::Recency => a.page.release_date.cmp(&b.page.release_date),
            SortKey::None => Ordering::Equal,
        };
        let primary = match direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| b.page.created_at.cmp(&a.page.created_at))
    });
}
