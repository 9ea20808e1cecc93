use std::sync::Arc;

use axum::{Extension, Json, extract::Query};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::memory::MemoryStore;
use crate::viewer::ViewerContext;

use super::engine::rank;
use super::types::{Category, RankedEntry, RankingRequest, SortDirection, SortKey};

/// Raw query parameters of the discovery endpoint. `q`/`search` and
/// `category`/`categories` are accepted as synonyms.
#[derive(Debug, Default, Deserialize)]
pub struct DiscoveryParams {
    pub q: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub categories: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl DiscoveryParams {
    /// Normalizes the raw parameters into a `RankingRequest`. Unknown sort
    /// keys become native order, unknown categories are dropped; nothing
    /// here errors.
    pub fn into_request(self) -> RankingRequest {
        let query = self
            .q
            .or(self.search)
            .unwrap_or_default()
            .trim()
            .to_string();
        let categories = self
            .category
            .or(self.categories)
            .unwrap_or_default()
            .split(',')
            .filter_map(Category::parse)
            .collect();
        RankingRequest {
            query,
            categories,
            sort: SortKey::parse(self.sort.as_deref()),
            direction: SortDirection::parse(self.dir.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub query: String,
    pub count: usize,
    pub entries: Vec<RankedEntry>,
}

/// GET /api/front - the public listing/search endpoint.
pub async fn handle_front(
    Query(params): Query<DiscoveryParams>,
    Extension(store): Extension<Arc<MemoryStore>>,
    viewer: ViewerContext,
) -> Result<Json<DiscoveryResponse>, ApiError> {
    let request = params.into_request();
    let ranked = rank(store.as_ref(), &request, &viewer).await?;

    Ok(Json(DiscoveryResponse {
        query: request.query,
        count: ranked.entries.len(),
        entries: ranked.entries,
    }))
}
