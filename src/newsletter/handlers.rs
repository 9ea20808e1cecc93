use std::sync::Arc;

use axum::{Extension, Json, extract::Path};
use serde::Deserialize;

use crate::error::ApiError;
use crate::pages::types::MessageResponse;
use crate::store::memory::MemoryStore;

#[derive(Debug, Deserialize)]
pub struct SubscribeInput {
    pub email: String,
}

/// POST /api/newsletter - subscribe an address. Validation is deliberately
/// minimal; the double-opt-in mail belongs to the delivery service.
pub async fn handle_subscribe(
    Extension(store): Extension<Arc<MemoryStore>>,
    Json(input): Json<SubscribeInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = input.email.trim().to_string();
    if !email.contains('@') {
        return Err(ApiError::InvalidInput("Invalid Email.".into()));
    }
    store.subscribe(email);
    Ok(Json(MessageResponse::new("Successfully subscribed.")))
}

/// DELETE /api/newsletter/:email - unsubscribe an address.
pub async fn handle_unsubscribe(
    Path(email): Path<String>,
    Extension(store): Extension<Arc<MemoryStore>>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !store.unsubscribe(email.trim()) {
        return Err(ApiError::NotFound);
    }
    Ok(Json(MessageResponse::new("Successfully unsubscribed.")))
}
