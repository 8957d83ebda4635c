use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::eligibility::PurchaseEligibility;
use super::models::{CreateWardrobeItemRequest, WardrobeItem};
use super::service::WardrobeService;
use crate::shared::{AppError, AppState};

fn wardrobe_service(state: &AppState) -> WardrobeService {
    WardrobeService::new(
        Arc::clone(&state.wardrobe_repository),
        Arc::clone(&state.user_repository),
    )
}

/// HTTP handler for listing all wardrobe items
///
/// GET /api/wardrobe
#[instrument(name = "list_wardrobe_items", skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<WardrobeItem>>, AppError> {
    let items = wardrobe_service(&state).list_items().await?;
    Ok(Json(items))
}

/// HTTP handler for fetching one wardrobe item
///
/// GET /api/wardrobe/:item_id
#[instrument(name = "get_wardrobe_item", skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<WardrobeItem>, AppError> {
    let item = wardrobe_service(&state).get_item(item_id).await?;
    Ok(Json(item))
}

/// HTTP handler for creating a wardrobe item
///
/// POST /api/wardrobe
#[instrument(name = "create_wardrobe_item", skip(state, request))]
pub async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateWardrobeItemRequest>,
) -> Result<(StatusCode, Json<WardrobeItem>), AppError> {
    let item = wardrobe_service(&state).create_item(request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// HTTP handler for the purchase-eligibility check
///
/// GET /api/wardrobe/eligibility/:user_id/:item_id
#[instrument(name = "check_purchase_eligibility", skip(state))]
pub async fn check_eligibility(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PurchaseEligibility>, AppError> {
    let verdict = wardrobe_service(&state)
        .check_purchase_eligibility(user_id, item_id)
        .await?;
    Ok(Json(verdict))
}
