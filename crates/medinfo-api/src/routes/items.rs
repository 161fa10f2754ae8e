use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use medinfo_core::models::item::{Item, ItemType, NewItem};
use medinfo_db::items;

use crate::error::ApiError;
use crate::routes::{required_id, IdParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub pres_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub ai_reasons: String,
    #[serde(default)]
    pub doc_reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocReasonUpdate {
    pub doc_reason: String,
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let pres_id = required_id(params.pres_id.as_deref(), "prescription ID")?;
    Ok(Json(items::list_prescription_items(&state.pool, pres_id).await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let new_item = NewItem {
        name: req.name,
        item_type: req.item_type,
        ai_reasons: req.ai_reasons,
        doc_reason: req.doc_reason,
    };
    let item = items::insert_item(&state.pool, req.pres_id, &new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Item>, ApiError> {
    let id = required_id(params.id.as_deref(), "item ID")?;
    Ok(Json(items::get_item(&state.pool, id).await?))
}

/// The doctor's note is the only item field that changes after intake.
pub async fn update_doc_reason(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
    Json(update): Json<DocReasonUpdate>,
) -> Result<Json<Item>, ApiError> {
    let id = required_id(params.id.as_deref(), "item ID")?;
    Ok(Json(
        items::update_doc_reason(&state.pool, id, &update.doc_reason).await?,
    ))
}
