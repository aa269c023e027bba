use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, ProfileSummaryRow};
use crate::profiles::service::{
    create_profile, delete_profile, get_profile, list_profiles, update_profile,
    CreateProfileRequest, UpdateProfileRequest,
};
use crate::state::AppState;

/// POST /profiles
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileRow>), AppError> {
    let profile = create_profile(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /profiles
pub async fn handle_list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileSummaryRow>>, AppError> {
    Ok(Json(list_profiles(&state.db).await?))
}

/// GET /profiles/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(get_profile(&state.db, id).await?))
}

/// PATCH /profiles/:id
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(update_profile(&state.db, id, request).await?))
}

/// DELETE /profiles/:id
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(delete_profile(&state.db, &state.store, id).await?))
}
