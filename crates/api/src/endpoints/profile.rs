//! Profile endpoints for the signed-in user.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use lingkod_common::AppResult;
use lingkod_core::{ChangePasswordInput, UpdateProfileInput};

use crate::{
    endpoints::users::UserResponse,
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
};

async fn get_profile(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state.user_service.update_profile(user, input).await?;
    Ok(ApiResponse::ok(updated.into()))
}

async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.user_service.change_password(user, input).await?;
    Ok(crate::response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).patch(update_profile))
        .route("/password", post(change_password))
}
