use axum::{
    extract::{State, Extension},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    api::{extract::JsonBody, middleware::auth::CurrentAdmin, response::ApiResponse, state::AppState},
    error::Result,
    validation::{validate, AdminRegistrationPayload, LoginPayload},
};

pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> Result<Json<ApiResponse<Value>>> {
    let payload = validate(payload)?;
    let (token, user) = state.service_context.account_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(ApiResponse::with_message(
        "Login successful",
        json!({ "token": token, "user": user }),
    ))
}

pub async fn me(Extension(admin): Extension<CurrentAdmin>) -> Json<ApiResponse<Value>> {
    ApiResponse::data(json!({ "user": admin.user }))
}

pub async fn register(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    JsonBody(payload): JsonBody<AdminRegistrationPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>)> {
    let payload = validate(payload)?;
    let role = payload.role();
    let user = state.service_context.account_service
        .register(payload.username, payload.email, &payload.password, role)
        .await?;

    tracing::info!(created_by = %admin.user.id, admin_id = %user.id, "Admin registered");

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Admin user created successfully", json!({ "user": user })),
    ))
}
