use axum::{
    extract::{Path, State, Extension},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::{extract::JsonBody, middleware::auth::CurrentAdmin, response::ApiResponse, state::AppState},
    domain::Member,
    error::Result,
    validation::{validate, MemberPayload},
};

use super::parse_id;

const INVALID_ID: &str = "Invalid member ID";

/// Public directory entry; contact and medical details stay admin-only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicMemberDto {
    id: Uuid,
    name: String,
    belt: Option<String>,
    joined_at: DateTime<Utc>,
    achievements: Option<String>,
}

impl From<Member> for PublicMemberDto {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            name: member.name,
            belt: member.belt,
            joined_at: member.joined_at,
            achievements: member.achievements,
        }
    }
}

pub async fn list_public(State(state): State<AppState>) -> Result<Json<ApiResponse<Value>>> {
    let members: Vec<PublicMemberDto> = state.service_context.member_service
        .list(true)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::data(json!({ "members": members })))
}

pub async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>> {
    let id = parse_id(&id, INVALID_ID)?;
    let member = PublicMemberDto::from(state.service_context.member_service.get_public(id).await?);

    Ok(ApiResponse::data(json!({ "member": member })))
}

pub async fn list_all(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
) -> Result<Json<ApiResponse<Value>>> {
    let members = state.service_context.member_service.list(false).await?;

    Ok(ApiResponse::data(json!({ "members": members })))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>> {
    let id = parse_id(&id, INVALID_ID)?;
    let member = state.service_context.member_service.get(id).await?;

    Ok(ApiResponse::data(json!({ "member": member })))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    JsonBody(payload): JsonBody<MemberPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>)> {
    let draft = validate(payload)?.into_draft()?;
    let member = state.service_context.member_service.create(draft).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Member created successfully", json!({ "member": member })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<MemberPayload>,
) -> Result<Json<ApiResponse<Value>>> {
    let id = parse_id(&id, INVALID_ID)?;
    let draft = validate(payload)?.into_draft()?;
    let member = state.service_context.member_service.update(id, draft).await?;

    Ok(ApiResponse::with_message("Member updated successfully", json!({ "member": member })))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = parse_id(&id, INVALID_ID)?;
    state.service_context.member_service.delete(id).await?;

    Ok(ApiResponse::message("Member deleted successfully"))
}
