use axum::{
    extract::{Path, Query, State, Extension},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    api::{extract::JsonBody, middleware::auth::CurrentAdmin, response::ApiResponse, state::AppState},
    domain::{NoticeCategory, NoticeFilter},
    error::{AppError, Result},
    service::notice_service::DEFAULT_PAGE_SIZE,
    validation::{validate, NoticePayload, RegistrationPayload},
};

use super::parse_id;

const INVALID_ID: &str = "Invalid notice ID";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    page: Option<String>,
    limit: Option<String>,
    category: Option<String>,
    is_active: Option<String>,
    search: Option<String>,
}

impl ListParams {
    /// Unparseable page numbers fall back to the defaults; only an unknown
    /// category is rejected.
    fn into_query(self) -> Result<(NoticeFilter, i64, i64)> {
        let page = self.page.and_then(|p| p.trim().parse().ok()).unwrap_or(1);
        let limit = self
            .limit
            .and_then(|l| l.trim().parse().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(
                NoticeCategory::from_str(raw)
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {}", raw)))?,
            ),
        };

        // Active notices only unless the caller asks otherwise
        let is_active = match self.is_active {
            Some(raw) => Some(raw == "true"),
            None => Some(true),
        };

        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok((NoticeFilter { category, is_active, search }, page, limit))
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Value>>> {
    let (filter, page, limit) = params.into_query()?;
    let page = state.service_context.notice_service
        .list(&filter, page, limit)
        .await?;

    Ok(ApiResponse::data(json!(page)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>> {
    let id = parse_id(&id, INVALID_ID)?;
    let notice = state.service_context.notice_service.get(id).await?;

    Ok(ApiResponse::data(json!({ "notice": notice })))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    JsonBody(payload): JsonBody<NoticePayload>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>)> {
    let draft = validate(payload)?.into_draft()?;
    let notice = state.service_context.notice_service
        .create(draft, admin.user.id)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Notice created successfully", json!({ "notice": notice })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<NoticePayload>,
) -> Result<Json<ApiResponse<Value>>> {
    let id = parse_id(&id, INVALID_ID)?;
    let draft = validate(payload)?.into_draft()?;
    let notice = state.service_context.notice_service.update(id, draft).await?;

    Ok(ApiResponse::with_message("Notice updated successfully", json!({ "notice": notice })))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = parse_id(&id, INVALID_ID)?;
    state.service_context.notice_service.delete(id).await?;

    Ok(ApiResponse::message("Notice deleted successfully"))
}

pub async fn register(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<RegistrationPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>)> {
    let id = parse_id(&id, INVALID_ID)?;
    let candidate = validate(payload)?.into();
    let registration = state.service_context.registration_service
        .register(id, candidate)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(
            "Registration successful",
            json!({ "registration": registration }),
        ),
    ))
}

pub async fn registrations(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>> {
    let id = parse_id(&id, INVALID_ID)?;
    let registrations = state.service_context.registration_service.list(id).await?;

    Ok(ApiResponse::data(json!({ "registrations": registrations })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(category: Option<&str>, is_active: Option<&str>) -> ListParams {
        ListParams {
            category: category.map(String::from),
            is_active: is_active.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_list_defaults() {
        let (filter, page, limit) = ListParams::default().into_query().unwrap();
        assert_eq!(page, 1);
        assert_eq!(limit, DEFAULT_PAGE_SIZE);
        assert_eq!(filter.category, None);
        assert_eq!(filter.is_active, Some(true));
    }

    #[test]
    fn test_category_all_is_unfiltered() {
        let (filter, _, _) = params(Some("all"), None).into_query().unwrap();
        assert_eq!(filter.category, None);

        let (filter, _, _) = params(Some("tournament"), Some("false")).into_query().unwrap();
        assert_eq!(filter.category, Some(NoticeCategory::Tournament));
        assert_eq!(filter.is_active, Some(false));
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(matches!(
            params(Some("party"), None).into_query(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_garbage_paging_falls_back() {
        let query = ListParams {
            page: Some("abc".into()),
            limit: Some("-".into()),
            ..Default::default()
        };
        let (_, page, limit) = query.into_query().unwrap();
        assert_eq!((page, limit), (1, DEFAULT_PAGE_SIZE));
    }
}
