use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    api::state::AppState,
    domain::{AdminRole, AdminUser},
    error::AppError,
};

#[derive(Clone)]
pub struct CurrentAdmin {
    pub user: AdminUser,
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

async fn authenticate(state: &AppState, token: Option<String>) -> Result<AdminUser, AppError> {
    let token = token.ok_or(AppError::Unauthorized)?;
    state.service_context.account_service.authenticate(&token).await
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request);
    let user = authenticate(&state, token).await?;

    // Insert current admin into request extensions
    request.extensions_mut().insert(CurrentAdmin { user });

    Ok(next.run(request).await)
}

pub async fn require_super_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request);
    let user = authenticate(&state, token).await?;

    if user.role != AdminRole::SuperAdmin {
        tracing::warn!(admin_id = %user.id, "Super-admin route refused");
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentAdmin { user });

    Ok(next.run(request).await)
}
