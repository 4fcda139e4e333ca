use axum::{extract::State, http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

use crate::api::state::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Noticeboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Notices, events and tournament registration for the club",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "notices": "/api/notices",
            "members": "/api/members",
            "auth": "/api/auth/login"
        }
    }))
}

/// Reports 503 when the database does not answer.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match sqlx::query("SELECT 1").execute(&state.service_context.db_pool).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!("Health check database ping failed: {}", e);
            "unavailable"
        }
    };
    let status = if database == "ok" { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (status, Json(json!({
        "status": if status == StatusCode::OK { "healthy" } else { "degraded" },
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
