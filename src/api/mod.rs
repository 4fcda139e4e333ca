pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::service::ServiceContext;
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>) -> Router {
    let app_state = AppState::new(service_context);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // API routes
        .nest("/api", api_routes(app_state.clone()))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/notices", notice_routes(state.clone()))
        .nest("/members", member_routes(state.clone()))
        .nest("/admin/members", admin_member_routes(state))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::me).route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                middleware::auth::require_admin,
            )),
        )
        .route(
            "/register",
            post(handlers::auth::register).route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::auth::require_super_admin,
            )),
        )
}

fn notice_routes(state: AppState) -> Router<AppState> {
    let admin = axum::middleware::from_fn_with_state(state, middleware::auth::require_admin);

    Router::new()
        // Reads and registration are public; writes need an admin token
        .route(
            "/",
            get(handlers::notices::list)
                .merge(post(handlers::notices::create).route_layer(admin.clone())),
        )
        .route(
            "/:id",
            get(handlers::notices::get).merge(
                put(handlers::notices::update)
                    .delete(handlers::notices::delete)
                    .route_layer(admin.clone()),
            ),
        )
        .route("/:id/register", post(handlers::notices::register))
        .route(
            "/:id/registrations",
            get(handlers::notices::registrations).route_layer(admin),
        )
}

fn member_routes(state: AppState) -> Router<AppState> {
    let admin = axum::middleware::from_fn_with_state(state, middleware::auth::require_admin);

    Router::new()
        .route(
            "/",
            get(handlers::members::list_public)
                .merge(post(handlers::members::create).route_layer(admin.clone())),
        )
        .route(
            "/:id",
            get(handlers::members::get_public).merge(
                put(handlers::members::update)
                    .delete(handlers::members::delete)
                    .route_layer(admin),
            ),
        )
}

fn admin_member_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::members::list_all))
        .route("/:id", get(handlers::members::get))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}
