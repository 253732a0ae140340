//! HTTP surface under `/api/v1`.

pub mod menu;
pub mod paging;
pub mod role;
pub mod types;
pub mod user;

use std::time::Duration;

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use sea_orm::DatabaseConnection;
use tower_http::timeout::TimeoutLayer;

use crate::services::{MenuService, RoleService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub role_service: RoleService,
    pub menu_service: MenuService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, password_hash_cost: u32) -> Self {
        Self {
            user_service: UserService::new(db.clone(), password_hash_cost),
            role_service: RoleService::new(db.clone()),
            menu_service: MenuService::new(db),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/users", get(user::list).post(user::create))
        .route(
            "/api/v1/users/{id}",
            get(user::get).put(user::update).delete(user::delete),
        )
        .route("/api/v1/roles", get(role::list).post(role::create))
        .route(
            "/api/v1/roles/{id}",
            get(role::get).put(role::update).delete(role::delete),
        )
        .route("/api/v1/menus", get(menu::list).post(menu::create))
        .route(
            "/api/v1/menus/{id}",
            get(menu::get).put(menu::update).delete(menu::delete),
        )
        .with_state(state)
}

/// Requests still running after `timeout` are answered with a bare 408.
pub fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router.layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
}

async fn health() -> impl IntoResponse {
    "OK"
}
