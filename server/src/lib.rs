pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod raw_sql;
pub mod repo;
pub mod schema;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::db::DbPool;

pub struct AppContext {
    pub pool: DbPool,
    pub config: Config,
}

/// Application state shared across all handlers
pub type AppState = Arc<AppContext>;

/// The complete application: API routes, short-link redirects and Swagger UI.
pub fn app(state: AppState) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let router = Router::new()
        .nest("/api", api::router())
        .merge(api::short_links::router())
        .merge(swagger_ui)
        .with_state(state);

    telemetry::with_request_tracing(router)
}
