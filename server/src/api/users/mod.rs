pub mod avatar;
pub mod create;
pub mod get;
pub mod list;
pub mod set_password;
pub mod subscribe;
pub mod subscriptions;

use crate::api::extract::UPLOAD_BODY_LIMIT;
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints (mounted at /api/users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_users).post(create::create_user))
        .route("/me", get(get::me))
        .route(
            "/me/avatar",
            put(avatar::set_avatar)
                .delete(avatar::delete_avatar)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/set_password", post(set_password::set_password))
        .route("/subscriptions", get(subscriptions::list_subscriptions))
        .route("/{id}", get(get::get_user))
        .route(
            "/{id}/subscribe",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_user,
        list::list_users,
        get::get_user,
        get::me,
        avatar::set_avatar,
        avatar::delete_avatar,
        set_password::set_password,
        subscribe::subscribe,
        subscribe::unsubscribe,
        subscriptions::list_subscriptions,
    ),
    components(schemas(
        create::SignupRequest,
        create::SignupResponse,
        avatar::AvatarRequest,
        avatar::AvatarResponse,
        set_password::SetPasswordRequest,
        crate::api::views::UserResponse,
        crate::api::views::SubscriptionResponse,
        crate::api::views::RecipeShortResponse,
    ))
)]
pub struct ApiDoc;
