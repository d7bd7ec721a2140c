use crate::api::views::{user_responses, UserResponse};
use crate::api::{request_url, ErrorResponse, Page, PageParams};
use crate::auth::MaybeAuthUser;
use crate::error::ApiError;
use crate::repo::users;
use crate::AppState;
use axum::{
    extract::{OriginalUri, Query, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "One page of users", body = Page<UserResponse>),
        (status = 400, description = "Invalid page parameters", body = ErrorResponse)
    )
)]
pub async fn list_users(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    uri: OriginalUri,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    let page = params.resolve(&state.config)?;
    let url = request_url(&state.config, &uri)?;
    let mut conn = state.pool.get()?;

    let (rows, total) = users::list_users(&mut conn, &page)?;
    let results = user_responses(&mut conn, viewer.id(), &rows, state.config.public_base())?;

    Ok(Json(Page::new(results, total, &page, &url)))
}
