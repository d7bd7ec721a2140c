use crate::api::views::SubscriptionResponse;
use crate::api::{request_url, ErrorResponse, Page, PageParams};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repo::{follows, recipes};
use crate::AppState;
use axum::{
    extract::{OriginalUri, Query, State},
    Json,
};
use larder_core::query::parse_recipes_limit;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SubscriptionParams {
    /// 1-based page number
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Page size
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
    /// Truncates each embedded recipe list; ignored unless a non-negative integer
    #[param(value_type = Option<usize>)]
    pub recipes_limit: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(SubscriptionParams),
    responses(
        (status = 200, description = "Followed users with their recipes", body = Page<SubscriptionResponse>),
        (status = 400, description = "Invalid page parameters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    uri: OriginalUri,
    Query(params): Query<SubscriptionParams>,
) -> Result<Json<Page<SubscriptionResponse>>, ApiError> {
    let page = PageParams {
        page: params.page,
        limit: params.limit,
    }
    .resolve(&state.config)?;
    let recipes_limit = parse_recipes_limit(params.recipes_limit.as_deref());
    let url = request_url(&state.config, &uri)?;

    let mut conn = state.pool.get()?;
    let (followees, total) = follows::list_followees(&mut conn, user.id, &page)?;
    let ids: Vec<Uuid> = followees.iter().map(|u| u.id).collect();
    let mut by_author = recipes::recipes_by_authors(&mut conn, &ids)?;

    let results = followees
        .iter()
        .map(|followee| {
            let authored = by_author.remove(&followee.id).unwrap_or_default();
            SubscriptionResponse::new(
                followee,
                &authored,
                recipes_limit,
                state.config.public_base(),
            )
        })
        .collect();

    Ok(Json(Page::new(results, total, &page, &url)))
}
