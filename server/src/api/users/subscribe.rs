use crate::api::views::SubscriptionResponse;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::User;
use crate::repo::{follows, recipes, users};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use diesel::PgConnection;
use larder_core::query::parse_recipes_limit;
use larder_core::ValidationError;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecipesLimitParams {
    /// Truncates the embedded recipe list; ignored unless a non-negative integer
    #[param(value_type = Option<usize>)]
    pub recipes_limit: Option<String>,
}

fn find_target(conn: &mut PgConnection, id: Uuid) -> Result<User, ApiError> {
    users::find_user(conn, id).map_err(|e| match e {
        diesel::result::Error::NotFound => ApiError::not_found("User"),
        other => other.into(),
    })
}

/// Follow `target_id`, rejecting self-follows and existing subscriptions.
pub fn follow_user(
    conn: &mut PgConnection,
    follower: &User,
    target_id: Uuid,
) -> Result<User, ApiError> {
    let target = find_target(conn, target_id)?;

    if target.id == follower.id {
        return Err(ValidationError::SelfFollow.into());
    }
    if !follows::follow(conn, follower.id, target.id)? {
        return Err(ApiError::Conflict(
            "You are already subscribed to this user".to_string(),
        ));
    }
    Ok(target)
}

pub fn unfollow_user(
    conn: &mut PgConnection,
    follower: &User,
    target_id: Uuid,
) -> Result<(), ApiError> {
    let target = find_target(conn, target_id)?;

    if !follows::unfollow(conn, follower.id, target.id)? {
        return Err(ApiError::BadRequest(
            "You are not subscribed to this user".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User to follow"),
        RecipesLimitParams
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Cannot subscribe to yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Already subscribed", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<RecipesLimitParams>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    let mut conn = state.pool.get()?;
    let target = follow_user(&mut conn, &user, id)?;

    let mut by_author = recipes::recipes_by_authors(&mut conn, &[target.id])?;
    let authored = by_author.remove(&target.id).unwrap_or_default();

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::new(
            &target,
            &authored,
            parse_recipes_limit(params.recipes_limit.as_deref()),
            state.config.public_base(),
        )),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User to unfollow")
    ),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.pool.get()?;
    unfollow_user(&mut conn, &user, id)?;

    Ok(StatusCode::NO_CONTENT)
}
