use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repo::recipes;
use crate::AppState;
use axum::{extract::State, http::header, response::IntoResponse};
use larder_core::shopping_list::REPORT_FILENAME;
use larder_core::{aggregate, render_report};

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Summed ingredients of every recipe in the cart", body = String, content_type = "text/plain"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = state.pool.get()?;
    let lines = recipes::cart_lines(&mut conn, user.id)?;
    let report = render_report(&aggregate(lines));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILENAME),
            ),
        ],
        report,
    ))
}
