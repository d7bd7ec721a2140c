use crate::api::views::{recipe_responses, RecipeResponse};
use crate::api::{page_request, request_url, ErrorResponse, Page};
use crate::auth::MaybeAuthUser;
use crate::error::ApiError;
use crate::repo::catalog;
use crate::repo::recipes::{self, RecipeFilter};
use crate::AppState;
use axum::{
    extract::{OriginalUri, Query, State},
    Json,
};
use larder_core::{EdgeScope, RecipeQuery};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(
        ("author" = Option<Uuid>, Query, description = "Only recipes by this author"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slug; repeat to match any of several tags"),
        ("is_favorited" = Option<String>, Query, description = "`1`/`true` for the caller's favorites only"),
        ("is_in_shopping_cart" = Option<String>, Query, description = "`1`/`true` for recipes in the caller's cart only"),
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("limit" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "One page of recipes, newest first", body = Page<RecipeResponse>),
        (status = 400, description = "Invalid filter parameters", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    uri: OriginalUri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Page<RecipeResponse>>, ApiError> {
    let query = RecipeQuery::from_pairs(&pairs)?;
    let page = page_request(&state.config, query.page, query.limit)?;
    let url = request_url(&state.config, &uri)?;
    let viewer_id = viewer.id();

    let mut conn = state.pool.get()?;

    let tag_ids = if query.tags.is_empty() {
        None
    } else {
        Some(catalog::tag_ids_by_slug(&mut conn, &query.tags)?)
    };
    let filter = RecipeFilter {
        author: query.author,
        tag_ids,
        favorited: EdgeScope::resolve(query.is_favorited, viewer_id),
        in_cart: EdgeScope::resolve(query.is_in_shopping_cart, viewer_id),
    };

    let (rows, total) = recipes::list_recipes(&mut conn, &filter, &page)?;
    let results = recipe_responses(&mut conn, viewer_id, rows, state.config.public_base())?;

    Ok(Json(Page::new(results, total, &page, &url)))
}
