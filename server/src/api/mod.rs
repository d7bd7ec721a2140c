pub mod auth;
pub mod extract;
pub mod images;
pub mod ingredients;
pub mod recipes;
pub mod short_links;
pub mod tags;
pub mod users;
pub mod views;

use std::collections::BTreeMap;

use axum::extract::OriginalUri;
use axum::Router;
use larder_core::{PageRequest, ValidationError, ValidationErrors};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Ingredient, Tag};
use crate::AppState;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Messages per rejected request field, present for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }
}

/// One page of a paginated list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, page: &PageRequest, request_url: &Url) -> Self {
        let (next, previous) = page.links(request_url, count);
        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

/// Page parameters resolved against the configured defaults.
pub fn page_request(
    config: &Config,
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<PageRequest, ApiError> {
    Ok(PageRequest::new(
        page,
        limit,
        config.page_size,
        config.max_page_size,
    )?)
}

/// `?page=&limit=` as sent by the client; parsed by [`PageParams::resolve`]
/// so malformed numbers become field-level validation errors.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PageParams {
    /// 1-based page number
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Page size
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

impl PageParams {
    pub fn resolve(&self, config: &Config) -> Result<PageRequest, ApiError> {
        let mut errors = ValidationErrors::new();
        let page = parse_number("page", self.page.as_deref(), &mut errors);
        let limit = parse_number("limit", self.limit.as_deref(), &mut errors);
        errors.into_result()?;
        page_request(config, page, limit)
    }
}

fn parse_number(
    field: &'static str,
    value: Option<&str>,
    errors: &mut ValidationErrors,
) -> Option<i64> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match value.parse() {
        Ok(number) => Some(number),
        Err(_) => {
            errors.push(ValidationError::InvalidParameter {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}

/// Absolute URL of the current request, rooted at the public base URL.
/// A path prefix on the base URL is kept.
pub fn request_url(config: &Config, uri: &OriginalUri) -> Result<Url, ApiError> {
    let path_and_query = uri
        .0
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Url::parse(&format!("{}{}", config.public_base(), path_and_query))
        .map_err(|e| ApiError::Internal(format!("Failed to build request URL: {e}")))
}

/// Every `/api` route.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth/token", auth::router())
        .nest("/users", users::router())
        .nest("/tags", tags::router())
        .nest("/ingredients", ingredients::router())
        .nest("/recipes", recipes::router())
        .nest("/images", images::router())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Larder API", description = "Recipes, subscriptions and shopping lists"),
        components(schemas(ErrorResponse, Ingredient, Tag))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Token auth: `Authorization: Token <t>`
    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "token_auth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token <auth_token>",
            ))),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        auth::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        tags::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        images::ApiDoc::openapi(),
        short_links::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_core_paths() {
        let spec = openapi();
        for path in [
            "/api/recipes",
            "/api/recipes/{id}",
            "/api/recipes/download_shopping_cart",
            "/api/users/subscriptions",
            "/api/ingredients",
            "/s/{token}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_page_params_reject_garbage() {
        let config = Config::from_lookup(|key| {
            (key == "DATABASE_URL").then(|| "postgres://localhost/larder".to_string())
        })
        .unwrap();

        let params = PageParams {
            page: Some("2".to_string()),
            limit: Some(" ".to_string()),
        };
        let page = params.resolve(&config).unwrap();
        assert_eq!(page, PageRequest { page: 2, limit: 6 });

        let params = PageParams {
            page: Some("two".to_string()),
            limit: Some("-".to_string()),
        };
        match params.resolve(&config) {
            Err(ApiError::Validation(errors)) => assert_eq!(errors.errors().len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_request_url_keeps_public_prefix() {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/larder".to_string()),
            "LARDER_PUBLIC_URL" => Some("https://cook.example.com/larder/".to_string()),
            _ => None,
        })
        .unwrap();
        let uri = OriginalUri("/api/recipes?tags=lunch&page=2".parse().unwrap());

        let url = request_url(&config, &uri).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cook.example.com/larder/api/recipes?tags=lunch&page=2"
        );

        let page = PageRequest { page: 2, limit: 6 };
        let (next, previous) = page.links(&url, 20);
        assert_eq!(
            next.as_deref(),
            Some("https://cook.example.com/larder/api/recipes?tags=lunch&page=3")
        );
        assert_eq!(
            previous.as_deref(),
            Some("https://cook.example.com/larder/api/recipes?tags=lunch")
        );
    }

    #[test]
    fn test_error_response_omits_empty_fields() {
        let json = serde_json::to_value(ErrorResponse::new("Recipe not found")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Recipe not found"}));
    }
}
