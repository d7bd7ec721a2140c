use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Largest accepted body for routes that carry an inline image: the base64
/// form of the image size cap plus room for the other fields.
pub const UPLOAD_BODY_LIMIT: usize = larder_core::image::MAX_FILE_SIZE / 3 * 4 + 1024 * 1024;

/// JSON request body whose rejections answer with an [`ApiError`], so a
/// malformed body gets the same error shape as any other bad input.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}
