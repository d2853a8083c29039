//! JSON body extractor that rejects with the API error body.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use ziply_core::error::AppError;

use crate::error::ApiError;

/// Like [`axum::Json`], but malformed bodies produce a `400` with the
/// standard `{error, message}` shape.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_to_error(rejection).into()),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    AppError::validation(format!("Invalid request body: {}", rejection.body_text()))
}
