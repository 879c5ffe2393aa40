//! Extractors that reject with the API's `{ "error": ... }` body instead of
//! axum's plain-text rejections.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Json, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::utils::error::AppError;

/// JSON request body. Malformed or missing bodies become a validation error.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::ValidationError(format!("Invalid JSON body: {}", e.body_text())))?;

        Ok(JsonBody(data))
    }
}

/// Integer event id taken from the `:id` path segment.
///
/// An id that is not an integer cannot name an event, so it is reported the
/// same way as an unknown id.
pub struct EventId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for EventId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::event_not_found())?;

        id.parse::<i64>()
            .map(EventId)
            .map_err(|_| AppError::event_not_found())
    }
}

/// `:year/:month` segments of the calendar route.
pub struct MonthPath {
    pub year: i32,
    pub month: u32,
}

#[async_trait]
impl<S> FromRequestParts<S> for MonthPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((year, month)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?;

        let year = year
            .parse()
            .map_err(|_| AppError::ValidationError(format!("Invalid year: {}", year)))?;
        let month = month
            .parse()
            .map_err(|_| AppError::ValidationError(format!("Invalid month: {}", month)))?;

        Ok(MonthPath { year, month })
    }
}
