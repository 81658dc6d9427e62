use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::http_server::error::AppError;

/// Integer id from the last path parameter. Anything that is not an integer
/// answers 404, like an id that matches no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        raw.parse().map(RecordId).map_err(|_| AppError::NotFound)
    }
}
