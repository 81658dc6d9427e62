use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::http_server::templates::{NotFoundTemplate, ServerErrorTemplate};
use crate::services::ServiceError;

pub enum AppError {
    /// Unknown route or record; rendered as the 404 page.
    NotFound,
    /// Anything else; logged and rendered as the 500 page.
    Internal(color_eyre::Report),
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound => f.write_str("NotFound"),
            AppError::Internal(report) => report.fmt(f),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => AppError::NotFound,
            other => AppError::Internal(color_eyre::Report::new(other)),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::Internal(color_eyre::Report::new(err).wrap_err("Failed to render template"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                error_page(StatusCode::NOT_FOUND, NotFoundTemplate::default().render())
            }
            AppError::Internal(err) => {
                log::error!("{err:?}");
                server_error_page()
            }
        }
    }
}

/// The 500 page, also used for handler panics.
pub fn server_error_page() -> Response {
    error_page(
        StatusCode::INTERNAL_SERVER_ERROR,
        ServerErrorTemplate::default().render(),
    )
}

fn error_page(status: StatusCode, page: askama::Result<String>) -> Response {
    match page {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            log::error!("Failed to render {} page: {}", status, err);
            (status, "Something went wrong".to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_service_error_maps_to_404() {
        let err: AppError = ServiceError::NotFound {
            entity: "Venue",
            id: 1,
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_service_errors_map_to_500() {
        let err: AppError = ServiceError::Conflict("venues.name".to_string()).into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
