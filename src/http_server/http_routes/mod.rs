pub mod artists;
pub mod pages;
pub mod shows;
pub mod venues;

use askama::Template;
use axum::response::Html;

use crate::http_server::error::AppError;
use crate::services::ServiceError;

pub(crate) fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

/// Log a failed mutation and build the flash shown to the user. Only a bad
/// reference is the user's doing, so only that cause is spelled out.
pub(crate) fn failure_flash(err: &ServiceError, subject: &str, action: &str) -> String {
    let generic = format!("An error occurred. {} could not be {}.", subject, action);

    match err {
        ServiceError::InvalidReference(reason) => {
            log::warn!("{} not {}: {}", subject, action, reason);
            format!("{} {}.", generic, reason)
        }
        _ => {
            log::error!("{} not {}: {}", subject, action, err);
            generic
        }
    }
}
