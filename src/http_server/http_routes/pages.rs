use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;

use crate::http_server::error::AppError;
use crate::http_server::flash;
use crate::http_server::http_routes::render;
use crate::http_server::templates::HomeTemplate;

pub async fn home(jar: CookieJar) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, flashes) = flash::take(jar);
    let page = render(&HomeTemplate { flashes })?;
    Ok((jar, page))
}

/// Home page with `flashes` shown inline, the landing page after a create.
pub(crate) fn home_with(flashes: Vec<String>) -> Result<Html<String>, AppError> {
    render(&HomeTemplate { flashes })
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
