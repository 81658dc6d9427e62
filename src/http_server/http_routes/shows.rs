use std::sync::Arc;

use axum::{extract::State, response::Html};
use axum_extra::extract::{Form, cookie::CookieJar};

use crate::http_server::error::AppError;
use crate::http_server::flash;
use crate::http_server::forms::ShowForm;
use crate::http_server::http_routes::{failure_flash, pages::home_with, render};
use crate::http_server::state::AppState;
use crate::http_server::templates::{NewShowTemplate, ShowsTemplate};

type Page = Result<(CookieJar, Html<String>), AppError>;

pub async fn list_shows(State(state): State<Arc<AppState>>, jar: CookieJar) -> Page {
    let shows = state.shows().list().await?;

    let (jar, flashes) = flash::take(jar);
    let page = render(&ShowsTemplate {
        flashes,
        shows: shows.into_iter().map(Into::into).collect(),
    })?;
    Ok((jar, page))
}

pub async fn create_show_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> Page {
    let (jar, flashes) = flash::take(jar);
    let page = render(&NewShowTemplate {
        flashes,
        form: ShowForm::starting_at(state.clock.now()),
    })?;
    Ok((jar, page))
}

pub async fn create_show_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> Page {
    let (jar, mut flashes) = flash::take(jar);

    let message = match form.validate() {
        Ok(fields) => match state.shows().create(fields).await {
            Ok(_) => "Show was successfully listed!".to_string(),
            Err(err) => failure_flash(&err, "Show", "listed"),
        },
        Err(errors) => errors.flash_message("show", "listed"),
    };
    flashes.push(message);

    Ok((jar, home_with(flashes)?))
}
