use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, cookie::CookieJar};

use crate::http_server::error::AppError;
use crate::http_server::extract::RecordId;
use crate::http_server::flash;
use crate::http_server::forms::{SearchForm, VenueForm};
use crate::http_server::http_routes::{failure_flash, pages::home_with, render};
use crate::http_server::state::AppState;
use crate::http_server::templates::{
    Choices, EditVenueTemplate, NewVenueTemplate, SearchVenuesTemplate, ShowVenueTemplate,
    VenuesTemplate,
};
use crate::http_server::view_models::{SearchResults, VenueDetail};
use crate::services::ServiceError;

type Page = Result<(CookieJar, Html<String>), AppError>;

pub async fn list_venues(State(state): State<Arc<AppState>>, jar: CookieJar) -> Page {
    let areas = state.venues().list_areas().await?;

    let (jar, flashes) = flash::take(jar);
    let page = render(&VenuesTemplate {
        flashes,
        areas: areas.into_iter().map(Into::into).collect(),
    })?;
    Ok((jar, page))
}

pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Page {
    let results: SearchResults = state
        .venues()
        .search(&form.search_term)
        .await?
        .into_iter()
        .collect();

    let (jar, flashes) = flash::take(jar);
    let page = render(&SearchVenuesTemplate {
        flashes,
        results,
        search_term: form.search_term,
    })?;
    Ok((jar, page))
}

pub async fn show_venue(
    State(state): State<Arc<AppState>>,
    RecordId(venue_id): RecordId,
    jar: CookieJar,
) -> Page {
    let venues = state.venues();
    let venue = venues.get(venue_id).await?;
    let shows = venues.shows(venue_id).await?;

    let (jar, flashes) = flash::take(jar);
    let page = render(&ShowVenueTemplate {
        flashes,
        venue: VenueDetail::new(venue, shows),
    })?;
    Ok((jar, page))
}

pub async fn create_venue_form(jar: CookieJar) -> Page {
    let (jar, flashes) = flash::take(jar);
    let page = render(&NewVenueTemplate {
        flashes,
        form: VenueForm::default(),
        choices: Choices::default(),
    })?;
    Ok((jar, page))
}

pub async fn create_venue_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Page {
    let (jar, mut flashes) = flash::take(jar);

    let message = match form.validate() {
        Ok(fields) => match state.venues().create(fields).await {
            Ok(venue) => format!("Venue {} was successfully listed!", venue.name),
            Err(err) => failure_flash(&err, &format!("Venue {}", form.name), "listed"),
        },
        Err(errors) => errors.flash_message(&form.name, "listed"),
    };
    flashes.push(message);

    Ok((jar, home_with(flashes)?))
}

pub async fn edit_venue(
    State(state): State<Arc<AppState>>,
    RecordId(venue_id): RecordId,
    jar: CookieJar,
) -> Page {
    let venue = state.venues().get(venue_id).await?;

    let (jar, flashes) = flash::take(jar);
    let page = render(&EditVenueTemplate {
        flashes,
        form: VenueForm::from(&venue),
        choices: Choices::default(),
        venue_id: venue.id,
        venue_name: venue.name,
    })?;
    Ok((jar, page))
}

pub async fn edit_venue_submission(
    State(state): State<Arc<AppState>>,
    RecordId(venue_id): RecordId,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let venues = state.venues();
    // Unknown ids answer 404 before the form is looked at
    venues.get(venue_id).await?;

    let message = match form.validate() {
        Ok(fields) => match venues.update(venue_id, fields).await {
            Ok(venue) => format!("Venue {} was successfully updated!", venue.name),
            Err(err) => failure_flash(&err, &format!("Venue {}", form.name), "updated"),
        },
        Err(errors) => errors.flash_message(&form.name, "edited"),
    };

    Ok((
        flash::push(jar, message),
        Redirect::to(&format!("/venues/{}", venue_id)),
    ))
}

pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    RecordId(venue_id): RecordId,
    jar: CookieJar,
) -> Result<Response, AppError> {
    match state.venues().delete(venue_id).await {
        Ok(venue) => {
            let jar = flash::push(jar, format!("Venue {} was successfully deleted", venue.name));
            Ok((jar, StatusCode::NO_CONTENT).into_response())
        }
        Err(err @ ServiceError::NotFound { .. }) => Err(err.into()),
        Err(err) => {
            log::error!("Venue {} not deleted: {}", venue_id, err);
            let jar = flash::push(jar, "Venue could not be deleted");
            Ok((jar, StatusCode::INTERNAL_SERVER_ERROR).into_response())
        }
    }
}
