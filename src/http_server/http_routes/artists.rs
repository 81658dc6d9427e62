use std::sync::Arc;

use axum::{extract::State, response::Html, response::Redirect};
use axum_extra::extract::{Form, cookie::CookieJar};

use crate::http_server::error::AppError;
use crate::http_server::extract::RecordId;
use crate::http_server::flash;
use crate::http_server::forms::{ArtistForm, SearchForm};
use crate::http_server::http_routes::{failure_flash, pages::home_with, render};
use crate::http_server::state::AppState;
use crate::http_server::templates::{
    ArtistsTemplate, Choices, EditArtistTemplate, NewArtistTemplate, SearchArtistsTemplate,
    ShowArtistTemplate,
};
use crate::http_server::view_models::{ArtistDetail, SearchResults};

type Page = Result<(CookieJar, Html<String>), AppError>;

pub async fn list_artists(State(state): State<Arc<AppState>>, jar: CookieJar) -> Page {
    let artists = state.artists().list().await?;

    let (jar, flashes) = flash::take(jar);
    let page = render(&ArtistsTemplate {
        flashes,
        artists: artists.into_iter().map(Into::into).collect(),
    })?;
    Ok((jar, page))
}

pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Page {
    let results: SearchResults = state
        .artists()
        .search(&form.search_term)
        .await?
        .into_iter()
        .collect();

    let (jar, flashes) = flash::take(jar);
    let page = render(&SearchArtistsTemplate {
        flashes,
        results,
        search_term: form.search_term,
    })?;
    Ok((jar, page))
}

pub async fn show_artist(
    State(state): State<Arc<AppState>>,
    RecordId(artist_id): RecordId,
    jar: CookieJar,
) -> Page {
    let artists = state.artists();
    let artist = artists.get(artist_id).await?;
    let shows = artists.shows(artist_id).await?;

    let (jar, flashes) = flash::take(jar);
    let page = render(&ShowArtistTemplate {
        flashes,
        artist: ArtistDetail::new(artist, shows),
    })?;
    Ok((jar, page))
}

pub async fn create_artist_form(jar: CookieJar) -> Page {
    let (jar, flashes) = flash::take(jar);
    let page = render(&NewArtistTemplate {
        flashes,
        form: ArtistForm::default(),
        choices: Choices::default(),
    })?;
    Ok((jar, page))
}

pub async fn create_artist_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Page {
    let (jar, mut flashes) = flash::take(jar);

    let message = match form.validate() {
        Ok(fields) => match state.artists().create(fields).await {
            Ok(artist) => format!("Artist {} was successfully listed!", artist.name),
            Err(err) => failure_flash(&err, &format!("Artist {}", form.name), "listed"),
        },
        Err(errors) => errors.flash_message(&form.name, "listed"),
    };
    flashes.push(message);

    Ok((jar, home_with(flashes)?))
}

pub async fn edit_artist(
    State(state): State<Arc<AppState>>,
    RecordId(artist_id): RecordId,
    jar: CookieJar,
) -> Page {
    let artist = state.artists().get(artist_id).await?;

    let (jar, flashes) = flash::take(jar);
    let page = render(&EditArtistTemplate {
        flashes,
        form: ArtistForm::from(&artist),
        choices: Choices::default(),
        artist_id: artist.id,
        artist_name: artist.name,
    })?;
    Ok((jar, page))
}

pub async fn edit_artist_submission(
    State(state): State<Arc<AppState>>,
    RecordId(artist_id): RecordId,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let artists = state.artists();
    artists.get(artist_id).await?;

    let message = match form.validate() {
        Ok(fields) => match artists.update(artist_id, fields).await {
            Ok(artist) => format!("Artist {} was successfully updated!", artist.name),
            Err(err) => failure_flash(&err, &format!("Artist {}", form.name), "updated"),
        },
        Err(errors) => errors.flash_message(&form.name, "edited"),
    };

    Ok((
        flash::push(jar, message),
        Redirect::to(&format!("/artists/{}", artist_id)),
    ))
}
