use askama::Template;

use crate::http_server::forms::{ArtistForm, GENRE_CHOICES, STATE_CHOICES, ShowForm, VenueForm};
use crate::http_server::view_models::{
    AreaView, ArtistDetail, ArtistListItem, SearchResults, ShowView, VenueDetail,
};

#[derive(Template, Default)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub flashes: Vec<String>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesTemplate {
    pub flashes: Vec<String>,
    pub areas: Vec<AreaView>,
}

#[derive(Template)]
#[template(path = "pages/search_venues.html")]
pub struct SearchVenuesTemplate {
    pub flashes: Vec<String>,
    pub results: SearchResults,
    pub search_term: String,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct ShowVenueTemplate {
    pub flashes: Vec<String>,
    pub venue: VenueDetail,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsTemplate {
    pub flashes: Vec<String>,
    pub artists: Vec<ArtistListItem>,
}

#[derive(Template)]
#[template(path = "pages/search_artists.html")]
pub struct SearchArtistsTemplate {
    pub flashes: Vec<String>,
    pub results: SearchResults,
    pub search_term: String,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ShowArtistTemplate {
    pub flashes: Vec<String>,
    pub artist: ArtistDetail,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsTemplate {
    pub flashes: Vec<String>,
    pub shows: Vec<ShowView>,
}

/// Choice lists shared by the venue and artist forms.
pub struct Choices {
    pub states: &'static [&'static str],
    pub genres: &'static [&'static str],
}

impl Default for Choices {
    fn default() -> Self {
        Self {
            states: STATE_CHOICES,
            genres: GENRE_CHOICES,
        }
    }
}

#[derive(Template)]
#[template(path = "forms/new_venue.html")]
pub struct NewVenueTemplate {
    pub flashes: Vec<String>,
    pub form: VenueForm,
    pub choices: Choices,
}

#[derive(Template)]
#[template(path = "forms/edit_venue.html")]
pub struct EditVenueTemplate {
    pub flashes: Vec<String>,
    pub form: VenueForm,
    pub choices: Choices,
    pub venue_id: i64,
    pub venue_name: String,
}

#[derive(Template)]
#[template(path = "forms/new_artist.html")]
pub struct NewArtistTemplate {
    pub flashes: Vec<String>,
    pub form: ArtistForm,
    pub choices: Choices,
}

#[derive(Template)]
#[template(path = "forms/edit_artist.html")]
pub struct EditArtistTemplate {
    pub flashes: Vec<String>,
    pub form: ArtistForm,
    pub choices: Choices,
    pub artist_id: i64,
    pub artist_name: String,
}

#[derive(Template)]
#[template(path = "forms/new_show.html")]
pub struct NewShowTemplate {
    pub flashes: Vec<String>,
    pub form: ShowForm,
}

#[derive(Template, Default)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub flashes: Vec<String>,
}

#[derive(Template, Default)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate {
    pub flashes: Vec<String>,
}
