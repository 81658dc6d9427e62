//! Flat shapes handed to templates. Nothing here touches the database.

use chrono::{DateTime, Utc};

use crate::entities::{artist, show, venue};
use crate::services::show::ShowListing;
use crate::services::venue::VenueArea;
use crate::services::{ShowsPartition, WithUpcomingShows};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Saturday June, 1, 2024 at 8:00PM`
    Full,
    /// `Sat 06, 01, 2024 8:00PM`
    Medium,
}

/// Timestamp cast to the plain `YYYY-MM-DD HH:MM:SS` form.
pub fn start_time_string(start_time: &DateTime<Utc>) -> String {
    start_time.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_datetime(value: &DateTime<Utc>, format: DateFormat) -> String {
    let pattern = match format {
        DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
        DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
    };
    value.format(pattern).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u64,
}

impl From<WithUpcomingShows<venue::Model>> for ListingSummary {
    fn from(row: WithUpcomingShows<venue::Model>) -> Self {
        Self {
            id: row.model.id,
            name: row.model.name,
            num_upcoming_shows: row.num_upcoming_shows,
        }
    }
}

impl From<WithUpcomingShows<artist::Model>> for ListingSummary {
    fn from(row: WithUpcomingShows<artist::Model>) -> Self {
        Self {
            id: row.model.id,
            name: row.model.name,
            num_upcoming_shows: row.num_upcoming_shows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaView {
    pub city: String,
    pub state: String,
    pub venues: Vec<ListingSummary>,
}

impl From<VenueArea> for AreaView {
    fn from(area: VenueArea) -> Self {
        Self {
            city: area.city,
            state: area.state,
            venues: area.venues.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<ListingSummary>,
}

impl<T> FromIterator<T> for SearchResults
where
    T: Into<ListingSummary>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let data: Vec<ListingSummary> = iter.into_iter().map(Into::into).collect();
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistListItem {
    pub id: i64,
    pub name: String,
}

impl From<artist::Model> for ArtistListItem {
    fn from(artist: artist::Model) -> Self {
        Self {
            id: artist.id,
            name: artist.name,
        }
    }
}

/// A show as seen from a venue page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistShowView {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
    pub start_time_display: String,
}

impl From<(show::Model, artist::Model)> for ArtistShowView {
    fn from((show, artist): (show::Model, artist::Model)) -> Self {
        Self {
            artist_id: show.artist_id,
            artist_name: artist.name,
            artist_image_link: artist.image_link,
            start_time: start_time_string(&show.start_time),
            start_time_display: format_datetime(&show.start_time, DateFormat::Full),
        }
    }
}

/// A show as seen from an artist page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueShowView {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
    pub start_time_display: String,
}

impl From<(show::Model, venue::Model)> for VenueShowView {
    fn from((show, venue): (show::Model, venue::Model)) -> Self {
        Self {
            venue_id: show.venue_id,
            venue_name: venue.name,
            venue_image_link: venue.image_link,
            start_time: start_time_string(&show.start_time),
            start_time_display: format_datetime(&show.start_time, DateFormat::Full),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub past_shows: Vec<ArtistShowView>,
    pub upcoming_shows: Vec<ArtistShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenueDetail {
    pub fn new(venue: venue::Model, shows: ShowsPartition<artist::Model>) -> Self {
        let past_shows: Vec<ArtistShowView> = shows.past.into_iter().map(Into::into).collect();
        let upcoming_shows: Vec<ArtistShowView> =
            shows.upcoming.into_iter().map(Into::into).collect();

        Self {
            id: venue.id,
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address,
            phone: venue.phone,
            image_link: venue.image_link,
            genres: venue.genres.0,
            facebook_link: venue.facebook_link,
            website: venue.website_link,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub past_shows: Vec<VenueShowView>,
    pub upcoming_shows: Vec<VenueShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistDetail {
    pub fn new(artist: artist::Model, shows: ShowsPartition<venue::Model>) -> Self {
        let past_shows: Vec<VenueShowView> = shows.past.into_iter().map(Into::into).collect();
        let upcoming_shows: Vec<VenueShowView> =
            shows.upcoming.into_iter().map(Into::into).collect();

        Self {
            id: artist.id,
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            image_link: artist.image_link,
            genres: artist.genres.0,
            facebook_link: artist.facebook_link,
            website: artist.website_link,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowView {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
    pub start_time_display: String,
}

impl From<ShowListing> for ShowView {
    fn from(listing: ShowListing) -> Self {
        Self {
            venue_id: listing.show.venue_id,
            venue_name: listing.venue.name,
            artist_id: listing.show.artist_id,
            artist_name: listing.artist.name,
            artist_image_link: listing.artist.image_link,
            start_time: start_time_string(&listing.show.start_time),
            start_time_display: format_datetime(&listing.show.start_time, DateFormat::Medium),
        }
    }
}
