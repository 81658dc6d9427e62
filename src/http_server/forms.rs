//! Raw form payloads and their validation into service inputs.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::entities::{artist, venue};
use crate::services::artist::ArtistFields;
use crate::services::show::ShowFields;
use crate::services::venue::VenueFields;

pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub const STATE_CHOICES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR",
    "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\([0-9]{3}\)|[0-9]{3})[-. ]?[0-9]{3}[-. ]?[0-9]{4}$").expect("phone pattern is valid")
});

/// Every failing field with its first error, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// `Errors occurred: [name : This field is required.] <subject> could not be <action>`
    pub fn flash_message(&self, subject: &str, action: &str) -> String {
        let errors: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{} : {}", field, message))
            .collect();
        let subject = if subject.is_empty() {
            String::new()
        } else {
            format!("{} ", subject)
        };
        format!(
            "Errors occurred: [{}] {}could not be {}",
            errors.join(", "),
            subject,
            action
        )
    }
}

#[derive(Default)]
struct Validator {
    errors: FieldErrors,
}

impl Validator {
    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        if self.errors.get(field).is_none() {
            self.errors.0.push((field, message.into()));
        }
    }

    /// Whitespace-only counts as missing; the value is kept as typed.
    fn required(&mut self, field: &'static str, value: &str) -> String {
        if value.trim().is_empty() {
            self.fail(field, "This field is required.");
        }
        value.to_string()
    }

    fn state(&mut self, value: &str) -> String {
        let value = self.required("state", value);
        if !value.trim().is_empty() && !STATE_CHOICES.contains(&value.as_str()) {
            self.fail("state", "Not a valid choice.");
        }
        value
    }

    fn phone(&mut self, value: &str) -> Option<String> {
        let value = optional(value)?;
        if !PHONE_RE.is_match(value.trim()) {
            self.fail("phone", "Invalid phone number.");
        }
        Some(value)
    }

    fn url(&mut self, field: &'static str, value: &str) -> Option<String> {
        let value = optional(value)?;
        match Url::parse(value.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => self.fail(field, "Invalid URL."),
        }
        Some(value)
    }

    fn genres(&mut self, values: &[String]) -> Vec<String> {
        let genres: Vec<String> = values
            .iter()
            .map(|genre| genre.trim().to_string())
            .filter(|genre| !genre.is_empty())
            .collect();

        if genres.is_empty() {
            self.fail("genres", "This field is required.");
        }
        if let Some(unknown) = genres
            .iter()
            .find(|genre| !GENRE_CHOICES.contains(&genre.as_str()))
        {
            self.fail(
                "genres",
                format!("'{}' is not a valid choice for this field.", unknown),
            );
        }
        genres
    }

    fn integer(&mut self, field: &'static str, value: &str) -> i64 {
        let value = self.required(field, value);
        let value = value.trim();
        if value.is_empty() {
            return 0;
        }
        value.parse().unwrap_or_else(|_| {
            self.fail(field, "Not a valid integer value.");
            0
        })
    }

    fn start_time(&mut self, value: &str) -> DateTime<Utc> {
        let value = self.required("start_time", value);
        let value = value.trim();
        if value.is_empty() {
            return DateTime::<Utc>::MIN_UTC;
        }
        START_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .map(|naive| naive.and_utc())
            .unwrap_or_else(|| {
                self.fail("start_time", "Not a valid datetime value.");
                DateTime::<Utc>::MIN_UTC
            })
    }

    fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

/// Blank means `None`; anything else is kept as typed.
fn optional(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub website_link: String,
    /// Checkbox: present when ticked.
    pub seeking_talent: Option<String>,
    pub seeking_description: String,
}

impl VenueForm {
    pub fn validate(&self) -> Result<VenueFields, FieldErrors> {
        let mut v = Validator::default();
        let fields = VenueFields {
            name: v.required("name", &self.name),
            city: v.required("city", &self.city),
            state: v.state(&self.state),
            address: v.required("address", &self.address),
            phone: v.phone(&self.phone),
            image_link: v.url("image_link", &self.image_link),
            genres: v.genres(&self.genres),
            facebook_link: v.url("facebook_link", &self.facebook_link),
            website_link: v.url("website_link", &self.website_link),
            seeking_talent: self.seeking_talent.is_some(),
            seeking_description: optional(&self.seeking_description),
        };
        v.finish(fields)
    }

    pub fn is_state(&self, code: &str) -> bool {
        self.state == code
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn seeking(&self) -> bool {
        self.seeking_talent.is_some()
    }
}

impl From<&venue::Model> for VenueForm {
    fn from(venue: &venue::Model) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
            genres: venue.genres.0.clone(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            website_link: venue.website_link.clone().unwrap_or_default(),
            seeking_talent: venue.seeking_talent.then(|| "y".to_string()),
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub website_link: String,
    /// Checkbox: present when ticked.
    pub seeking_venue: Option<String>,
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<ArtistFields, FieldErrors> {
        let mut v = Validator::default();
        let fields = ArtistFields {
            name: v.required("name", &self.name),
            city: v.required("city", &self.city),
            state: v.state(&self.state),
            phone: v.phone(&self.phone),
            image_link: v.url("image_link", &self.image_link),
            genres: v.genres(&self.genres),
            facebook_link: v.url("facebook_link", &self.facebook_link),
            website_link: v.url("website_link", &self.website_link),
            seeking_venue: self.seeking_venue.is_some(),
            seeking_description: optional(&self.seeking_description),
        };
        v.finish(fields)
    }

    pub fn is_state(&self, code: &str) -> bool {
        self.state == code
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn seeking(&self) -> bool {
        self.seeking_venue.is_some()
    }
}

impl From<&artist::Model> for ArtistForm {
    fn from(artist: &artist::Model) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone().unwrap_or_default(),
            image_link: artist.image_link.clone().unwrap_or_default(),
            genres: artist.genres.0.clone(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            website_link: artist.website_link.clone().unwrap_or_default(),
            seeking_venue: artist.seeking_venue.then(|| "y".to_string()),
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowForm {
    /// Blank form with the start time defaulted to `now`.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            start_time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<ShowFields, FieldErrors> {
        let mut v = Validator::default();
        let fields = ShowFields {
            artist_id: v.integer("artist_id", &self.artist_id),
            venue_id: v.integer("venue_id", &self.venue_id),
            start_time: v.start_time(&self.start_time),
        };
        v.finish(fields)
    }
}
