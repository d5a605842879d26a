use booking_core::{
    Artist, BookingError, Show, ShowListing, ShowWithArtist, ShowWithVenue, Venue, VenueSummary,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Genre choices offered by the create/edit forms.
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

/// Timestamp shapes accepted from the show form: the datetime-local input
/// with and without seconds, and the plain space-separated form.
const ACCEPTED_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn blank_to_none(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn display_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}

// ---------------------------------------------------------------------------
// Typed request forms
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Deserialize)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub seeking_talent: String,
    #[serde(default)]
    pub seeking_description: String,
}

impl VenueForm {
    /// The seeking checkbox submits the literal string "True"; anything else
    /// is false, and a false flag drops the description.
    pub fn into_venue(self, id: Option<i64>) -> Venue {
        let seeking_talent = self.seeking_talent == "True";
        Venue {
            id,
            name: self.name,
            city: self.city,
            state: self.state,
            address: blank_to_none(self.address),
            phone: blank_to_none(self.phone),
            image_link: blank_to_none(self.image_link),
            facebook_link: blank_to_none(self.facebook_link),
            website: blank_to_none(self.website),
            genres: self.genres,
            seeking_talent,
            seeking_description: if seeking_talent {
                blank_to_none(self.seeking_description)
            } else {
                None
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub seeking_venue: String,
    #[serde(default)]
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn into_artist(self, id: Option<i64>) -> Artist {
        let seeking_venue = self.seeking_venue == "True";
        Artist {
            id,
            name: self.name,
            city: self.city,
            state: self.state,
            phone: blank_to_none(self.phone),
            image_link: blank_to_none(self.image_link),
            facebook_link: blank_to_none(self.facebook_link),
            website: blank_to_none(self.website),
            genres: self.genres,
            seeking_venue,
            seeking_description: if seeking_venue {
                blank_to_none(self.seeking_description)
            } else {
                None
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

impl ShowForm {
    /// Coerces the raw form fields, surfacing bad input as a validation
    /// failure rather than a hard error.
    pub fn to_show(&self) -> booking_core::Result<Show> {
        let artist_id: i64 =
            self.artist_id
                .trim()
                .parse()
                .map_err(|_| BookingError::Validation {
                    message: format!("'{}' is not a valid artist id", self.artist_id),
                })?;
        let venue_id: i64 =
            self.venue_id
                .trim()
                .parse()
                .map_err(|_| BookingError::Validation {
                    message: format!("'{}' is not a valid venue id", self.venue_id),
                })?;
        let start_time = parse_start_time(self.start_time.trim())?;

        Ok(Show {
            id: None,
            venue_id,
            artist_id,
            start_time,
        })
    }
}

fn parse_start_time(value: &str) -> booking_core::Result<DateTime<Utc>> {
    ACCEPTED_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| BookingError::Validation {
            message: format!("'{value}' is not a valid start time"),
        })
}

// ---------------------------------------------------------------------------
// View shaping
// ---------------------------------------------------------------------------

/// One (city, state) bucket of the grouped venue listing.
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Folds venue summaries into (city, state) buckets. Sorts by (state, city)
/// first so the fold can never emit two buckets for the same area, whatever
/// order the rows arrive in.
pub fn group_by_area(mut summaries: Vec<VenueSummary>) -> Vec<Area> {
    summaries.sort_by(|a, b| (&a.state, &a.city).cmp(&(&b.state, &b.city)));

    let mut areas: Vec<Area> = Vec::new();
    for venue in summaries {
        match areas.last_mut() {
            Some(area) if area.city == venue.city && area.state == venue.state => {
                area.venues.push(venue);
            }
            _ => areas.push(Area {
                city: venue.city.clone(),
                state: venue.state.clone(),
                venues: vec![venue],
            }),
        }
    }
    areas
}

/// Strict two-way partition: `start_time >= now` is upcoming, `< now` is
/// past. Returns (past, upcoming).
pub fn split_by_time<T>(
    items: Vec<T>,
    now: DateTime<Utc>,
    start_time: impl Fn(&T) -> DateTime<Utc>,
) -> (Vec<T>, Vec<T>) {
    let mut past = Vec::new();
    let mut upcoming = Vec::new();
    for item in items {
        if start_time(&item) >= now {
            upcoming.push(item);
        } else {
            past.push(item);
        }
    }
    (past, upcoming)
}

/// One show on a detail page, carrying the other party's identity.
pub struct ShowCard {
    pub id: i64,
    pub name: String,
    pub image_link: String,
    pub starts_at: String,
}

impl ShowCard {
    fn for_artist(show: ShowWithArtist) -> Self {
        Self {
            id: show.artist_id,
            name: show.artist_name,
            image_link: show.artist_image_link.unwrap_or_default(),
            starts_at: display_time(show.start_time),
        }
    }

    fn for_venue(show: ShowWithVenue) -> Self {
        Self {
            id: show.venue_id,
            name: show.venue_name,
            image_link: show.venue_image_link.unwrap_or_default(),
            starts_at: display_time(show.start_time),
        }
    }
}

pub struct VenuePage {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub image_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub past_shows: Vec<ShowCard>,
    pub upcoming_shows: Vec<ShowCard>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenuePage {
    pub fn assemble(
        id: i64,
        venue: Venue,
        shows: Vec<ShowWithArtist>,
        now: DateTime<Utc>,
    ) -> Self {
        let (past, upcoming) = split_by_time(shows, now, |s| s.start_time);
        let past_shows: Vec<ShowCard> = past.into_iter().map(ShowCard::for_artist).collect();
        let upcoming_shows: Vec<ShowCard> =
            upcoming.into_iter().map(ShowCard::for_artist).collect();

        Self {
            id,
            name: venue.name,
            genres: venue.genres,
            address: venue.address.unwrap_or_default(),
            city: venue.city,
            state: venue.state,
            phone: venue.phone.unwrap_or_default(),
            website: venue.website.unwrap_or_default(),
            facebook_link: venue.facebook_link.unwrap_or_default(),
            image_link: venue.image_link.unwrap_or_default(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.unwrap_or_default(),
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

pub struct ArtistPage {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub image_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub past_shows: Vec<ShowCard>,
    pub upcoming_shows: Vec<ShowCard>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistPage {
    pub fn assemble(
        id: i64,
        artist: Artist,
        shows: Vec<ShowWithVenue>,
        now: DateTime<Utc>,
    ) -> Self {
        let (past, upcoming) = split_by_time(shows, now, |s| s.start_time);
        let past_shows: Vec<ShowCard> = past.into_iter().map(ShowCard::for_venue).collect();
        let upcoming_shows: Vec<ShowCard> =
            upcoming.into_iter().map(ShowCard::for_venue).collect();

        Self {
            id,
            name: artist.name,
            genres: artist.genres,
            city: artist.city,
            state: artist.state,
            phone: artist.phone.unwrap_or_default(),
            website: artist.website.unwrap_or_default(),
            facebook_link: artist.facebook_link.unwrap_or_default(),
            image_link: artist.image_link.unwrap_or_default(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.unwrap_or_default(),
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

/// One row of the global shows listing.
pub struct ShowRow {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub starts_at: String,
}

impl From<ShowListing> for ShowRow {
    fn from(show: ShowListing) -> Self {
        Self {
            venue_id: show.venue_id,
            venue_name: show.venue_name,
            artist_id: show.artist_id,
            artist_name: show.artist_name,
            artist_image_link: show.artist_image_link.unwrap_or_default(),
            starts_at: display_time(show.start_time),
        }
    }
}

/// One entry of the genre multi-select.
pub struct GenreOption {
    pub name: &'static str,
    pub selected: bool,
}

pub fn genre_options(selected: &[String]) -> Vec<GenreOption> {
    GENRE_CHOICES
        .iter()
        .map(|genre| GenreOption {
            name: genre,
            selected: selected.iter().any(|s| s == genre),
        })
        .collect()
}

/// Pre-filled venue edit form.
pub struct VenueFormView {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub facebook_link: String,
    pub image_link: String,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub genre_options: Vec<GenreOption>,
}

impl VenueFormView {
    pub fn from_venue(id: i64, venue: Venue) -> Self {
        Self {
            id,
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address.unwrap_or_default(),
            phone: venue.phone.unwrap_or_default(),
            facebook_link: venue.facebook_link.unwrap_or_default(),
            image_link: venue.image_link.unwrap_or_default(),
            website: venue.website.unwrap_or_default(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.unwrap_or_default(),
            genre_options: genre_options(&venue.genres),
        }
    }
}

/// Pre-filled artist edit form.
pub struct ArtistFormView {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub facebook_link: String,
    pub image_link: String,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub genre_options: Vec<GenreOption>,
}

impl ArtistFormView {
    pub fn from_artist(id: i64, artist: Artist) -> Self {
        Self {
            id,
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone.unwrap_or_default(),
            facebook_link: artist.facebook_link.unwrap_or_default(),
            image_link: artist.image_link.unwrap_or_default(),
            website: artist.website.unwrap_or_default(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.unwrap_or_default(),
            genre_options: genre_options(&artist.genres),
        }
    }
}
