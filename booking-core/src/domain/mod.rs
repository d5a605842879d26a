use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookable location that may seek performing artists.
///
/// `seeking_description` only carries a value while `seeking_talent` is set;
/// the storage layer clears it on every write where the flag is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: Option<i64>,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// A performer that may seek venues. Same seeking-description rule as
/// [`Venue`], keyed on `seeking_venue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: Option<i64>,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// A scheduled booking of one artist at one venue at a specific time.
/// Pure association record; both foreign keys are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: Option<i64>,
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

/// Listing row for a venue: identity plus the upcoming-show count computed
/// against the caller's "now".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub num_upcoming_shows: i64,
}

/// Listing row for an artist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
}

/// A venue's show joined with the performing artist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowWithArtist {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// An artist's show joined with the hosting venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowWithVenue {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A show joined with both parents, for the global shows listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}
