use crate::common::error::Result;
use crate::domain::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage trait for persisting directory data (venues, artists, shows).
///
/// `create_*` fills in the record's id on success. Read methods that take a
/// `now` compute the past/upcoming boundary against it rather than against
/// any stored flag.
#[async_trait]
pub trait Storage: Send + Sync {
    // Venue operations
    async fn create_venue(&self, venue: &mut Venue) -> Result<()>;
    async fn update_venue(&self, venue: &Venue) -> Result<()>;
    /// Deletes the venue and, through the schema's cascade, its shows.
    /// Returns the deleted record.
    async fn delete_venue(&self, venue_id: i64) -> Result<Venue>;
    async fn get_venue_by_id(&self, venue_id: i64) -> Result<Option<Venue>>;
    /// All venues ordered by (state, city, name) with upcoming-show counts.
    async fn venue_summaries(&self, now: DateTime<Utc>) -> Result<Vec<VenueSummary>>;
    /// Case-insensitive substring match on name; empty term matches all.
    async fn search_venues(&self, term: &str, now: DateTime<Utc>) -> Result<Vec<VenueSummary>>;

    // Artist operations
    async fn create_artist(&self, artist: &mut Artist) -> Result<()>;
    async fn update_artist(&self, artist: &Artist) -> Result<()>;
    async fn get_artist_by_id(&self, artist_id: i64) -> Result<Option<Artist>>;
    async fn get_all_artists(&self) -> Result<Vec<ArtistSummary>>;
    async fn search_artists(&self, term: &str) -> Result<Vec<ArtistSummary>>;

    // Show operations
    /// Verifies both foreign references exist before inserting; a dangling
    /// id yields a `Validation` error and persists nothing.
    async fn create_show(&self, show: &mut Show) -> Result<()>;
    async fn get_all_shows(&self) -> Result<Vec<ShowListing>>;
    async fn shows_by_venue(&self, venue_id: i64) -> Result<Vec<ShowWithArtist>>;
    async fn shows_by_artist(&self, artist_id: i64) -> Result<Vec<ShowWithVenue>>;
}
