use super::traits::Storage;
use crate::common::error::{BookingError, Result};
use crate::database::DatabaseManager;
use crate::domain::*;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use libsql::Row;
use std::sync::Arc;
use tracing::{debug, info};

/// Timestamps are stored as UTC text in this format so that SQL string
/// comparison against a formatted `now` parameter is chronological.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| BookingError::Database {
            message: format!("Invalid stored timestamp '{s}': {e}"),
        })
}

/// Relational storage implementation over libSQL.
pub struct DatabaseStorage {
    db: Arc<DatabaseManager>,
}

impl DatabaseStorage {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db: Arc::new(db) }
    }

    fn text(row: &Row, idx: i32) -> Result<String> {
        match row.get_value(idx) {
            Ok(libsql::Value::Text(s)) => Ok(s),
            Ok(other) => Err(BookingError::Database {
                message: format!("Expected text at column {idx}, got {other:?}"),
            }),
            Err(e) => Err(BookingError::Database {
                message: format!("Failed to read column {idx}: {e}"),
            }),
        }
    }

    fn opt_text(row: &Row, idx: i32) -> Result<Option<String>> {
        match row.get_value(idx) {
            Ok(libsql::Value::Text(s)) => Ok(Some(s)),
            Ok(libsql::Value::Null) => Ok(None),
            Ok(other) => Err(BookingError::Database {
                message: format!("Expected text or null at column {idx}, got {other:?}"),
            }),
            Err(e) => Err(BookingError::Database {
                message: format!("Failed to read column {idx}: {e}"),
            }),
        }
    }

    fn integer(row: &Row, idx: i32) -> Result<i64> {
        match row.get_value(idx) {
            Ok(libsql::Value::Integer(n)) => Ok(n),
            Ok(other) => Err(BookingError::Database {
                message: format!("Expected integer at column {idx}, got {other:?}"),
            }),
            Err(e) => Err(BookingError::Database {
                message: format!("Failed to read column {idx}: {e}"),
            }),
        }
    }

    fn flag(row: &Row, idx: i32) -> Result<bool> {
        Ok(Self::integer(row, idx)? != 0)
    }

    fn timestamp(row: &Row, idx: i32) -> Result<DateTime<Utc>> {
        parse_timestamp(&Self::text(row, idx)?)
    }

    fn genres(row: &Row, idx: i32) -> Result<Vec<String>> {
        Ok(serde_json::from_str(&Self::text(row, idx)?)?)
    }

    // Column order: id, name, city, state, address, phone, image_link,
    // facebook_link, website, genres, seeking_talent, seeking_description
    fn row_to_venue(row: &Row) -> Result<Venue> {
        Ok(Venue {
            id: Some(Self::integer(row, 0)?),
            name: Self::text(row, 1)?,
            city: Self::text(row, 2)?,
            state: Self::text(row, 3)?,
            address: Self::opt_text(row, 4)?,
            phone: Self::opt_text(row, 5)?,
            image_link: Self::opt_text(row, 6)?,
            facebook_link: Self::opt_text(row, 7)?,
            website: Self::opt_text(row, 8)?,
            genres: Self::genres(row, 9)?,
            seeking_talent: Self::flag(row, 10)?,
            seeking_description: Self::opt_text(row, 11)?,
        })
    }

    // Column order: id, name, city, state, phone, image_link, facebook_link,
    // website, genres, seeking_venue, seeking_description
    fn row_to_artist(row: &Row) -> Result<Artist> {
        Ok(Artist {
            id: Some(Self::integer(row, 0)?),
            name: Self::text(row, 1)?,
            city: Self::text(row, 2)?,
            state: Self::text(row, 3)?,
            phone: Self::opt_text(row, 4)?,
            image_link: Self::opt_text(row, 5)?,
            facebook_link: Self::opt_text(row, 6)?,
            website: Self::opt_text(row, 7)?,
            genres: Self::genres(row, 8)?,
            seeking_venue: Self::flag(row, 9)?,
            seeking_description: Self::opt_text(row, 10)?,
        })
    }

    fn db_err(context: &str, e: libsql::Error) -> BookingError {
        BookingError::Database {
            message: format!("{context}: {e}"),
        }
    }
}

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, \
     facebook_link, website, genres, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, image_link, \
     facebook_link, website, genres, seeking_venue, seeking_description";

#[async_trait]
impl Storage for DatabaseStorage {
    async fn create_venue(&self, venue: &mut Venue) -> Result<()> {
        // The seeking description only exists while the flag is set.
        if !venue.seeking_talent {
            venue.seeking_description = None;
        }

        let conn = self.db.get_connection().await?;
        let genres = serde_json::to_string(&venue.genres)?;

        conn.execute(
            "INSERT INTO venues (name, city, state, address, phone, image_link, \
             facebook_link, website, genres, seeking_talent, seeking_description) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            libsql::params![
                venue.name.clone(),
                venue.city.clone(),
                venue.state.clone(),
                venue.address.clone(),
                venue.phone.clone(),
                venue.image_link.clone(),
                venue.facebook_link.clone(),
                venue.website.clone(),
                genres,
                i64::from(venue.seeking_talent),
                venue.seeking_description.clone(),
            ],
        )
        .await
        .map_err(|e| Self::db_err("Failed to insert venue", e))?;

        let id = conn.last_insert_rowid();
        venue.id = Some(id);

        info!("Created venue: {} with id {}", venue.name, id);
        Ok(())
    }

    async fn update_venue(&self, venue: &Venue) -> Result<()> {
        let venue_id = venue.id.ok_or_else(|| BookingError::Validation {
            message: "Cannot update a venue without an id".to_string(),
        })?;

        let seeking_description = if venue.seeking_talent {
            venue.seeking_description.clone()
        } else {
            None
        };

        let conn = self.db.get_connection().await?;
        let genres = serde_json::to_string(&venue.genres)?;

        // Full-record replace: every editable field is overwritten.
        let changed = conn
            .execute(
                "UPDATE venues SET name = ?1, city = ?2, state = ?3, address = ?4, \
                 phone = ?5, image_link = ?6, facebook_link = ?7, website = ?8, \
                 genres = ?9, seeking_talent = ?10, seeking_description = ?11 \
                 WHERE id = ?12",
                libsql::params![
                    venue.name.clone(),
                    venue.city.clone(),
                    venue.state.clone(),
                    venue.address.clone(),
                    venue.phone.clone(),
                    venue.image_link.clone(),
                    venue.facebook_link.clone(),
                    venue.website.clone(),
                    genres,
                    i64::from(venue.seeking_talent),
                    seeking_description,
                    venue_id,
                ],
            )
            .await
            .map_err(|e| Self::db_err("Failed to update venue", e))?;

        if changed == 0 {
            return Err(BookingError::NotFound {
                entity: "venue",
                id: venue_id,
            });
        }

        info!("Updated venue: {} with id {}", venue.name, venue_id);
        Ok(())
    }

    async fn delete_venue(&self, venue_id: i64) -> Result<Venue> {
        let venue = self
            .get_venue_by_id(venue_id)
            .await?
            .ok_or(BookingError::NotFound {
                entity: "venue",
                id: venue_id,
            })?;

        let conn = self.db.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| Self::db_err("Failed to begin transaction", e))?;

        tx.execute(
            "DELETE FROM venues WHERE id = ?1",
            libsql::params![venue_id],
        )
        .await
        .map_err(|e| Self::db_err("Failed to delete venue", e))?;

        tx.commit()
            .await
            .map_err(|e| Self::db_err("Failed to commit venue deletion", e))?;

        info!("Deleted venue: {} with id {}", venue.name, venue_id);
        Ok(venue)
    }

    async fn get_venue_by_id(&self, venue_id: i64) -> Result<Option<Venue>> {
        let conn = self.db.get_connection().await?;

        let mut rows = conn
            .query(
                &format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1"),
                libsql::params![venue_id],
            )
            .await
            .map_err(|e| Self::db_err("Failed to query venue", e))?;

        match rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
        {
            Some(row) => Ok(Some(Self::row_to_venue(&row)?)),
            None => Ok(None),
        }
    }

    async fn venue_summaries(&self, now: DateTime<Utc>) -> Result<Vec<VenueSummary>> {
        let conn = self.db.get_connection().await?;

        // Sorted in SQL so consecutive rows with equal (city, state) always
        // belong to the same area bucket.
        let mut rows = conn
            .query(
                "SELECT v.id, v.name, v.city, v.state, \
                 (SELECT COUNT(*) FROM shows s \
                  WHERE s.venue_id = v.id AND s.start_time >= ?1) \
                 FROM venues v \
                 ORDER BY v.state, v.city, v.name",
                libsql::params![format_timestamp(now)],
            )
            .await
            .map_err(|e| Self::db_err("Failed to query venues", e))?;

        let mut summaries = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
        {
            summaries.push(VenueSummary {
                id: Self::integer(&row, 0)?,
                name: Self::text(&row, 1)?,
                city: Self::text(&row, 2)?,
                state: Self::text(&row, 3)?,
                num_upcoming_shows: Self::integer(&row, 4)?,
            });
        }

        Ok(summaries)
    }

    async fn search_venues(&self, term: &str, now: DateTime<Utc>) -> Result<Vec<VenueSummary>> {
        let conn = self.db.get_connection().await?;

        let mut rows = conn
            .query(
                "SELECT v.id, v.name, v.city, v.state, \
                 (SELECT COUNT(*) FROM shows s \
                  WHERE s.venue_id = v.id AND s.start_time >= ?1) \
                 FROM venues v \
                 WHERE lower(v.name) LIKE '%' || lower(?2) || '%' \
                 ORDER BY v.name",
                libsql::params![format_timestamp(now), term],
            )
            .await
            .map_err(|e| Self::db_err("Failed to search venues", e))?;

        let mut summaries = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
        {
            summaries.push(VenueSummary {
                id: Self::integer(&row, 0)?,
                name: Self::text(&row, 1)?,
                city: Self::text(&row, 2)?,
                state: Self::text(&row, 3)?,
                num_upcoming_shows: Self::integer(&row, 4)?,
            });
        }

        debug!("Venue search for '{}' matched {} records", term, summaries.len());
        Ok(summaries)
    }

    async fn create_artist(&self, artist: &mut Artist) -> Result<()> {
        if !artist.seeking_venue {
            artist.seeking_description = None;
        }

        let conn = self.db.get_connection().await?;
        let genres = serde_json::to_string(&artist.genres)?;

        conn.execute(
            "INSERT INTO artists (name, city, state, phone, image_link, \
             facebook_link, website, genres, seeking_venue, seeking_description) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            libsql::params![
                artist.name.clone(),
                artist.city.clone(),
                artist.state.clone(),
                artist.phone.clone(),
                artist.image_link.clone(),
                artist.facebook_link.clone(),
                artist.website.clone(),
                genres,
                i64::from(artist.seeking_venue),
                artist.seeking_description.clone(),
            ],
        )
        .await
        .map_err(|e| Self::db_err("Failed to insert artist", e))?;

        let id = conn.last_insert_rowid();
        artist.id = Some(id);

        info!("Created artist: {} with id {}", artist.name, id);
        Ok(())
    }

    async fn update_artist(&self, artist: &Artist) -> Result<()> {
        let artist_id = artist.id.ok_or_else(|| BookingError::Validation {
            message: "Cannot update an artist without an id".to_string(),
        })?;

        let seeking_description = if artist.seeking_venue {
            artist.seeking_description.clone()
        } else {
            None
        };

        let conn = self.db.get_connection().await?;
        let genres = serde_json::to_string(&artist.genres)?;

        let changed = conn
            .execute(
                "UPDATE artists SET name = ?1, city = ?2, state = ?3, phone = ?4, \
                 image_link = ?5, facebook_link = ?6, website = ?7, genres = ?8, \
                 seeking_venue = ?9, seeking_description = ?10 \
                 WHERE id = ?11",
                libsql::params![
                    artist.name.clone(),
                    artist.city.clone(),
                    artist.state.clone(),
                    artist.phone.clone(),
                    artist.image_link.clone(),
                    artist.facebook_link.clone(),
                    artist.website.clone(),
                    genres,
                    i64::from(artist.seeking_venue),
                    seeking_description,
                    artist_id,
                ],
            )
            .await
            .map_err(|e| Self::db_err("Failed to update artist", e))?;

        if changed == 0 {
            return Err(BookingError::NotFound {
                entity: "artist",
                id: artist_id,
            });
        }

        info!("Updated artist: {} with id {}", artist.name, artist_id);
        Ok(())
    }

    async fn get_artist_by_id(&self, artist_id: i64) -> Result<Option<Artist>> {
        let conn = self.db.get_connection().await?;

        let mut rows = conn
            .query(
                &format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?1"),
                libsql::params![artist_id],
            )
            .await
            .map_err(|e| Self::db_err("Failed to query artist", e))?;

        match rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
        {
            Some(row) => Ok(Some(Self::row_to_artist(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_all_artists(&self) -> Result<Vec<ArtistSummary>> {
        let conn = self.db.get_connection().await?;

        let mut rows = conn
            .query(
                "SELECT id, name FROM artists ORDER BY name",
                libsql::params![],
            )
            .await
            .map_err(|e| Self::db_err("Failed to query artists", e))?;

        let mut artists = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
        {
            artists.push(ArtistSummary {
                id: Self::integer(&row, 0)?,
                name: Self::text(&row, 1)?,
            });
        }

        Ok(artists)
    }

    async fn search_artists(&self, term: &str) -> Result<Vec<ArtistSummary>> {
        let conn = self.db.get_connection().await?;

        let mut rows = conn
            .query(
                "SELECT id, name FROM artists \
                 WHERE lower(name) LIKE '%' || lower(?1) || '%' \
                 ORDER BY name",
                libsql::params![term],
            )
            .await
            .map_err(|e| Self::db_err("Failed to search artists", e))?;

        let mut artists = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
        {
            artists.push(ArtistSummary {
                id: Self::integer(&row, 0)?,
                name: Self::text(&row, 1)?,
            });
        }

        debug!("Artist search for '{}' matched {} records", term, artists.len());
        Ok(artists)
    }

    async fn create_show(&self, show: &mut Show) -> Result<()> {
        let conn = self.db.get_connection().await?;

        // Check-then-insert runs in one transaction; an early return drops
        // the transaction and rolls back.
        let tx = conn
            .transaction()
            .await
            .map_err(|e| Self::db_err("Failed to begin transaction", e))?;

        let mut artist_rows = tx
            .query(
                "SELECT id FROM artists WHERE id = ?1",
                libsql::params![show.artist_id],
            )
            .await
            .map_err(|e| Self::db_err("Failed to query artist", e))?;
        if artist_rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
            .is_none()
        {
            return Err(BookingError::Validation {
                message: format!("No artist with id {} exists", show.artist_id),
            });
        }

        let mut venue_rows = tx
            .query(
                "SELECT id FROM venues WHERE id = ?1",
                libsql::params![show.venue_id],
            )
            .await
            .map_err(|e| Self::db_err("Failed to query venue", e))?;
        if venue_rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
            .is_none()
        {
            return Err(BookingError::Validation {
                message: format!("No venue with id {} exists", show.venue_id),
            });
        }

        tx.execute(
            "INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?1, ?2, ?3)",
            libsql::params![
                show.venue_id,
                show.artist_id,
                format_timestamp(show.start_time),
            ],
        )
        .await
        .map_err(|e| Self::db_err("Failed to insert show", e))?;

        let id = tx.last_insert_rowid();

        tx.commit()
            .await
            .map_err(|e| Self::db_err("Failed to commit show creation", e))?;

        show.id = Some(id);
        info!(
            "Created show {} linking venue {} and artist {}",
            id, show.venue_id, show.artist_id
        );
        Ok(())
    }

    async fn get_all_shows(&self) -> Result<Vec<ShowListing>> {
        let conn = self.db.get_connection().await?;

        let mut rows = conn
            .query(
                "SELECT s.venue_id, v.name, s.artist_id, a.name, a.image_link, s.start_time \
                 FROM shows s \
                 JOIN venues v ON v.id = s.venue_id \
                 JOIN artists a ON a.id = s.artist_id \
                 ORDER BY s.start_time DESC",
                libsql::params![],
            )
            .await
            .map_err(|e| Self::db_err("Failed to query shows", e))?;

        let mut shows = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
        {
            shows.push(ShowListing {
                venue_id: Self::integer(&row, 0)?,
                venue_name: Self::text(&row, 1)?,
                artist_id: Self::integer(&row, 2)?,
                artist_name: Self::text(&row, 3)?,
                artist_image_link: Self::opt_text(&row, 4)?,
                start_time: Self::timestamp(&row, 5)?,
            });
        }

        Ok(shows)
    }

    async fn shows_by_venue(&self, venue_id: i64) -> Result<Vec<ShowWithArtist>> {
        let conn = self.db.get_connection().await?;

        let mut rows = conn
            .query(
                "SELECT s.artist_id, a.name, a.image_link, s.start_time \
                 FROM shows s \
                 JOIN artists a ON a.id = s.artist_id \
                 WHERE s.venue_id = ?1 \
                 ORDER BY s.start_time",
                libsql::params![venue_id],
            )
            .await
            .map_err(|e| Self::db_err("Failed to query venue shows", e))?;

        let mut shows = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
        {
            shows.push(ShowWithArtist {
                artist_id: Self::integer(&row, 0)?,
                artist_name: Self::text(&row, 1)?,
                artist_image_link: Self::opt_text(&row, 2)?,
                start_time: Self::timestamp(&row, 3)?,
            });
        }

        Ok(shows)
    }

    async fn shows_by_artist(&self, artist_id: i64) -> Result<Vec<ShowWithVenue>> {
        let conn = self.db.get_connection().await?;

        let mut rows = conn
            .query(
                "SELECT s.venue_id, v.name, v.image_link, s.start_time \
                 FROM shows s \
                 JOIN venues v ON v.id = s.venue_id \
                 WHERE s.artist_id = ?1 \
                 ORDER BY s.start_time",
                libsql::params![artist_id],
            )
            .await
            .map_err(|e| Self::db_err("Failed to query artist shows", e))?;

        let mut shows = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| Self::db_err("Failed to read row", e))?
        {
            shows.push(ShowWithVenue {
                venue_id: Self::integer(&row, 0)?,
                venue_name: Self::text(&row, 1)?,
                venue_image_link: Self::opt_text(&row, 2)?,
                start_time: Self::timestamp(&row, 3)?,
            });
        }

        Ok(shows)
    }
}
