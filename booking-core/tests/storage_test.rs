use anyhow::Result;
use booking_core::storage::{DatabaseStorage, Storage};
use booking_core::{Artist, BookingError, DatabaseManager, Show, Venue};
use chrono::{Duration, Utc};
use tempfile::tempdir;

async fn test_storage(dir: &tempfile::TempDir) -> Result<DatabaseStorage> {
    let path = dir.path().join("booking.db");
    let db = DatabaseManager::new_local(path.to_str().unwrap()).await?;
    db.run_migrations().await?;
    Ok(DatabaseStorage::new(db))
}

fn sample_venue(name: &str, city: &str, state: &str) -> Venue {
    Venue {
        id: None,
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: Some("1 Main St".to_string()),
        phone: Some("512-555-0100".to_string()),
        image_link: None,
        facebook_link: None,
        website: None,
        genres: vec!["Jazz".to_string()],
        seeking_talent: false,
        seeking_description: None,
    }
}

fn sample_artist(name: &str) -> Artist {
    Artist {
        id: None,
        name: name.to_string(),
        city: "Seattle".to_string(),
        state: "WA".to_string(),
        phone: None,
        image_link: Some("https://example.com/nina.jpg".to_string()),
        facebook_link: None,
        website: None,
        genres: vec!["Soul".to_string()],
        seeking_venue: false,
        seeking_description: None,
    }
}

#[tokio::test]
async fn venue_roundtrip_and_full_replace_edit() -> Result<()> {
    let dir = tempdir()?;
    let storage = test_storage(&dir).await?;

    let mut venue = sample_venue("Joe's Bar", "Austin", "TX");
    storage.create_venue(&mut venue).await?;
    let id = venue.id.unwrap();

    let fetched = storage.get_venue_by_id(id).await?.unwrap();
    assert_eq!(fetched.name, "Joe's Bar");
    assert_eq!(fetched.city, "Austin");
    assert_eq!(fetched.genres, vec!["Jazz".to_string()]);
    assert_eq!(fetched.address.as_deref(), Some("1 Main St"));

    // Edit overwrites every field, including ones set back to empty
    let replacement = Venue {
        id: Some(id),
        name: "Joe's Tavern".to_string(),
        city: "Dallas".to_string(),
        state: "TX".to_string(),
        address: None,
        phone: None,
        image_link: None,
        facebook_link: None,
        website: None,
        genres: vec!["Blues".to_string(), "Soul".to_string()],
        seeking_talent: true,
        seeking_description: Some("weekend acts".to_string()),
    };
    storage.update_venue(&replacement).await?;

    let fetched = storage.get_venue_by_id(id).await?.unwrap();
    assert_eq!(fetched.name, "Joe's Tavern");
    assert_eq!(fetched.city, "Dallas");
    assert_eq!(fetched.address, None);
    assert_eq!(fetched.genres.len(), 2);
    assert_eq!(fetched.seeking_description.as_deref(), Some("weekend acts"));

    // Updating a record that does not exist reports NotFound
    let missing = Venue {
        id: Some(9999),
        ..replacement
    };
    assert!(matches!(
        storage.update_venue(&missing).await,
        Err(BookingError::NotFound { .. })
    ));

    Ok(())
}

#[tokio::test]
async fn seeking_description_is_cleared_whenever_flag_is_false() -> Result<()> {
    let dir = tempdir()?;
    let storage = test_storage(&dir).await?;

    // A description slipping in alongside a false flag is dropped on create
    let mut venue = sample_venue("The Loft", "Austin", "TX");
    venue.seeking_description = Some("should never persist".to_string());
    storage.create_venue(&mut venue).await?;
    let id = venue.id.unwrap();

    let fetched = storage.get_venue_by_id(id).await?.unwrap();
    assert!(!fetched.seeking_talent);
    assert_eq!(fetched.seeking_description, None);

    // Turning the flag on stores the description, turning it off clears it
    let mut seeking = fetched.clone();
    seeking.seeking_talent = true;
    seeking.seeking_description = Some("jazz trios wanted".to_string());
    storage.update_venue(&seeking).await?;
    let fetched = storage.get_venue_by_id(id).await?.unwrap();
    assert_eq!(
        fetched.seeking_description.as_deref(),
        Some("jazz trios wanted")
    );

    let mut stopped = fetched.clone();
    stopped.seeking_talent = false;
    storage.update_venue(&stopped).await?;
    let fetched = storage.get_venue_by_id(id).await?.unwrap();
    assert_eq!(fetched.seeking_description, None);

    // Same rule on the artist side
    let mut artist = sample_artist("Nina");
    artist.seeking_description = Some("should never persist".to_string());
    storage.create_artist(&mut artist).await?;
    let fetched = storage
        .get_artist_by_id(artist.id.unwrap())
        .await?
        .unwrap();
    assert_eq!(fetched.seeking_description, None);

    Ok(())
}

#[tokio::test]
async fn search_is_case_insensitive_substring_and_empty_matches_all() -> Result<()> {
    let dir = tempdir()?;
    let storage = test_storage(&dir).await?;

    let now = Utc::now();
    for name in ["Alice's Venue", "The Dive", "Palisade Hall"] {
        let mut venue = sample_venue(name, "Austin", "TX");
        storage.create_venue(&mut venue).await?;
    }

    let matched = storage.search_venues("ALI", now).await?;
    let names: Vec<&str> = matched.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Alice's Venue", "Palisade Hall"]);

    let all = storage.search_venues("", now).await?;
    assert_eq!(all.len(), 3);

    let mut artist = sample_artist("Nina Simone");
    storage.create_artist(&mut artist).await?;
    let matched = storage.search_artists("simone").await?;
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Nina Simone");
    assert_eq!(storage.search_artists("").await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn venue_summaries_are_area_sorted_with_upcoming_counts() -> Result<()> {
    let dir = tempdir()?;
    let storage = test_storage(&dir).await?;

    // Insert in shuffled order; the query sorts by (state, city, name)
    let mut seattle = sample_venue("Blue Note", "Seattle", "WA");
    storage.create_venue(&mut seattle).await?;
    let mut austin_b = sample_venue("Mohawk", "Austin", "TX");
    storage.create_venue(&mut austin_b).await?;
    let mut austin_a = sample_venue("The Loft", "Austin", "TX");
    storage.create_venue(&mut austin_a).await?;

    let mut artist = sample_artist("Nina");
    storage.create_artist(&mut artist).await?;

    let now = Utc::now();
    // One future and one past show for the Seattle venue
    for offset in [Duration::hours(1), Duration::hours(-1)] {
        let mut show = Show {
            id: None,
            venue_id: seattle.id.unwrap(),
            artist_id: artist.id.unwrap(),
            start_time: now + offset,
        };
        storage.create_show(&mut show).await?;
    }

    let summaries = storage.venue_summaries(now).await?;
    let keys: Vec<(&str, &str, &str)> = summaries
        .iter()
        .map(|s| (s.state.as_str(), s.city.as_str(), s.name.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("TX", "Austin", "Mohawk"),
            ("TX", "Austin", "The Loft"),
            ("WA", "Seattle", "Blue Note"),
        ]
    );

    assert_eq!(summaries[0].num_upcoming_shows, 0);
    assert_eq!(summaries[2].num_upcoming_shows, 1);

    Ok(())
}

#[tokio::test]
async fn show_creation_rejects_dangling_references() -> Result<()> {
    let dir = tempdir()?;
    let storage = test_storage(&dir).await?;

    let mut venue = sample_venue("The Loft", "Austin", "TX");
    storage.create_venue(&mut venue).await?;

    let mut show = Show {
        id: None,
        venue_id: venue.id.unwrap(),
        artist_id: 42,
        start_time: Utc::now() + Duration::hours(1),
    };
    let err = storage.create_show(&mut show).await.unwrap_err();
    assert!(matches!(err, BookingError::Validation { .. }));
    assert!(err.to_string().contains("42"));

    let mut artist = sample_artist("Nina");
    storage.create_artist(&mut artist).await?;
    let mut show = Show {
        id: None,
        venue_id: 777,
        artist_id: artist.id.unwrap(),
        start_time: Utc::now() + Duration::hours(1),
    };
    assert!(matches!(
        storage.create_show(&mut show).await,
        Err(BookingError::Validation { .. })
    ));

    // Nothing was persisted by either attempt
    assert!(storage.get_all_shows().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn deleting_a_venue_cascades_to_its_shows() -> Result<()> {
    let dir = tempdir()?;
    let storage = test_storage(&dir).await?;

    let mut venue = sample_venue("The Loft", "Austin", "TX");
    storage.create_venue(&mut venue).await?;
    let mut artist = sample_artist("Nina");
    storage.create_artist(&mut artist).await?;

    let mut show = Show {
        id: None,
        venue_id: venue.id.unwrap(),
        artist_id: artist.id.unwrap(),
        start_time: Utc::now() + Duration::hours(1),
    };
    storage.create_show(&mut show).await?;
    assert_eq!(storage.get_all_shows().await?.len(), 1);

    let deleted = storage.delete_venue(venue.id.unwrap()).await?;
    assert_eq!(deleted.name, "The Loft");

    assert!(storage.get_venue_by_id(venue.id.unwrap()).await?.is_none());
    assert!(storage.get_all_shows().await?.is_empty());
    // The artist is untouched
    assert!(storage
        .get_artist_by_id(artist.id.unwrap())
        .await?
        .is_some());

    // Deleting an id that does not exist is NotFound and changes nothing
    assert!(matches!(
        storage.delete_venue(9999).await,
        Err(BookingError::NotFound { .. })
    ));
    assert_eq!(storage.get_all_artists().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn detail_show_joins_carry_the_other_party() -> Result<()> {
    let dir = tempdir()?;
    let storage = test_storage(&dir).await?;

    let mut venue = sample_venue("The Loft", "Austin", "TX");
    storage.create_venue(&mut venue).await?;
    let mut artist = sample_artist("Nina");
    storage.create_artist(&mut artist).await?;

    let start = Utc::now() + Duration::hours(2);
    let mut show = Show {
        id: None,
        venue_id: venue.id.unwrap(),
        artist_id: artist.id.unwrap(),
        start_time: start,
    };
    storage.create_show(&mut show).await?;

    let venue_shows = storage.shows_by_venue(venue.id.unwrap()).await?;
    assert_eq!(venue_shows.len(), 1);
    assert_eq!(venue_shows[0].artist_name, "Nina");
    assert_eq!(
        venue_shows[0].artist_image_link.as_deref(),
        Some("https://example.com/nina.jpg")
    );
    // Stored at second precision
    assert_eq!(
        venue_shows[0].start_time.timestamp(),
        start.timestamp()
    );

    let artist_shows = storage.shows_by_artist(artist.id.unwrap()).await?;
    assert_eq!(artist_shows.len(), 1);
    assert_eq!(artist_shows[0].venue_name, "The Loft");

    let listings = storage.get_all_shows().await?;
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].artist_name, "Nina");
    assert_eq!(listings[0].venue_name, "The Loft");

    Ok(())
}
