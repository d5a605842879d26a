use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::Form;
use booking_core::BookingError;
use chrono::Utc;

use crate::error::WebResult;
use crate::models::{
    genre_options, group_by_area, ArtistForm, ArtistFormView, ArtistPage, SearchForm, ShowForm,
    ShowRow, VenueForm, VenueFormView, VenuePage,
};
use crate::state::AppState;
use crate::templates::{
    ArtistPageTemplate, ArtistsListTemplate, EditArtistTemplate, EditVenueTemplate, HomeTemplate,
    NewArtistTemplate, NewShowTemplate, NewVenueTemplate, NotFoundTemplate, SearchArtistsTemplate,
    SearchVenuesTemplate, ShowsListTemplate, VenuePageTemplate, VenuesListTemplate,
};

fn render_home(flash: Option<String>) -> Html<String> {
    let template = HomeTemplate { flash };
    Html(template.render().expect("Template rendering failed"))
}

pub async fn home() -> Html<String> {
    render_home(None)
}

//  Venues
//  ----------------------------------------------------------------

pub async fn venues_list(State(state): State<AppState>) -> WebResult<Html<String>> {
    let summaries = state.storage.venue_summaries(Utc::now()).await?;
    let template = VenuesListTemplate {
        areas: group_by_area(summaries),
    };
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn search_venues(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> WebResult<Html<String>> {
    let venues = state
        .storage
        .search_venues(&form.search_term, Utc::now())
        .await?;
    let template = SearchVenuesTemplate {
        search_term: form.search_term,
        count: venues.len(),
        venues,
    };
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn venue_page(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> WebResult<Html<String>> {
    let venue = state
        .storage
        .get_venue_by_id(venue_id)
        .await?
        .ok_or(BookingError::NotFound {
            entity: "venue",
            id: venue_id,
        })?;
    let shows = state.storage.shows_by_venue(venue_id).await?;

    let template = VenuePageTemplate {
        venue: VenuePage::assemble(venue_id, venue, shows, Utc::now()),
    };
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn create_venue_form() -> Html<String> {
    let template = NewVenueTemplate {
        genre_options: genre_options(&[]),
    };
    Html(template.render().expect("Template rendering failed"))
}

pub async fn create_venue_submission(
    State(state): State<AppState>,
    Form(form): Form<VenueForm>,
) -> WebResult<Html<String>> {
    let mut venue = form.into_venue(None);
    state.storage.create_venue(&mut venue).await?;
    Ok(render_home(Some(format!(
        "Venue {} was successfully listed!",
        venue.name
    ))))
}

pub async fn edit_venue_form(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> WebResult<Html<String>> {
    let venue = state
        .storage
        .get_venue_by_id(venue_id)
        .await?
        .ok_or(BookingError::NotFound {
            entity: "venue",
            id: venue_id,
        })?;
    let template = EditVenueTemplate {
        venue: VenueFormView::from_venue(venue_id, venue),
    };
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn edit_venue_submission(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
    Form(form): Form<VenueForm>,
) -> WebResult<Redirect> {
    let venue = form.into_venue(Some(venue_id));
    state.storage.update_venue(&venue).await?;
    Ok(Redirect::to(&format!("/venues/{venue_id}")))
}

pub async fn delete_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> WebResult<Html<String>> {
    let venue = state.storage.delete_venue(venue_id).await?;
    Ok(render_home(Some(format!(
        "Venue {} was successfully deleted!",
        venue.name
    ))))
}

//  Artists
//  ----------------------------------------------------------------

pub async fn artists_list(State(state): State<AppState>) -> WebResult<Html<String>> {
    let artists = state.storage.get_all_artists().await?;
    let template = ArtistsListTemplate { artists };
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn search_artists(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> WebResult<Html<String>> {
    let artists = state.storage.search_artists(&form.search_term).await?;
    let template = SearchArtistsTemplate {
        search_term: form.search_term,
        count: artists.len(),
        artists,
    };
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn artist_page(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> WebResult<Html<String>> {
    let artist = state
        .storage
        .get_artist_by_id(artist_id)
        .await?
        .ok_or(BookingError::NotFound {
            entity: "artist",
            id: artist_id,
        })?;
    let shows = state.storage.shows_by_artist(artist_id).await?;

    let template = ArtistPageTemplate {
        artist: ArtistPage::assemble(artist_id, artist, shows, Utc::now()),
    };
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn create_artist_form() -> Html<String> {
    let template = NewArtistTemplate {
        genre_options: genre_options(&[]),
    };
    Html(template.render().expect("Template rendering failed"))
}

pub async fn create_artist_submission(
    State(state): State<AppState>,
    Form(form): Form<ArtistForm>,
) -> WebResult<Html<String>> {
    let mut artist = form.into_artist(None);
    state.storage.create_artist(&mut artist).await?;
    Ok(render_home(Some(format!(
        "Artist {} was successfully listed!",
        artist.name
    ))))
}

pub async fn edit_artist_form(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> WebResult<Html<String>> {
    let artist = state
        .storage
        .get_artist_by_id(artist_id)
        .await?
        .ok_or(BookingError::NotFound {
            entity: "artist",
            id: artist_id,
        })?;
    let template = EditArtistTemplate {
        artist: ArtistFormView::from_artist(artist_id, artist),
    };
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn edit_artist_submission(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
    Form(form): Form<ArtistForm>,
) -> WebResult<Redirect> {
    let artist = form.into_artist(Some(artist_id));
    state.storage.update_artist(&artist).await?;
    Ok(Redirect::to(&format!("/artists/{artist_id}")))
}

//  Shows
//  ----------------------------------------------------------------

pub async fn shows_list(State(state): State<AppState>) -> WebResult<Html<String>> {
    let shows = state.storage.get_all_shows().await?;
    let template = ShowsListTemplate {
        shows: shows.into_iter().map(ShowRow::from).collect(),
    };
    Ok(Html(template.render().expect("Template rendering failed")))
}

pub async fn create_show_form() -> Html<String> {
    let template = NewShowTemplate { flash: None };
    Html(template.render().expect("Template rendering failed"))
}

fn show_form_rejected(message: String) -> Response {
    let template = NewShowTemplate {
        flash: Some(message),
    };
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(template.render().expect("Template rendering failed")),
    )
        .into_response()
}

pub async fn create_show_submission(
    State(state): State<AppState>,
    Form(form): Form<ShowForm>,
) -> WebResult<Response> {
    let mut show = match form.to_show() {
        Ok(show) => show,
        Err(BookingError::Validation { message }) => return Ok(show_form_rejected(message)),
        Err(err) => return Err(err.into()),
    };

    match state.storage.create_show(&mut show).await {
        Ok(()) => {
            Ok(render_home(Some("Show was successfully listed!".to_string())).into_response())
        }
        Err(BookingError::Validation { message }) => Ok(show_form_rejected(message)),
        Err(err) => Err(err.into()),
    }
}

//  Errors
//  ----------------------------------------------------------------

pub async fn not_found() -> Response {
    let body = NotFoundTemplate.render().expect("Template rendering failed");
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}
