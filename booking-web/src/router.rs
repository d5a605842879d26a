use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::handlers::{
    artist_page, artists_list, create_artist_form, create_artist_submission, create_show_form,
    create_show_submission, create_venue_form, create_venue_submission, delete_venue,
    edit_artist_form, edit_artist_submission, edit_venue_form, edit_venue_submission, home,
    not_found, search_artists, search_venues, shows_list, venue_page, venues_list,
};
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/venues", get(venues_list))
        .route("/venues/search", post(search_venues))
        .route(
            "/venues/create",
            get(create_venue_form).post(create_venue_submission),
        )
        .route("/venues/:venue_id", get(venue_page).delete(delete_venue))
        .route(
            "/venues/:venue_id/edit",
            get(edit_venue_form).post(edit_venue_submission),
        )
        .route("/artists", get(artists_list))
        .route("/artists/search", post(search_artists))
        .route(
            "/artists/create",
            get(create_artist_form).post(create_artist_submission),
        )
        .route("/artists/:artist_id", get(artist_page))
        .route(
            "/artists/:artist_id/edit",
            get(edit_artist_form).post(edit_artist_submission),
        )
        .route("/shows", get(shows_list))
        .route(
            "/shows/create",
            get(create_show_form).post(create_show_submission),
        )
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)
        .with_state(state)
}
