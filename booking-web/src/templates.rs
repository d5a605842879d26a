use askama::Template;

use crate::models::{
    Area, ArtistFormView, ArtistPage, GenreOption, ShowRow, VenueFormView, VenuePage,
};
use booking_core::{ArtistSummary, VenueSummary};

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub flash: Option<String>,
}

#[derive(Template)]
#[template(path = "venues.html")]
pub struct VenuesListTemplate {
    pub areas: Vec<Area>,
}

#[derive(Template)]
#[template(path = "search_venues.html")]
pub struct SearchVenuesTemplate {
    pub search_term: String,
    pub count: usize,
    pub venues: Vec<VenueSummary>,
}

#[derive(Template)]
#[template(path = "show_venue.html")]
pub struct VenuePageTemplate {
    pub venue: VenuePage,
}

#[derive(Template)]
#[template(path = "new_venue.html")]
pub struct NewVenueTemplate {
    pub genre_options: Vec<GenreOption>,
}

#[derive(Template)]
#[template(path = "edit_venue.html")]
pub struct EditVenueTemplate {
    pub venue: VenueFormView,
}

#[derive(Template)]
#[template(path = "artists.html")]
pub struct ArtistsListTemplate {
    pub artists: Vec<ArtistSummary>,
}

#[derive(Template)]
#[template(path = "search_artists.html")]
pub struct SearchArtistsTemplate {
    pub search_term: String,
    pub count: usize,
    pub artists: Vec<ArtistSummary>,
}

#[derive(Template)]
#[template(path = "show_artist.html")]
pub struct ArtistPageTemplate {
    pub artist: ArtistPage,
}

#[derive(Template)]
#[template(path = "new_artist.html")]
pub struct NewArtistTemplate {
    pub genre_options: Vec<GenreOption>,
}

#[derive(Template)]
#[template(path = "edit_artist.html")]
pub struct EditArtistTemplate {
    pub artist: ArtistFormView,
}

#[derive(Template)]
#[template(path = "shows.html")]
pub struct ShowsListTemplate {
    pub shows: Vec<ShowRow>,
}

#[derive(Template)]
#[template(path = "new_show.html")]
pub struct NewShowTemplate {
    pub flash: Option<String>,
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate;

#[derive(Template)]
#[template(path = "500.html")]
pub struct ServerErrorTemplate;
