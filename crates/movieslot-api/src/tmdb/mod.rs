//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints and retrieves
//! movie listings, details, credits, keywords, reviews and images.

mod api;
mod client;
mod endpoint;
mod throttle;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, TmdbClient, TmdbClientBuilder,
};
pub use endpoint::{ApiEndpoint, Category};
pub use types::{
    AuthorDetails, CastMember, CategoryMovies, CrewMember, Genre, GenreList, ImageInfo,
    Keyword, ListedMovies, Movie, MovieCredits, MovieDetails, MovieImages, MovieKeywords,
    MoviePage, ProductionCompany, ProductionCountry, Review, ReviewPage, SpokenLanguage,
};
