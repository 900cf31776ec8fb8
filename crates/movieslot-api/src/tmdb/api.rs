//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    GenreList, MovieCredits, MovieDetails, MovieImages, MovieKeywords, MoviePage, ReviewPage,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches one page of a fixed listing such as `movie/popular`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_list(&self, path: &str, page: u32) -> Result<MoviePage>;

    /// Fetches one page of `discover/movie` without filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover_movies(&self, page: u32) -> Result<MoviePage>;

    /// Fetches one page of `discover/movie` filtered by genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genre_movies(&self, genre_id: u32, page: u32) -> Result<MoviePage>;

    /// Fetches one page of `discover/movie` filtered by a free-text keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn keyword_movies(&self, keyword: &str, page: u32) -> Result<MoviePage>;

    /// Fetches the movie genre list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genres(&self) -> Result<GenreList>;

    /// Fetches movie details.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails>;

    /// Fetches the first page of reviews for a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_reviews(&self, movie_id: u64) -> Result<ReviewPage>;

    /// Fetches keywords attached to a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_keywords(&self, movie_id: u64) -> Result<MovieKeywords>;

    /// Fetches cast and crew of a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_credits(&self, movie_id: u64) -> Result<MovieCredits>;

    /// Fetches the first page of movies similar to a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn similar_movies(&self, movie_id: u64) -> Result<MoviePage>;

    /// Fetches posters, backdrops and logos of a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_images(&self, movie_id: u64) -> Result<MovieImages>;
}
