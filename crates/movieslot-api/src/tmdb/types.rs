//! TMDB API response types.

use serde::{Deserialize, Serialize};

// --- Movie listings ---

/// Paged envelope returned by list endpoints (`movie/popular`, `discover/movie`, ...).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MoviePage {
    /// Current page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Movies on this page, in server order.
    #[serde(default)]
    pub results: Vec<Movie>,
    /// Total number of pages (absent on some endpoints).
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Total number of results.
    #[serde(default)]
    pub total_results: Option<u32>,
}

const fn first_page() -> u32 {
    1
}

/// A movie list entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// Movies of one home category, keyed by the category path.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMovies {
    /// Category path (e.g. `movie/popular`).
    pub category: String,
    /// Movies of the first page.
    pub movies: Vec<Movie>,
}

/// Details of a movie requested for a user list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedMovies {
    /// Requested movie ID.
    pub id: u64,
    /// Fetched details.
    pub movies: Vec<MovieDetails>,
}

// --- Genres ---

/// Response from `genre/movie/list`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenreList {
    /// All movie genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Movie details ---

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Release status (e.g. "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Budget in USD.
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD.
    #[serde(default)]
    pub revenue: u64,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
    /// IMDb ID.
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Production companies.
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    /// Production countries.
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    /// Spoken languages.
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// Production company entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductionCompany {
    /// Company ID.
    pub id: u64,
    /// Company name.
    pub name: String,
    /// Logo image path.
    #[serde(default)]
    pub logo_path: Option<String>,
    /// Origin country (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Option<String>,
}

/// Production country entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductionCountry {
    /// ISO 3166-1 code.
    pub iso_3166_1: String,
    /// Country name.
    pub name: String,
}

/// Spoken language entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpokenLanguage {
    /// English name.
    #[serde(default)]
    pub english_name: String,
    /// ISO 639-1 code.
    pub iso_639_1: String,
    /// Native name.
    #[serde(default)]
    pub name: String,
}

// --- Reviews ---

/// Response from `movie/{movie_id}/reviews`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReviewPage {
    /// Movie ID.
    pub id: u64,
    /// Current page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Reviews on this page.
    #[serde(default)]
    pub results: Vec<Review>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Total number of results.
    #[serde(default)]
    pub total_results: Option<u32>,
}

/// A single review.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Review {
    /// Review ID.
    pub id: String,
    /// Author display name.
    pub author: String,
    /// Author details.
    #[serde(default)]
    pub author_details: Option<AuthorDetails>,
    /// Review body.
    #[serde(default)]
    pub content: String,
    /// Creation timestamp (ISO 8601).
    #[serde(default)]
    pub created_at: Option<String>,
    /// Update timestamp (ISO 8601).
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Review URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// Review author details.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthorDetails {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Username.
    #[serde(default)]
    pub username: String,
    /// Avatar image path.
    #[serde(default)]
    pub avatar_path: Option<String>,
    /// Rating given by the author (0-10).
    #[serde(default)]
    pub rating: Option<f64>,
}

// --- Keywords ---

/// Response from `movie/{movie_id}/keywords`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MovieKeywords {
    /// Movie ID.
    pub id: u64,
    /// Keywords attached to the movie.
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

/// Keyword entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Keyword {
    /// Keyword ID.
    pub id: u64,
    /// Keyword text.
    pub name: String,
}

// --- Credits ---

/// Response from `movie/{movie_id}/credits`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieCredits {
    /// Movie ID.
    pub id: u64,
    /// Cast members ordered by billing.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew members.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Cast member.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CastMember {
    /// Person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Credit ID.
    #[serde(default)]
    pub credit_id: String,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
    /// Department the person is known for.
    #[serde(default)]
    pub known_for_department: Option<String>,
    /// Gender code (0 = unset).
    #[serde(default)]
    pub gender: u8,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
}

/// Crew member.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CrewMember {
    /// Person ID.
    pub id: u64,
    /// Name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: String,
    /// Department (e.g. "Directing").
    #[serde(default)]
    pub department: String,
    /// Job (e.g. "Director").
    #[serde(default)]
    pub job: String,
    /// Credit ID.
    #[serde(default)]
    pub credit_id: String,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

// --- Images ---

/// Response from `movie/{movie_id}/images`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieImages {
    /// Movie ID.
    pub id: u64,
    /// Backdrop images.
    #[serde(default)]
    pub backdrops: Vec<ImageInfo>,
    /// Logo images.
    #[serde(default)]
    pub logos: Vec<ImageInfo>,
    /// Poster images.
    #[serde(default)]
    pub posters: Vec<ImageInfo>,
}

/// Image metadata.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImageInfo {
    /// Image path relative to the image CDN.
    pub file_path: String,
    /// Aspect ratio.
    #[serde(default)]
    pub aspect_ratio: f64,
    /// Width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Height in pixels.
    #[serde(default)]
    pub height: u32,
    /// Language (ISO 639-1), if text is present.
    #[serde(default)]
    pub iso_639_1: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    #[allow(dead_code)]
    pub success: bool,
}
