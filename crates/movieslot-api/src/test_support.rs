//! In-memory `LocalTmdbApi` used by unit tests.
#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use anyhow::{Result, bail};
use serde::de::DeserializeOwned;

use crate::tmdb::{
    GenreList, LocalTmdbApi, Movie, MovieCredits, MovieDetails, MovieImages, MovieKeywords,
    MoviePage, ReviewPage,
};

/// Helper to create a minimal `Movie`.
pub fn make_movie(id: u64) -> Movie {
    Movie {
        id,
        title: format!("Movie {id}"),
        original_title: format!("Movie {id}"),
        original_language: String::from("en"),
        overview: None,
        release_date: None,
        popularity: 0.0,
        vote_average: 0.0,
        vote_count: 0,
        genre_ids: vec![],
        adult: false,
        video: false,
        poster_path: None,
        backdrop_path: None,
    }
}

/// Mock API recording every request and counting calls.
///
/// Listings return `per_page` sequential movies per page. Entity lookups
/// return payloads carrying only the requested id.
pub struct MockTmdbApi {
    pub total_pages: Option<u32>,
    pub per_page: u64,
    pub requests: Mutex<Vec<String>>,
    pub call_count: AtomicU32,
    fail_all: AtomicBool,
    fail_pages: Mutex<Vec<u32>>,
}

impl MockTmdbApi {
    pub fn new(total_pages: Option<u32>, per_page: u64) -> Self {
        Self {
            total_pages,
            per_page,
            requests: Mutex::new(vec![]),
            call_count: AtomicU32::new(0),
            fail_all: AtomicBool::new(false),
            fail_pages: Mutex::new(vec![]),
        }
    }

    /// Makes the next load of listing `page` fail once.
    pub fn fail_once(&self, page: u32) {
        self.fail_pages.lock().unwrap().push(page);
    }

    /// Makes every request fail with a 404 until reset.
    pub fn set_not_found(&self, not_found: bool) {
        self.fail_all.store(not_found, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn record(&self, request: String) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        if self.fail_all.load(Ordering::SeqCst) {
            bail!("API Error: 404 - Not Found");
        }
        Ok(())
    }

    fn page(&self, request: String, page: u32) -> Result<MoviePage> {
        self.record(request)?;
        let mut fail_pages = self.fail_pages.lock().unwrap();
        if let Some(pos) = fail_pages.iter().position(|&p| p == page) {
            fail_pages.remove(pos);
            bail!("API Error: 500 - Internal Server Error");
        }
        let first = u64::from(page - 1) * self.per_page + 1;
        Ok(MoviePage {
            page,
            results: (first..first + self.per_page).map(make_movie).collect(),
            total_pages: self.total_pages,
            total_results: None,
        })
    }

    fn entity<T: DeserializeOwned>(&self, request: String, movie_id: u64) -> Result<T> {
        self.record(request)?;
        Ok(serde_json::from_value(serde_json::json!({ "id": movie_id }))?)
    }
}

impl LocalTmdbApi for MockTmdbApi {
    async fn movie_list(&self, path: &str, page: u32) -> Result<MoviePage> {
        self.page(format!("{path}?page={page}"), page)
    }

    async fn discover_movies(&self, page: u32) -> Result<MoviePage> {
        self.page(format!("discover?page={page}"), page)
    }

    async fn genre_movies(&self, genre_id: u32, page: u32) -> Result<MoviePage> {
        self.page(format!("discover?page={page}&with_genres={genre_id}"), page)
    }

    async fn keyword_movies(&self, keyword: &str, page: u32) -> Result<MoviePage> {
        self.page(format!("discover?page={page}&query={keyword}"), page)
    }

    async fn genres(&self) -> Result<GenreList> {
        self.record(String::from("genre/movie/list"))?;
        Ok(serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/genre_movie_list.json"
        ))?)
    }

    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        self.entity(format!("movie/{movie_id}"), movie_id)
    }

    async fn movie_reviews(&self, movie_id: u64) -> Result<ReviewPage> {
        self.entity(format!("movie/{movie_id}/reviews"), movie_id)
    }

    async fn movie_keywords(&self, movie_id: u64) -> Result<MovieKeywords> {
        self.entity(format!("movie/{movie_id}/keywords"), movie_id)
    }

    async fn movie_credits(&self, movie_id: u64) -> Result<MovieCredits> {
        self.entity(format!("movie/{movie_id}/credits"), movie_id)
    }

    async fn similar_movies(&self, movie_id: u64) -> Result<MoviePage> {
        self.page(format!("movie/{movie_id}/similar?page=1"), 1)
    }

    async fn movie_images(&self, movie_id: u64) -> Result<MovieImages> {
        self.entity(format!("movie/{movie_id}/images"), movie_id)
    }
}
