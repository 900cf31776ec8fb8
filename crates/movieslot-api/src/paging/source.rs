//! Page-cursor sources for TMDB movie listings.
#![allow(clippy::future_not_send)]

use std::fmt;
use std::sync::Arc;

use tracing::instrument;

use crate::tmdb::{LocalTmdbApi, Movie};

/// Parameters of a single page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadParams {
    /// Page to load; `None` requests the first page.
    pub key: Option<u32>,
    /// Requested number of items. TMDB pages are fixed-size, so this is advisory.
    pub load_size: u32,
}

/// One loaded page with its neighbouring cursors.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items of this page in server order.
    pub items: Vec<T>,
    /// Cursor of the previous page, `None` on the first page.
    pub prev_key: Option<u32>,
    /// Cursor of the next page, `None` on the last page.
    pub next_key: Option<u32>,
}

/// Outcome of a page load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult<T> {
    /// The page was loaded.
    Page(Page<T>),
    /// The load failed; the caller may retry.
    Error(String),
}

/// Loaded pages and the last position viewed by the consumer.
#[derive(Debug, Clone, Copy)]
pub struct PagingState<'a, T> {
    /// Pages in list order.
    pub pages: &'a [Page<T>],
    /// Index of the most recently viewed item across all pages.
    pub anchor_position: Option<usize>,
}

impl<T> PagingState<'_, T> {
    /// Page holding the item at `position`, or the last page when past the end.
    #[must_use]
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page<T>> {
        let mut start = 0usize;
        for page in self.pages {
            let end = start.saturating_add(page.items.len());
            if position < end {
                return Some(page);
            }
            start = end;
        }
        self.pages.last()
    }
}

/// Treats a missing or zero page count as a single page.
#[must_use]
pub fn effective_total_pages(total_pages: Option<u32>) -> u32 {
    total_pages.filter(|&n| n > 0).unwrap_or(1)
}

/// Cursor of the page before `page`.
#[must_use]
pub fn prev_key(page: u32) -> Option<u32> {
    if page <= 1 { None } else { page.checked_sub(1) }
}

/// Cursor of the page after `page`, given the server-reported page count.
#[must_use]
pub fn next_key(page: u32, total_pages: Option<u32>) -> Option<u32> {
    if page < effective_total_pages(total_pages) {
        page.checked_add(1)
    } else {
        None
    }
}

/// Page to restart from after invalidation.
///
/// Uses the page adjacent to the anchor: `prev_key + 1`, else `next_key - 1`.
/// `None` restarts from the first page.
#[must_use]
pub fn refresh_key<T>(state: &PagingState<'_, T>) -> Option<u32> {
    let anchor = state.anchor_position?;
    let page = state.closest_page_to_position(anchor)?;
    page.prev_key
        .and_then(|key| key.checked_add(1))
        .or_else(|| page.next_key.and_then(|key| key.checked_sub(1)))
}

/// Source of movie pages.
///
/// Abstracts page loading for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(PagingSource: Send)]
pub trait LocalPagingSource {
    /// Loads one page. Issues exactly one request and never retries.
    async fn load(&self, params: LoadParams) -> LoadResult<Movie>;

    /// Page to restart from when the consumer re-anchors pagination.
    fn refresh_key(&self, state: &PagingState<'_, Movie>) -> Option<u32>;
}

/// Filter carried by a movie listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovieFilter {
    /// Fixed listing path such as `movie/popular`.
    Category(String),
    /// Unfiltered `discover/movie`.
    Discover,
    /// `discover/movie` restricted to a genre.
    Genre(u32),
    /// `discover/movie` matched against free text.
    Keyword(String),
}

impl fmt::Display for MovieFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(path) => write!(f, "category:{path}"),
            Self::Discover => f.write_str("discover"),
            Self::Genre(id) => write!(f, "genre:{id}"),
            Self::Keyword(keyword) => write!(f, "keyword:{keyword}"),
        }
    }
}

/// Paging source over a TMDB movie listing.
#[derive(Debug)]
pub struct MoviePagingSource<A> {
    api: Arc<A>,
    filter: MovieFilter,
}

impl<A> MoviePagingSource<A> {
    /// Creates a source for the given listing.
    pub const fn new(api: Arc<A>, filter: MovieFilter) -> Self {
        Self { api, filter }
    }

    /// Listing this source pages through.
    #[must_use]
    pub const fn filter(&self) -> &MovieFilter {
        &self.filter
    }
}

impl<A: LocalTmdbApi> LocalPagingSource for MoviePagingSource<A> {
    #[instrument(skip_all, fields(filter = %self.filter))]
    async fn load(&self, params: LoadParams) -> LoadResult<Movie> {
        let page = params.key.unwrap_or(1).max(1);
        tracing::debug!(page, load_size = params.load_size, "loading page");

        let result = match &self.filter {
            MovieFilter::Category(path) => self.api.movie_list(path, page).await,
            MovieFilter::Discover => self.api.discover_movies(page).await,
            MovieFilter::Genre(genre_id) => self.api.genre_movies(*genre_id, page).await,
            MovieFilter::Keyword(keyword) => self.api.keyword_movies(keyword, page).await,
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(page, error = %format!("{err:#}"), "page load failed");
                return LoadResult::Error(format!("{err:#}"));
            }
        };

        let prev = prev_key(page);
        let next = next_key(page, response.total_pages);
        tracing::info!(
            page,
            fetched = response.results.len(),
            total_pages = effective_total_pages(response.total_pages),
            first_id = response.results.first().map(|m| m.id),
            last_id = response.results.last().map(|m| m.id),
            "page loaded"
        );
        tracing::debug!(page, prev_key = ?prev, next_key = ?next, "page cursors");

        LoadResult::Page(Page {
            items: response.results,
            prev_key: prev,
            next_key: next,
        })
    }

    fn refresh_key(&self, state: &PagingState<'_, Movie>) -> Option<u32> {
        let key = refresh_key(state);
        tracing::debug!(refresh_key = ?key, "refresh key computed");
        key
    }
}
