//! Cached catalog of TMDB resources.
#![allow(clippy::future_not_send)]

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use tokio::sync::watch;
use tracing::instrument;

use super::cache::ResponseCache;
use super::state::KeyedState;
use crate::paging::{MovieFilter, MoviePagingSource, Pager, PagingConfig};
use crate::resource::Resource;
use crate::tmdb::{
    Category, CategoryMovies, GenreList, ListedMovies, LocalTmdbApi, MovieCredits, MovieDetails,
    MovieImages, MovieKeywords, MoviePage, ReviewPage,
};

/// First load size of the discover listing.
pub const DISCOVER_INITIAL_LOAD_SIZE: u32 = 5;

/// Observable catalog of movie listings and per-movie resources.
///
/// Category listings, genres, details and reviews are cached for the
/// lifetime of the catalog. Keywords, credits, similar movies, images and
/// user-list lookups always hit the network. Every fetch publishes its
/// tagged result on the channel of its resource family.
#[derive(Debug)]
pub struct Catalog<A> {
    api: Arc<A>,
    paging: PagingConfig,
    movies: KeyedState<String, CategoryMovies>,
    movies_cache: ResponseCache<String, CategoryMovies>,
    genres: watch::Sender<Resource<GenreList>>,
    genres_cache: ResponseCache<(), GenreList>,
    details: watch::Sender<Resource<MovieDetails>>,
    details_cache: ResponseCache<u64, MovieDetails>,
    reviews: watch::Sender<Resource<ReviewPage>>,
    reviews_cache: ResponseCache<u64, ReviewPage>,
    keywords: watch::Sender<Resource<MovieKeywords>>,
    credits: watch::Sender<Resource<MovieCredits>>,
    similar: watch::Sender<Resource<MoviePage>>,
    images: watch::Sender<Resource<MovieImages>>,
    listed: KeyedState<u64, ListedMovies>,
}

fn channel<T>() -> watch::Sender<Resource<T>> {
    watch::channel(Resource::Loading).0
}

/// Runs `request` without caching, publishing `Loading` then the outcome.
async fn fetch_uncached<T: Clone>(
    tx: &watch::Sender<Resource<T>>,
    request: impl Future<Output = Result<T>>,
) -> Resource<T> {
    tx.send_replace(Resource::Loading);
    let resource = match request.await {
        Ok(value) => Resource::Success(value),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "fetch failed");
            Resource::error(&err, None)
        }
    };
    tx.send_replace(resource.clone());
    resource
}

impl<A: LocalTmdbApi> Catalog<A> {
    /// Creates an empty catalog over `api`.
    pub fn new(api: Arc<A>, paging: PagingConfig) -> Self {
        Self {
            api,
            paging,
            movies: KeyedState::new(),
            movies_cache: ResponseCache::new(),
            genres: channel(),
            genres_cache: ResponseCache::new(),
            details: channel(),
            details_cache: ResponseCache::new(),
            reviews: channel(),
            reviews_cache: ResponseCache::new(),
            keywords: channel(),
            credits: channel(),
            similar: channel(),
            images: channel(),
            listed: KeyedState::new(),
        }
    }

    /// Page sizing used by the pager factories.
    pub const fn paging_config(&self) -> PagingConfig {
        self.paging
    }

    /// Category listings keyed by category path.
    pub fn movies(&self) -> watch::Receiver<HashMap<String, Resource<CategoryMovies>>> {
        self.movies.subscribe()
    }

    /// Genre list.
    pub fn genres(&self) -> watch::Receiver<Resource<GenreList>> {
        self.genres.subscribe()
    }

    /// Details of the most recently requested movie.
    pub fn movie_details(&self) -> watch::Receiver<Resource<MovieDetails>> {
        self.details.subscribe()
    }

    /// Reviews of the most recently requested movie.
    pub fn reviews(&self) -> watch::Receiver<Resource<ReviewPage>> {
        self.reviews.subscribe()
    }

    /// Keywords of the most recently requested movie.
    pub fn keywords(&self) -> watch::Receiver<Resource<MovieKeywords>> {
        self.keywords.subscribe()
    }

    /// Credits of the most recently requested movie.
    pub fn credits(&self) -> watch::Receiver<Resource<MovieCredits>> {
        self.credits.subscribe()
    }

    /// Movies similar to the most recently requested movie.
    pub fn similar_movies(&self) -> watch::Receiver<Resource<MoviePage>> {
        self.similar.subscribe()
    }

    /// Images of the most recently requested movie.
    pub fn images(&self) -> watch::Receiver<Resource<MovieImages>> {
        self.images.subscribe()
    }

    /// User-list movies keyed by movie ID.
    pub fn listed_movies(&self) -> watch::Receiver<HashMap<u64, Resource<ListedMovies>>> {
        self.listed.subscribe()
    }

    /// Fetches the first page of the listing at `category`.
    #[instrument(skip(self))]
    pub async fn fetch_movies(&self, category: &str, force_reload: bool) -> Resource<CategoryMovies> {
        let key = category.to_owned();
        let request = async {
            let page = self.api.movie_list(category, 1).await?;
            anyhow::Ok(CategoryMovies {
                category: category.to_owned(),
                movies: page.results,
            })
        };
        self.movies_cache
            .fetch(
                key.clone(),
                force_reload,
                |resource| self.movies.publish(key.clone(), resource),
                request,
            )
            .await
    }

    /// Fetches every category concurrently, in the given order.
    #[instrument(skip_all, fields(count = categories.len()))]
    pub async fn fetch_all(
        &self,
        categories: &[Category],
        force_reload: bool,
    ) -> Vec<Resource<CategoryMovies>> {
        let paths: Vec<String> = categories.iter().map(|c| c.path()).collect();
        join_all(paths.iter().map(|path| self.fetch_movies(path, force_reload))).await
    }

    /// Fetches the genre list.
    #[instrument(skip(self))]
    pub async fn fetch_all_genres(&self, force_reload: bool) -> Resource<GenreList> {
        self.genres_cache
            .fetch(
                (),
                force_reload,
                |resource| {
                    self.genres.send_replace(resource);
                },
                self.api.genres(),
            )
            .await
    }

    /// Fetches details of `movie_id`.
    #[instrument(skip(self))]
    pub async fn fetch_movie_details(
        &self,
        movie_id: u64,
        force_reload: bool,
    ) -> Resource<MovieDetails> {
        self.details_cache
            .fetch(
                movie_id,
                force_reload,
                |resource| {
                    self.details.send_replace(resource);
                },
                self.api.movie_details(movie_id),
            )
            .await
    }

    /// Fetches the first page of reviews of `movie_id`.
    #[instrument(skip(self))]
    pub async fn fetch_reviews(&self, movie_id: u64, force_reload: bool) -> Resource<ReviewPage> {
        self.reviews_cache
            .fetch(
                movie_id,
                force_reload,
                |resource| {
                    self.reviews.send_replace(resource);
                },
                self.api.movie_reviews(movie_id),
            )
            .await
    }

    /// Fetches keywords of `movie_id`.
    #[instrument(skip(self))]
    pub async fn fetch_keywords(&self, movie_id: u64) -> Resource<MovieKeywords> {
        fetch_uncached(&self.keywords, self.api.movie_keywords(movie_id)).await
    }

    /// Fetches cast and crew of `movie_id`.
    #[instrument(skip(self))]
    pub async fn fetch_credits(&self, movie_id: u64) -> Resource<MovieCredits> {
        fetch_uncached(&self.credits, self.api.movie_credits(movie_id)).await
    }

    /// Fetches movies similar to `movie_id`.
    #[instrument(skip(self))]
    pub async fn fetch_similar_movies(&self, movie_id: u64) -> Resource<MoviePage> {
        fetch_uncached(&self.similar, self.api.similar_movies(movie_id)).await
    }

    /// Fetches images of `movie_id`.
    #[instrument(skip(self))]
    pub async fn fetch_images(&self, movie_id: u64) -> Resource<MovieImages> {
        fetch_uncached(&self.images, self.api.movie_images(movie_id)).await
    }

    /// Fetches details of `movie_id` for display in a user list.
    #[instrument(skip(self))]
    pub async fn fetch_movie_details_for_user(&self, movie_id: u64) -> Resource<ListedMovies> {
        self.listed.publish(movie_id, Resource::Loading);
        let resource = match self.api.movie_details(movie_id).await {
            Ok(details) => Resource::Success(ListedMovies {
                id: movie_id,
                movies: vec![details],
            }),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "fetch failed");
                Resource::error(&err, None)
            }
        };
        self.listed.publish(movie_id, resource.clone());
        resource
    }

    /// Fetches every movie of a user list concurrently.
    #[instrument(skip_all, fields(count = movie_ids.len()))]
    pub async fn fetch_list_of_movies(&self, movie_ids: &[u64]) -> Vec<Resource<ListedMovies>> {
        join_all(
            movie_ids
                .iter()
                .map(|&id| self.fetch_movie_details_for_user(id)),
        )
        .await
    }

    /// Pager over `discover/movie`.
    pub fn discover_movies(&self) -> Pager<MoviePagingSource<A>> {
        self.pager(
            MovieFilter::Discover,
            self.paging
                .with_initial_load_size(DISCOVER_INITIAL_LOAD_SIZE),
        )
    }

    /// Pager over movies of `genre_id`.
    pub fn genre_movies(&self, genre_id: u32) -> Pager<MoviePagingSource<A>> {
        self.pager(MovieFilter::Genre(genre_id), self.paging)
    }

    /// Pager over the listing at `category`.
    pub fn category_movies(&self, category: &str) -> Pager<MoviePagingSource<A>> {
        self.pager(MovieFilter::Category(category.to_owned()), self.paging)
    }

    /// Pager over movies matching `keyword`.
    pub fn keyword_movies(&self, keyword: &str) -> Pager<MoviePagingSource<A>> {
        self.pager(MovieFilter::Keyword(keyword.to_owned()), self.paging)
    }

    fn pager(&self, filter: MovieFilter, config: PagingConfig) -> Pager<MoviePagingSource<A>> {
        Pager::new(MoviePagingSource::new(Arc::clone(&self.api), filter), config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::test_support::MockTmdbApi;

    fn catalog() -> (Arc<MockTmdbApi>, Catalog<MockTmdbApi>) {
        let api = Arc::new(MockTmdbApi::new(Some(3), 20));
        let catalog = Catalog::new(Arc::clone(&api), PagingConfig::default());
        (api, catalog)
    }

    #[tokio::test]
    async fn test_second_fetch_served_from_cache() {
        // Arrange
        let (api, catalog) = catalog();
        let first = catalog.fetch_movies("movie/42", false).await;

        // Act
        let second = catalog.fetch_movies("movie/42", false).await;

        // Assert
        assert!(second.is_success());
        assert_eq!(first, second);
        assert_eq!(api.calls(), 1);
        let map = catalog.movies().borrow().clone();
        assert_eq!(map.get("movie/42"), Some(&second));
    }

    #[tokio::test]
    async fn test_force_reload_always_calls_network() {
        // Arrange
        let (api, catalog) = catalog();
        catalog.fetch_movie_details(42, false).await;

        // Act
        catalog.fetch_movie_details(42, true).await;
        catalog.fetch_movie_details(42, true).await;

        // Assert
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test]
    async fn test_not_found_leaves_cache_untouched() {
        // Arrange
        let (api, catalog) = catalog();
        api.set_not_found(true);

        // Act
        let failed = catalog.fetch_movies("movie/popular", false).await;
        api.set_not_found(false);
        let recovered = catalog.fetch_movies("movie/popular", false).await;

        // Assert
        assert_eq!(
            failed,
            Resource::Error {
                message: String::from("API Error: 404 - Not Found"),
                stale: None,
            }
        );
        assert!(recovered.is_success());
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_forced_failure_keeps_stale_payload() {
        // Arrange
        let (api, catalog) = catalog();
        let cached = catalog.fetch_reviews(7, false).await;
        api.set_not_found(true);

        // Act
        let failed = catalog.fetch_reviews(7, true).await;
        let served = catalog.fetch_reviews(7, false).await;

        // Assert
        assert_eq!(failed.error_message(), Some("API Error: 404 - Not Found"));
        assert_eq!(failed.data(), cached.data());
        assert_eq!(served, cached);
        assert_eq!(api.calls(), 2);
        assert_eq!(*catalog.reviews().borrow(), cached);
    }

    #[tokio::test]
    async fn test_fetch_all_categories() {
        // Arrange
        let (api, catalog) = catalog();

        // Act
        let results = catalog.fetch_all(&Category::ALL, false).await;

        // Assert
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(Resource::is_success));
        assert_eq!(api.calls(), 5);
        let map = catalog.movies().borrow().clone();
        assert_eq!(map.len(), 5);
        let trending = map["trending/movie/day"].data().unwrap();
        assert_eq!(trending.category, "trending/movie/day");
        assert_eq!(trending.movies.len(), 20);
    }

    #[tokio::test]
    async fn test_genres_cached() {
        // Arrange
        let (api, catalog) = catalog();

        // Act
        catalog.fetch_all_genres(false).await;
        let genres = catalog.fetch_all_genres(false).await;

        // Assert
        assert_eq!(api.calls(), 1);
        let list = genres.into_data().unwrap();
        assert!(list.genres.iter().any(|g| g.name == "Science Fiction"));
    }

    #[tokio::test]
    async fn test_uncached_resources_always_call_network() {
        // Arrange
        let (api, catalog) = catalog();

        // Act
        catalog.fetch_keywords(7).await;
        catalog.fetch_keywords(7).await;
        catalog.fetch_credits(7).await;
        catalog.fetch_images(7).await;
        let similar = catalog.fetch_similar_movies(7).await;

        // Assert
        assert_eq!(api.calls(), 5);
        assert_eq!(similar.data().unwrap().results.len(), 20);
        assert_eq!(catalog.keywords().borrow().data().unwrap().id, 7);
        assert_eq!(catalog.images().borrow().data().unwrap().id, 7);
        let requests = api.requests.lock().unwrap();
        assert_eq!(requests[2], "movie/7/credits");
    }

    #[tokio::test]
    async fn test_list_of_movies_keyed_by_id() {
        // Arrange
        let (api, catalog) = catalog();

        // Act
        let results = catalog.fetch_list_of_movies(&[11, 12, 13]).await;

        // Assert
        assert_eq!(results.len(), 3);
        assert_eq!(api.calls(), 3);
        let map = catalog.listed_movies().borrow().clone();
        let listed = map[&12].data().unwrap();
        assert_eq!(listed.id, 12);
        assert_eq!(listed.movies[0].id, 12);
    }

    #[tokio::test]
    async fn test_listed_movie_failure() {
        // Arrange
        let (api, catalog) = catalog();
        api.set_not_found(true);

        // Act
        let result = catalog.fetch_movie_details_for_user(99).await;

        // Assert
        assert_eq!(result.error_message(), Some("API Error: 404 - Not Found"));
        assert_eq!(catalog.listed_movies().borrow().get(&99), Some(&result));
    }

    #[tokio::test]
    async fn test_pager_factories() {
        // Arrange
        let (api, catalog) = catalog();
        let mut discover = catalog.discover_movies();
        let mut keyword = catalog.keyword_movies("heist");

        // Act
        discover.load_more().await;
        keyword.load_more().await;

        // Assert
        assert_eq!(discover.config().initial_load_size, DISCOVER_INITIAL_LOAD_SIZE);
        assert_eq!(
            catalog.genre_movies(878).source().filter(),
            &MovieFilter::Genre(878)
        );
        assert_eq!(
            catalog.category_movies("movie/upcoming").source().filter(),
            &MovieFilter::Category(String::from("movie/upcoming"))
        );
        let requests = api.requests.lock().unwrap();
        assert_eq!(requests[0], "discover?page=1");
        assert_eq!(requests[1], "discover?page=1&query=heist");
    }
}
