//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::endpoint::ApiEndpoint;
use super::throttle::RequestThrottle;
use super::types::{
    ErrorResponse, GenreList, MovieCredits, MovieDetails, MovieImages, MovieKeywords, MoviePage,
    ReviewPage,
};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(70);

/// Default read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(120);

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff duration between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Response language sent with every request, if any.
    language: Option<String>,
    /// Request throttle shared by concurrent callers.
    throttle: Arc<Mutex<RequestThrottle>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    min_interval: Option<Duration>,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
            min_interval: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (e.g. "en-US"). Omitted when unset.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Sets the TCP connect timeout (default: 70s).
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-read timeout (default: 120s).
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let throttle = self
            .min_interval
            .map_or_else(RequestThrottle::with_default_interval, RequestThrottle::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            language: self.language,
            throttle: Arc::new(Mutex::new(throttle)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the query string shared by all listing endpoints.
    fn page_query(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", page.to_string())];
        if let Some(ref language) = self.language {
            query.push(("language", language.clone()));
        }
        query
    }

    /// Builds the query string for single-entity endpoints.
    fn entity_query(&self) -> Vec<(&'static str, String)> {
        self.language
            .iter()
            .map(|language| ("language", language.clone()))
            .collect()
    }

    /// Sends a GET request with Bearer auth, query params, and throttling.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    ///
    /// Other non-success statuses fail with `API Error: {code} - {body}`.
    #[instrument(skip_all, fields(path = %path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.throttle.lock().await.acquire().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut retries = 0u32;
        loop {
            let request = self
                .http_client
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .query(query)
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(url = %request.url(), "TMDB API request");

            let result = self.http_client.execute(request).await;
            let response = result.with_context(|| format!("request failed: {path}"))?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.throttle.lock().await.acquire().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                let (tmdb_code, message) = parse_error_body(body);
                tracing::warn!(
                    status = status.as_u16(),
                    tmdb_code = ?tmdb_code,
                    %message,
                    "TMDB API error"
                );
                bail!("API Error: {} - {message}", status.as_u16());
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;
            let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
            let parsed =
                raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
            return Ok(parsed);
        }
    }
}

/// Splits an error body into the TMDB status code and message. Bodies that
/// are not a TMDB error object are returned as the message.
fn parse_error_body(body: String) -> (Option<u32>, String) {
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error_response) => (
            Some(error_response.status_code),
            error_response.status_message,
        ),
        Err(_) => (None, body),
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn movie_list(&self, path: &str, page: u32) -> Result<MoviePage> {
        let query = self.page_query(page);
        self.get_json(path, &query).await
    }

    #[instrument(skip_all)]
    async fn discover_movies(&self, page: u32) -> Result<MoviePage> {
        let query = self.page_query(page);
        self.get_json(&ApiEndpoint::Discover.path(), &query).await
    }

    #[instrument(skip_all)]
    async fn genre_movies(&self, genre_id: u32, page: u32) -> Result<MoviePage> {
        let mut query = self.page_query(page);
        query.push(("with_genres", genre_id.to_string()));
        self.get_json(&ApiEndpoint::Discover.path(), &query).await
    }

    #[instrument(skip_all)]
    async fn keyword_movies(&self, keyword: &str, page: u32) -> Result<MoviePage> {
        let mut query = self.page_query(page);
        query.push(("query", String::from(keyword)));
        self.get_json(&ApiEndpoint::Discover.path(), &query).await
    }

    #[instrument(skip_all)]
    async fn genres(&self) -> Result<GenreList> {
        let query = self.entity_query();
        self.get_json(&ApiEndpoint::Genres.path(), &query).await
    }

    #[instrument(skip_all)]
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        let query = self.entity_query();
        self.get_json(&ApiEndpoint::MovieDetail(movie_id).path(), &query)
            .await
    }

    #[instrument(skip_all)]
    async fn movie_reviews(&self, movie_id: u64) -> Result<ReviewPage> {
        let query = self.entity_query();
        self.get_json(&ApiEndpoint::MovieReviews(movie_id).path(), &query)
            .await
    }

    #[instrument(skip_all)]
    async fn movie_keywords(&self, movie_id: u64) -> Result<MovieKeywords> {
        self.get_json(&ApiEndpoint::MovieKeywords(movie_id).path(), &[])
            .await
    }

    #[instrument(skip_all)]
    async fn movie_credits(&self, movie_id: u64) -> Result<MovieCredits> {
        let query = self.entity_query();
        self.get_json(&ApiEndpoint::MovieCredits(movie_id).path(), &query)
            .await
    }

    #[instrument(skip_all)]
    async fn similar_movies(&self, movie_id: u64) -> Result<MoviePage> {
        let query = self.page_query(1);
        self.get_json(&ApiEndpoint::MovieSimilar(movie_id).path(), &query)
            .await
    }

    #[instrument(skip_all)]
    async fn movie_images(&self, movie_id: u64) -> Result<MovieImages> {
        self.get_json(&ApiEndpoint::MovieImages(movie_id).path(), &[])
            .await
    }
}
