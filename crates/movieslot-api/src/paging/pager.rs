//! Pagination session over a paging source.
//!
//! A [`Pager`] owns the pages loaded so far and publishes a
//! [`PagingSnapshot`] through a `tokio::sync::watch` channel after every
//! state change. Failed loads stay failed until [`Pager::retry`] or
//! [`Pager::refresh`] is called.
#![allow(clippy::future_not_send)]

use tokio::sync::watch;
use tracing::instrument;

use super::source::{LoadParams, LoadResult, LocalPagingSource, Page, PagingState};
use crate::tmdb::Movie;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default distance from the end of the loaded items that triggers a load.
pub const DEFAULT_PREFETCH_DISTANCE: u32 = 10;

/// Page sizing of a pagination session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct PagingConfig {
    /// Requested items per page.
    pub page_size: u32,
    /// Items remaining past the anchor at which the next page is requested.
    pub prefetch_distance: u32,
    /// Requested items for the first load.
    pub initial_load_size: u32,
}

impl PagingConfig {
    /// Creates a config with the given page size and default prefetch distance.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            page_size,
            prefetch_distance: DEFAULT_PREFETCH_DISTANCE,
            initial_load_size: page_size,
        }
    }

    /// Sets the prefetch distance.
    #[must_use]
    pub const fn with_prefetch_distance(mut self, prefetch_distance: u32) -> Self {
        self.prefetch_distance = prefetch_distance;
        self
    }

    /// Sets the first load size.
    #[must_use]
    pub const fn with_initial_load_size(mut self, initial_load_size: u32) -> Self {
        self.initial_load_size = initial_load_size;
        self
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// State of one load direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Idle. `end_of_pagination` is set once no further page exists.
    NotLoading {
        /// No page remains in this direction.
        end_of_pagination: bool,
    },
    /// A request is in flight.
    Loading,
    /// The last load failed with this message.
    Error(String),
}

impl LoadState {
    const IDLE: Self = Self::NotLoading {
        end_of_pagination: false,
    };

    /// Whether this direction has reached its end.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(
            self,
            Self::NotLoading {
                end_of_pagination: true
            }
        )
    }

    /// Error message of a failed load.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            Self::NotLoading { .. } | Self::Loading => None,
        }
    }
}

/// Observable view of a pagination session.
#[derive(Debug, Clone, PartialEq)]
pub struct PagingSnapshot<T> {
    /// All loaded items in list order.
    pub items: Vec<T>,
    /// State of the initial load or refresh.
    pub refresh: LoadState,
    /// State of loads before the first page.
    pub prepend: LoadState,
    /// State of loads after the last page.
    pub append: LoadState,
}

impl<T> Default for PagingSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            refresh: LoadState::IDLE,
            prepend: LoadState::IDLE,
            append: LoadState::IDLE,
        }
    }
}

/// Failed loads waiting for [`Pager::retry`], one slot per direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FailedLoads {
    /// Key of a failed initial load or refresh.
    refresh: Option<Option<u32>>,
    prepend: bool,
    append: bool,
}

/// Pagination session.
#[derive(Debug)]
pub struct Pager<S> {
    source: S,
    config: PagingConfig,
    pages: Vec<Page<Movie>>,
    anchor_position: Option<usize>,
    failed: FailedLoads,
    tx: watch::Sender<PagingSnapshot<Movie>>,
}

impl<S: LocalPagingSource> Pager<S> {
    /// Creates an idle session. Nothing is loaded until [`Self::refresh`]
    /// or [`Self::load_more`] is called.
    pub fn new(source: S, config: PagingConfig) -> Self {
        let (tx, _rx) = watch::channel(PagingSnapshot::default());
        Self {
            source,
            config,
            pages: Vec::new(),
            anchor_position: None,
            failed: FailedLoads::default(),
            tx,
        }
    }

    /// Paging source of this session.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Page sizing of this session.
    pub const fn config(&self) -> PagingConfig {
        self.config
    }

    /// Subscribes to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<PagingSnapshot<Movie>> {
        self.tx.subscribe()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> PagingSnapshot<Movie> {
        self.tx.borrow().clone()
    }

    /// Number of loaded items.
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }

    /// Loaded pages in list order.
    pub fn pages(&self) -> &[Page<Movie>] {
        &self.pages
    }

    /// Records the most recently viewed item position.
    pub fn set_anchor(&mut self, position: usize) {
        self.anchor_position = Some(position);
    }

    /// Whether viewing `position` should trigger [`Self::load_more`].
    pub fn should_prefetch(&self, position: usize) -> bool {
        let snapshot = self.tx.borrow();
        if snapshot.append != LoadState::IDLE {
            return false;
        }
        let Some(last) = self.pages.last() else {
            return false;
        };
        if last.next_key.is_none() {
            return false;
        }
        let remaining = self.item_count().saturating_sub(position.saturating_add(1));
        remaining < usize::try_from(self.config.prefetch_distance).unwrap_or(usize::MAX)
    }

    /// Reloads from the page around the anchor, or the first page when
    /// nothing has been viewed. Loaded pages are kept if the reload fails.
    #[instrument(skip_all)]
    pub async fn refresh(&mut self) -> LoadState {
        let key = self.source.refresh_key(&PagingState {
            pages: &self.pages,
            anchor_position: self.anchor_position,
        });
        self.load_refresh(key).await
    }

    /// Loads the page after the last loaded page. Starts the session when
    /// nothing has been loaded yet. A failed append is not repeated until
    /// [`Self::retry`] is called.
    #[instrument(skip_all)]
    pub async fn load_more(&mut self) -> LoadState {
        let Some(last) = self.pages.last() else {
            if self.failed.refresh.is_some() {
                return self.snapshot().refresh;
            }
            return self.load_refresh(None).await;
        };
        if self.failed.append {
            return self.snapshot().append;
        }
        let Some(key) = last.next_key else {
            tracing::debug!("end of pagination reached");
            return self.set_append(LoadState::NotLoading {
                end_of_pagination: true,
            });
        };

        self.set_append(LoadState::Loading);
        match self.load_page(key, self.config.page_size).await {
            LoadResult::Page(page) => {
                let end = page.next_key.is_none();
                self.pages.push(page);
                self.failed.append = false;
                self.set_append(LoadState::NotLoading {
                    end_of_pagination: end,
                })
            }
            LoadResult::Error(message) => {
                self.failed.append = true;
                self.set_append(LoadState::Error(message))
            }
        }
    }

    /// Loads the page before the first loaded page.
    #[instrument(skip_all)]
    pub async fn load_previous(&mut self) -> LoadState {
        let Some(key) = self.pages.first().and_then(|p| p.prev_key) else {
            return self.set_prepend(LoadState::NotLoading {
                end_of_pagination: true,
            });
        };
        if self.failed.prepend {
            return self.snapshot().prepend;
        }

        self.set_prepend(LoadState::Loading);
        match self.load_page(key, self.config.page_size).await {
            LoadResult::Page(page) => {
                let end = page.prev_key.is_none();
                self.pages.insert(0, page);
                self.failed.prepend = false;
                self.set_prepend(LoadState::NotLoading {
                    end_of_pagination: end,
                })
            }
            LoadResult::Error(message) => {
                self.failed.prepend = true;
                self.set_prepend(LoadState::Error(message))
            }
        }
    }

    /// Repeats failed loads. A failed refresh is repeated alone, since it
    /// replaces every loaded page; otherwise failed prepend and append loads
    /// are repeated in that order and the last state is returned. Returns
    /// `None` when nothing failed.
    #[instrument(skip_all)]
    pub async fn retry(&mut self) -> Option<LoadState> {
        let failed = std::mem::take(&mut self.failed);
        if failed == FailedLoads::default() {
            return None;
        }
        tracing::info!(?failed, "retrying failed loads");
        if let Some(key) = failed.refresh {
            self.failed = FailedLoads {
                refresh: None,
                ..failed
            };
            return Some(self.load_refresh(key).await);
        }
        let mut state = None;
        if failed.prepend {
            state = Some(self.load_previous().await);
        }
        if failed.append {
            state = Some(self.load_more().await);
        }
        state
    }

    async fn load_refresh(&mut self, key: Option<u32>) -> LoadState {
        self.failed.refresh = None;
        self.publish(|s| s.refresh = LoadState::Loading);
        let load_size = self.config.initial_load_size;
        match self.load_page(key.unwrap_or(1), load_size).await {
            LoadResult::Page(page) => {
                let prepend_end = page.prev_key.is_none();
                let append_end = page.next_key.is_none();
                self.pages = vec![page];
                self.failed = FailedLoads::default();
                self.publish(|s| {
                    s.refresh = LoadState::IDLE;
                    s.prepend = LoadState::NotLoading {
                        end_of_pagination: prepend_end,
                    };
                    s.append = LoadState::NotLoading {
                        end_of_pagination: append_end,
                    };
                });
                LoadState::IDLE
            }
            LoadResult::Error(message) => {
                self.failed.refresh = Some(key);
                let state = LoadState::Error(message);
                self.publish(|s| s.refresh = state.clone());
                state
            }
        }
    }

    async fn load_page(&self, key: u32, load_size: u32) -> LoadResult<Movie> {
        self.source
            .load(LoadParams {
                key: Some(key),
                load_size,
            })
            .await
    }

    fn set_append(&self, state: LoadState) -> LoadState {
        self.publish(|s| s.append = state.clone());
        state
    }

    fn set_prepend(&self, state: LoadState) -> LoadState {
        self.publish(|s| s.prepend = state.clone());
        state
    }

    fn publish(&self, update: impl FnOnce(&mut PagingSnapshot<Movie>)) {
        let items: Vec<Movie> = self
            .pages
            .iter()
            .flat_map(|p| p.items.iter().cloned())
            .collect();
        self.tx.send_modify(|snapshot| {
            snapshot.items = items;
            update(snapshot);
        });
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::test_support::MockTmdbApi;
    use crate::paging::{MovieFilter, MoviePagingSource};

    fn pager_over(api: &Arc<MockTmdbApi>) -> Pager<MoviePagingSource<MockTmdbApi>> {
        Pager::new(
            MoviePagingSource::new(Arc::clone(api), MovieFilter::Discover),
            PagingConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_load_until_end_of_pagination() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(3), 20));
        let mut pager = pager_over(&api);

        // Act
        pager.load_more().await;
        pager.load_more().await;
        let last = pager.load_more().await;
        let past_end = pager.load_more().await;

        // Assert
        assert_eq!(
            last,
            LoadState::NotLoading {
                end_of_pagination: true
            }
        );
        assert!(past_end.is_end());
        assert_eq!(pager.item_count(), 60);
        assert_eq!(api.call_count.load(Ordering::SeqCst), 3);
        let snapshot = pager.snapshot();
        assert_eq!(snapshot.items.first().unwrap().id, 1);
        assert_eq!(snapshot.items.last().unwrap().id, 60);
    }

    #[tokio::test]
    async fn test_zero_total_pages_is_single_page() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(0), 5));
        let mut pager = pager_over(&api);

        // Act
        pager.load_more().await;

        // Assert
        let snapshot = pager.snapshot();
        assert_eq!(snapshot.items.len(), 5);
        assert!(snapshot.append.is_end());
        assert!(snapshot.prepend.is_end());
    }

    #[tokio::test]
    async fn test_failed_append_waits_for_retry() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(5), 20));
        api.fail_once(2);
        let mut pager = pager_over(&api);
        pager.load_more().await;

        // Act
        let failed = pager.load_more().await;
        let blocked = pager.load_more().await;
        let retried = pager.retry().await;

        // Assert
        assert_eq!(
            failed,
            LoadState::Error(String::from("API Error: 500 - Internal Server Error"))
        );
        assert_eq!(blocked, failed);
        assert_eq!(retried, Some(LoadState::IDLE));
        assert_eq!(pager.item_count(), 40);
        assert_eq!(api.call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_loaded_items() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(5), 20));
        let mut pager = pager_over(&api);
        pager.load_more().await;
        api.fail_once(1);

        // Act
        let state = pager.refresh().await;

        // Assert
        assert!(state.error_message().is_some());
        let snapshot = pager.snapshot();
        assert_eq!(snapshot.items.len(), 20);
        assert_eq!(snapshot.refresh, state);
    }

    #[tokio::test]
    async fn test_refresh_restarts_at_anchor_page() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(5), 20));
        let mut pager = pager_over(&api);
        pager.load_more().await;
        pager.load_more().await;
        pager.load_more().await;
        pager.set_anchor(45);

        // Act
        pager.refresh().await;

        // Assert
        let requests = api.requests.lock().unwrap();
        assert_eq!(requests.last().unwrap(), "discover?page=3");
        assert_eq!(pager.pages().len(), 1);
        assert_eq!(pager.pages()[0].prev_key, Some(2));
    }

    #[tokio::test]
    async fn test_load_previous_after_anchored_refresh() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(5), 20));
        let mut pager = pager_over(&api);
        pager.load_more().await;
        pager.load_more().await;
        pager.set_anchor(25);
        pager.refresh().await;

        // Act
        let state = pager.load_previous().await;

        // Assert
        assert!(state.is_end());
        assert_eq!(pager.snapshot().items.first().unwrap().id, 1);
        assert_eq!(pager.item_count(), 40);
    }

    #[tokio::test]
    async fn test_should_prefetch_near_end() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(2), 20));
        let mut pager = pager_over(&api);
        pager.load_more().await;

        // Act & Assert
        assert!(!pager.should_prefetch(5));
        assert!(pager.should_prefetch(10));
        assert!(pager.should_prefetch(19));
        pager.load_more().await;
        assert!(!pager.should_prefetch(39));
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(2), 20));
        let mut pager = pager_over(&api);
        let mut rx = pager.subscribe();

        // Act
        pager.load_more().await;

        // Assert
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.items.len(), 20);
        assert_eq!(snapshot.refresh, LoadState::IDLE);
    }

    #[tokio::test]
    async fn test_append_success_keeps_failed_refresh_pending() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(5), 20));
        let mut pager = pager_over(&api);
        pager.load_more().await;
        api.fail_once(1);
        let refreshed = pager.refresh().await;
        let appended = pager.load_more().await;

        // Act
        let retried = pager.retry().await;

        // Assert
        assert!(refreshed.error_message().is_some());
        assert_eq!(
            appended,
            LoadState::NotLoading {
                end_of_pagination: false
            }
        );
        assert_eq!(retried, Some(LoadState::IDLE));
        let snapshot = pager.snapshot();
        assert_eq!(snapshot.refresh, LoadState::IDLE);
        assert_eq!(snapshot.items.len(), 20);
        assert_eq!(pager.retry().await, None);
        let requests = api.requests.lock().unwrap();
        assert_eq!(requests.last().unwrap(), "discover?page=1");
    }

    #[tokio::test]
    async fn test_retry_repeats_prepend_and_append() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(5), 20));
        let mut pager = pager_over(&api);
        pager.load_more().await;
        pager.load_more().await;
        pager.load_more().await;
        pager.set_anchor(45);
        pager.refresh().await;
        api.fail_once(2);
        api.fail_once(4);
        let prepend = pager.load_previous().await;
        let append = pager.load_more().await;

        // Act
        let retried = pager.retry().await;

        // Assert
        assert!(prepend.error_message().is_some());
        assert!(append.error_message().is_some());
        assert_eq!(
            retried,
            Some(LoadState::NotLoading {
                end_of_pagination: false
            })
        );
        let snapshot = pager.snapshot();
        assert_eq!(
            snapshot.prepend,
            LoadState::NotLoading {
                end_of_pagination: false
            }
        );
        assert_eq!(snapshot.items.first().unwrap().id, 21);
        assert_eq!(snapshot.items.last().unwrap().id, 80);
        assert_eq!(pager.retry().await, None);
    }

    #[tokio::test]
    async fn test_retry_without_failure_is_noop() {
        // Arrange
        let api = Arc::new(MockTmdbApi::new(Some(2), 20));
        let mut pager = pager_over(&api);

        // Act
        let result = pager.retry().await;

        // Assert
        assert_eq!(result, None);
        assert_eq!(api.call_count.load(Ordering::SeqCst), 0);
    }
}
