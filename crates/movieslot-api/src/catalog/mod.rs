//! Cached catalog of TMDB resources.
//!
//! Screens observe the catalog through `tokio::sync::watch` receivers, one
//! per resource family, each carrying a [`Resource`](crate::resource::Resource).

mod cache;
mod sort;
mod state;
mod store;

#[allow(clippy::module_name_repetitions)]
pub use cache::ResponseCache;
pub use sort::{SortType, sort_movies};
pub use state::KeyedState;
pub use store::{Catalog, DISCOVER_INITIAL_LOAD_SIZE};
