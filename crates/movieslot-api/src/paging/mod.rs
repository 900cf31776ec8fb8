//! Page-keyed pagination of TMDB movie listings.
//!
//! Pages are keyed by their 1-based TMDB page number. A
//! [`MoviePagingSource`] turns one key into one API call, and a [`Pager`]
//! accumulates the loaded pages for a consumer.

mod pager;
mod source;

pub use pager::{
    DEFAULT_PAGE_SIZE, DEFAULT_PREFETCH_DISTANCE, LoadState, Pager, PagingConfig, PagingSnapshot,
};
#[allow(clippy::module_name_repetitions)]
pub use source::{
    LoadParams, LoadResult, LocalPagingSource, MovieFilter, MoviePagingSource, Page, PagingSource,
    PagingState, effective_total_pages, next_key, prev_key, refresh_key,
};
