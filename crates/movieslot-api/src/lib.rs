//! API client library for movieslot.
//!
//! Provides the TMDB client, page-cursor sources for paginated movie
//! listings, and the cached catalog that screens observe.

/// Cached catalog of TMDB resources with observable tagged results.
pub mod catalog;

/// Page-cursor pagination over TMDB movie listings.
pub mod paging;

/// Tagged result type wrapping network-derived values.
pub mod resource;

/// TMDB API client.
pub mod tmdb;

#[cfg(test)]
mod test_support;
