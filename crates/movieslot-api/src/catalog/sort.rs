//! Client-side ordering of movie lists.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::NaiveDate;

use crate::tmdb::Movie;

/// Sort key for movie lists. All orders are descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortType {
    /// Newest release first.
    ReleaseDate,
    /// Highest vote average first.
    Rating,
    /// Most popular first.
    #[default]
    Popularity,
}

impl SortType {
    /// All sort types.
    pub const ALL: [Self; 3] = [Self::ReleaseDate, Self::Rating, Self::Popularity];

    /// Label shown in sort menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReleaseDate => "Release Date",
            Self::Rating => "Rating",
            Self::Popularity => "Popularity",
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "releasedate" | "release" | "date" => Ok(Self::ReleaseDate),
            "rating" => Ok(Self::Rating),
            "popularity" | "popular" => Ok(Self::Popularity),
            _ => {
                let known: Vec<&str> = Self::ALL.iter().map(|t| t.label()).collect();
                bail!("unknown sort type: {s} (expected one of: {})", known.join(", "))
            }
        }
    }
}

/// Parses a TMDB `YYYY-MM-DD` release date.
fn release_date(movie: &Movie) -> Option<NaiveDate> {
    movie
        .release_date
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Sorts `movies` in place, descending by `sort_type`.
///
/// Movies without a parsable release date sort after all dated movies.
/// The sort is stable, so ties keep their server order.
pub fn sort_movies(movies: &mut [Movie], sort_type: SortType) {
    match sort_type {
        SortType::ReleaseDate => movies.sort_by(|a, b| {
            match (release_date(a), release_date(b)) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
        SortType::Rating => movies.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average)),
        SortType::Popularity => movies.sort_by(|a, b| b.popularity.total_cmp(&a.popularity)),
    }
}
