//! TMDB endpoint paths and home categories.

use std::fmt;

/// A TMDB v3 endpoint, relative to the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub enum ApiEndpoint {
    /// `movie/popular`
    MoviePopular,
    /// `movie/top_rated`
    MovieTopRated,
    /// `movie/upcoming`
    MovieUpcoming,
    /// `movie/now_playing`
    MovieNowPlaying,
    /// `trending/movie/day`
    MovieTrending,
    /// `movie/{id}`
    MovieDetail(u64),
    /// `movie/{id}/videos`
    MovieVideos(u64),
    /// `movie/{id}/credits`
    MovieCredits(u64),
    /// `movie/{id}/reviews`
    MovieReviews(u64),
    /// `movie/{id}/recommendations`
    MovieRecommended(u64),
    /// `movie/{id}/similar`
    MovieSimilar(u64),
    /// `movie/{id}/keywords`
    MovieKeywords(u64),
    /// `movie/{id}/images`
    MovieImages(u64),
    /// `person/popular`
    PersonPopular,
    /// `person/{id}`
    PersonDetail(u64),
    /// `person/{id}/movie_credits`
    PersonMovieCredits(u64),
    /// `person/{id}/images`
    PersonImages(u64),
    /// `search/movie`
    SearchMovie,
    /// `search/keyword`
    SearchKeyword,
    /// `search/person`
    SearchPerson,
    /// `genre/movie/list`
    Genres,
    /// `discover/movie`
    Discover,
}

impl ApiEndpoint {
    /// Path of this endpoint relative to the API base URL.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::MoviePopular => String::from("movie/popular"),
            Self::MovieTopRated => String::from("movie/top_rated"),
            Self::MovieUpcoming => String::from("movie/upcoming"),
            Self::MovieNowPlaying => String::from("movie/now_playing"),
            Self::MovieTrending => String::from("trending/movie/day"),
            Self::MovieDetail(id) => format!("movie/{id}"),
            Self::MovieVideos(id) => format!("movie/{id}/videos"),
            Self::MovieCredits(id) => format!("movie/{id}/credits"),
            Self::MovieReviews(id) => format!("movie/{id}/reviews"),
            Self::MovieRecommended(id) => format!("movie/{id}/recommendations"),
            Self::MovieSimilar(id) => format!("movie/{id}/similar"),
            Self::MovieKeywords(id) => format!("movie/{id}/keywords"),
            Self::MovieImages(id) => format!("movie/{id}/images"),
            Self::PersonPopular => String::from("person/popular"),
            Self::PersonDetail(id) => format!("person/{id}"),
            Self::PersonMovieCredits(id) => format!("person/{id}/movie_credits"),
            Self::PersonImages(id) => format!("person/{id}/images"),
            Self::SearchMovie => String::from("search/movie"),
            Self::SearchKeyword => String::from("search/keyword"),
            Self::SearchPerson => String::from("search/person"),
            Self::Genres => String::from("genre/movie/list"),
            Self::Discover => String::from("discover/movie"),
        }
    }
}

impl fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Movie categories shown on the home screen, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Popular movies.
    Popular,
    /// Movies now in theatres.
    NowPlaying,
    /// Top rated movies.
    TopRated,
    /// Upcoming releases.
    Upcoming,
    /// Movies trending today.
    Trending,
}

impl Category {
    /// All categories in home-screen order.
    pub const ALL: [Self; 5] = [
        Self::Popular,
        Self::NowPlaying,
        Self::TopRated,
        Self::Upcoming,
        Self::Trending,
    ];

    /// Endpoint listing this category.
    #[must_use]
    pub const fn endpoint(self) -> ApiEndpoint {
        match self {
            Self::Popular => ApiEndpoint::MoviePopular,
            Self::NowPlaying => ApiEndpoint::MovieNowPlaying,
            Self::TopRated => ApiEndpoint::MovieTopRated,
            Self::Upcoming => ApiEndpoint::MovieUpcoming,
            Self::Trending => ApiEndpoint::MovieTrending,
        }
    }

    /// Endpoint path, also used as the cache key for the category.
    #[must_use]
    pub fn path(self) -> String {
        self.endpoint().path()
    }

    /// Human-readable name (e.g. "Now Playing").
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Popular => "Popular",
            Self::NowPlaying => "Now Playing",
            Self::TopRated => "Top Rated",
            Self::Upcoming => "Upcoming",
            Self::Trending => "Trending",
        }
    }

    /// Route-safe name without spaces (e.g. "`Now_Playing`").
    #[must_use]
    pub const fn route_name(self) -> &'static str {
        match self {
            Self::Popular => "Popular",
            Self::NowPlaying => "Now_Playing",
            Self::TopRated => "Top_Rated",
            Self::Upcoming => "Upcoming",
            Self::Trending => "Trending",
        }
    }

    /// Looks up the category listed at `path`.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.path() == path)
    }

    /// Looks up a category by its display or route name.
    #[must_use]
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.display_name() == name || c.route_name() == name)
    }

    /// Display name for a category path; unknown paths are returned as-is.
    #[must_use]
    pub fn display_name_for_path(path: &str) -> &str {
        Self::from_path(path).map_or(path, |c| c.display_name())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_paths() {
        // Arrange & Act & Assert
        assert_eq!(ApiEndpoint::MovieTrending.path(), "trending/movie/day");
        assert_eq!(ApiEndpoint::Genres.path(), "genre/movie/list");
        assert_eq!(ApiEndpoint::Discover.path(), "discover/movie");
        assert_eq!(ApiEndpoint::SearchKeyword.path(), "search/keyword");
    }

    #[test]
    fn test_parameterized_paths() {
        // Arrange & Act & Assert
        assert_eq!(ApiEndpoint::MovieDetail(42).path(), "movie/42");
        assert_eq!(ApiEndpoint::MovieKeywords(42).path(), "movie/42/keywords");
        assert_eq!(
            ApiEndpoint::MovieRecommended(42).path(),
            "movie/42/recommendations"
        );
        assert_eq!(
            ApiEndpoint::PersonMovieCredits(7).path(),
            "person/7/movie_credits"
        );
    }

    #[test]
    fn test_category_names() {
        // Arrange
        let category = Category::NowPlaying;

        // Act & Assert
        assert_eq!(category.path(), "movie/now_playing");
        assert_eq!(category.display_name(), "Now Playing");
        assert_eq!(category.route_name(), "Now_Playing");
    }

    #[test]
    fn test_category_lookup() {
        // Arrange & Act & Assert
        assert_eq!(
            Category::from_path("movie/top_rated"),
            Some(Category::TopRated)
        );
        assert_eq!(
            Category::from_display_name("Top_Rated"),
            Some(Category::TopRated)
        );
        assert_eq!(Category::from_display_name("Classics"), None);
    }

    #[test]
    fn test_display_name_for_unknown_path_is_identity() {
        // Arrange & Act
        let name = Category::display_name_for_path("movie/42/similar");

        // Assert
        assert_eq!(name, "movie/42/similar");
    }
}
