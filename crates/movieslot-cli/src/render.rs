//! Plain-text rendering of catalog payloads.

use movieslot_api::tmdb::{CastMember, Genre, Movie, MovieDetails, Review};

/// Placeholder for missing values.
const NONE: &str = "-";

/// Maximum characters of a review excerpt.
const EXCERPT_LEN: usize = 80;

/// One tab-separated listing row: ID, release date, rating, title.
pub fn movie_line(movie: &Movie) -> String {
    format!(
        "{}\t{}\t{:.1}\t{}",
        movie.id,
        non_empty(movie.release_date.as_deref()),
        movie.vote_average,
        movie.title,
    )
}

/// One genre row: ID and name.
pub fn genre_line(genre: &Genre) -> String {
    format!("{}\t{}", genre.id, genre.name)
}

/// One cast row: actor and role.
pub fn cast_line(member: &CastMember) -> String {
    format!(
        "{} as {}",
        member.name,
        non_empty(member.character.as_deref())
    )
}

/// One review row: author and a single-line excerpt.
pub fn review_line(review: &Review) -> String {
    format!("{}: {}", review.author, excerpt(&review.content, EXCERPT_LEN))
}

/// Formats a runtime in minutes as `2h 47m`.
pub fn runtime(minutes: Option<u32>) -> String {
    match minutes {
        None | Some(0) => String::from(NONE),
        Some(m) if m < 60 => format!("{m}m"),
        Some(m) => format!("{}h {:02}m", m / 60, m % 60),
    }
}

/// Header lines of a movie detail view.
pub fn details_lines(details: &MovieDetails) -> Vec<String> {
    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    let mut lines = vec![
        format!("{} ({})", details.title, non_empty(details.release_date.as_deref())),
        format!("Runtime: {}", runtime(details.runtime)),
        format!(
            "Rating: {:.1} ({} votes)",
            details.vote_average, details.vote_count
        ),
        format!("Genres: {}", or_none(&genres.join(", "))),
        format!("Status: {}", non_empty(details.status.as_deref())),
    ];
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(format!("Tagline: {tagline}"));
    }
    if let Some(overview) = details.overview.as_deref().filter(|o| !o.is_empty()) {
        lines.push(format!("Overview: {overview}"));
    }
    lines
}

fn non_empty(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NONE)
}

fn or_none(value: &str) -> &str {
    if value.is_empty() { NONE } else { value }
}

/// First `max` characters of `text` on one line, with an ellipsis when cut.
fn excerpt(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn details() -> MovieDetails {
        serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/movie_details_693134.json"
        ))
        .unwrap()
    }

    #[test]
    fn test_runtime_format() {
        // Arrange & Act & Assert
        assert_eq!(runtime(None), "-");
        assert_eq!(runtime(Some(0)), "-");
        assert_eq!(runtime(Some(45)), "45m");
        assert_eq!(runtime(Some(167)), "2h 47m");
        assert_eq!(runtime(Some(120)), "2h 00m");
    }

    #[test]
    fn test_details_lines() {
        // Arrange
        let details = details();

        // Act
        let lines = details_lines(&details);

        // Assert
        assert!(lines[0].starts_with("Dune: Part Two"));
        assert_eq!(lines[1], "Runtime: 2h 47m");
        assert!(lines[3].starts_with("Genres: "));
        assert!(!lines[3].ends_with('-'));
    }

    #[test]
    fn test_movie_line_without_release_date() {
        // Arrange
        let movie: Movie =
            serde_json::from_str(r#"{"id": 348, "title": "Alien", "vote_average": 8.16}"#)
                .unwrap();

        // Act
        let line = movie_line(&movie);

        // Assert
        assert_eq!(line, "348\t-\t8.2\tAlien");
    }

    #[test]
    fn test_excerpt_flattens_and_truncates() {
        // Arrange
        let text = "A  long\nreview\tbody";

        // Act & Assert
        assert_eq!(excerpt(text, 80), "A long review body");
        assert_eq!(excerpt(text, 6), "A long…");
    }
}
