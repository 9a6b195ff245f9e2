use serde::Deserialize;

use super::Movie;
use crate::services::normalizer::normalize;

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged list envelope used by every TMDB list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_results: u32,
}

/// A movie as returned by `/search/movie`, `/trending` and the list endpoints
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// TMDB movie genre ids
const GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Looks up a TMDB genre name
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// Maps genre ids to names, dropping unknown ids
///
/// Returns `["Unknown"]` when nothing maps.
pub fn convert_genres(genre_ids: &[u32]) -> Vec<String> {
    let genres: Vec<String> = genre_ids
        .iter()
        .filter_map(|id| genre_name(*id))
        .map(str::to_string)
        .collect();

    if genres.is_empty() {
        vec!["Unknown".to_string()]
    } else {
        genres
    }
}

/// Builds a full poster URL from a TMDB poster path
pub fn poster_url(image_base: &str, poster_path: Option<&str>) -> Option<String> {
    poster_path
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}{}", image_base.trim_end_matches('/'), path))
}

impl TmdbMovie {
    /// Converts into the shared movie shape
    pub fn into_movie(self, image_base: &str) -> Movie {
        Movie {
            movie_id: self.id,
            genres: convert_genres(&self.genre_ids),
            poster: poster_url(image_base, self.poster_path.as_deref()),
            rating: Some(self.vote_average),
            normalized_rating: Some(normalize(self.vote_average)),
            overview: self.overview.filter(|text| !text.is_empty()),
            release_date: self.release_date.filter(|date| !date.is_empty()),
            title: self.title,
        }
    }
}
