use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of watch-list movies tagged with a genre
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenreStat {
    pub genre: String,
    pub count: usize,
}

/// Average 0-5 rating of watch-list movies tagged with a genre
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenreRating {
    pub genre: String,
    pub rating: f64,
}

/// Everything the profile page charts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub account_created_at: DateTime<Utc>,
    pub total_movies: usize,
    pub genres: Vec<GenreStat>,
    pub genre_ratings: Vec<GenreRating>,
}
