use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{GenreRating, GenreStat, Movie, ProfileSummary};

const UNKNOWN_GENRE: &str = "Unknown";

/// Genre tags of a movie, or `Unknown` when it has none
fn genres_of(movie: &Movie) -> Vec<&str> {
    let genres: Vec<&str> = movie
        .genres
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();

    if genres.is_empty() {
        vec![UNKNOWN_GENRE]
    } else {
        genres
    }
}

/// A movie's rating on the 0-5 scale
fn five_point_rating(movie: &Movie) -> f64 {
    match (movie.normalized_rating, movie.rating) {
        (Some(r), _) if r > 0.0 => r,
        (_, Some(r)) if r > 0.0 => r / 2.0,
        _ => 0.0,
    }
}

/// Number of movies per genre, in order of first appearance
pub fn genre_distribution(entries: &[Movie]) -> Vec<GenreStat> {
    let mut stats: Vec<GenreStat> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for movie in entries {
        for genre in genres_of(movie) {
            match index.get(genre) {
                Some(&i) => stats[i].count += 1,
                None => {
                    index.insert(genre.to_string(), stats.len());
                    stats.push(GenreStat {
                        genre: genre.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    stats
}

/// Average rating per genre, highest first
pub fn genre_ratings(entries: &[Movie]) -> Vec<GenreRating> {
    let mut totals: Vec<(String, f64, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for movie in entries {
        let rating = five_point_rating(movie);
        for genre in genres_of(movie) {
            match index.get(genre) {
                Some(&i) => {
                    totals[i].1 += rating;
                    totals[i].2 += 1;
                }
                None => {
                    index.insert(genre.to_string(), totals.len());
                    totals.push((genre.to_string(), rating, 1));
                }
            }
        }
    }

    let mut ratings: Vec<GenreRating> = totals
        .into_iter()
        .map(|(genre, total, count)| GenreRating {
            genre,
            rating: total / count as f64,
        })
        .collect();

    // Stable sort keeps first-appearance order among ties
    ratings.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    ratings
}

pub fn profile_summary(account_created_at: DateTime<Utc>, entries: &[Movie]) -> ProfileSummary {
    ProfileSummary {
        account_created_at,
        total_movies: entries.len(),
        genres: genre_distribution(entries),
        genre_ratings: genre_ratings(entries),
    }
}
