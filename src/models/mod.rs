use serde::{Deserialize, Deserializer, Serialize};

pub mod stats;
pub mod tmdb;

pub use stats::{GenreRating, GenreStat, ProfileSummary};
pub use tmdb::{TmdbMovie, TmdbPage};

/// A movie from the local catalog file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    /// Internal item id (positive, unique within the catalog)
    pub id: u64,
    pub title: String,
    pub genres: Vec<String>,
}

/// Movie shape shared by search results, dashboard listings and the watch-list
///
/// Identity fields (`movie_id`, `title`, `genres`) come from whichever source
/// produced the movie. Everything else is optional metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub movie_id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "genre_list")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// External rating on the 0-10 scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Rating on the 0-5 scale
    #[serde(
        default,
        rename = "csvRating",
        skip_serializing_if = "Option::is_none"
    )]
    pub normalized_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

/// Accepts genres as an array or as a `|`-joined string
fn genre_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Genres {
        List(Vec<String>),
        Joined(String),
    }

    let genres = match Genres::deserialize(deserializer)? {
        Genres::List(genres) => genres,
        Genres::Joined(joined) => joined.split('|').map(str::to_string).collect(),
    };

    Ok(genres
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect())
}

/// A ranked, possibly enriched, catalog search hit
pub type SearchResult = Movie;

impl Movie {
    /// Creates a movie carrying identity fields only
    pub fn new(movie_id: u64, title: impl Into<String>, genres: Vec<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            genres,
            poster: None,
            rating: None,
            normalized_rating: None,
            overview: None,
            release_date: None,
        }
    }

    /// Copies advisory metadata from an external match, keeping local identity
    pub fn enrich_from(&mut self, external: &Movie) {
        self.poster = external.poster.clone();
        self.rating = external.rating;
        self.normalized_rating = external
            .rating
            .filter(|rating| *rating > 0.0)
            .map(crate::services::normalizer::normalize);
        self.overview = external.overview.clone();
        self.release_date = external.release_date.clone();
    }
}

impl From<&CatalogRecord> for Movie {
    fn from(record: &CatalogRecord) -> Self {
        Movie::new(record.id, record.title.clone(), record.genres.clone())
    }
}
