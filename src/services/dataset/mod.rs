//! Local MovieLens datasets: the movie catalog, the ratings log and the TMDB
//! id mapping.

pub mod catalog;
pub mod csv;
pub mod ratings;
pub mod source;

#[cfg(test)]
pub mod testing;

pub use catalog::CatalogLoader;
pub use ratings::{AggregatedRating, IdentifierMapping, RatingAggregator};
pub use source::{from_location, DataSource, FileSource, HttpSource};
