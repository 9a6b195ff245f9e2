//! Line-level parsing for the MovieLens style CSV files.
//!
//! Malformed lines are not errors: every parser returns [`LineOutcome`] and the
//! caller simply drops `Skip`s.

use crate::models::CatalogRecord;

/// Result of parsing one line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome<T> {
    Record(T),
    Skip,
}

impl<T> LineOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            LineOutcome::Record(record) => Some(record),
            LineOutcome::Skip => None,
        }
    }
}

impl<T> From<Option<T>> for LineOutcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(LineOutcome::Skip, LineOutcome::Record)
    }
}

/// One accepted row of `ratings.csv`
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSample {
    pub user_id: u64,
    pub item_id: u64,
    pub value: f64,
    pub timestamp: i64,
}

/// One accepted row of `links.csv`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRow {
    pub item_id: u64,
    pub external_id: u64,
}

/// Splits on commas, treating `"` as a toggle that suppresses splitting
///
/// Quote characters are dropped from the output.
pub fn split_quoted(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);

    fields
}

fn positive_id(field: &str) -> Option<u64> {
    field.trim().parse::<u64>().ok().filter(|id| *id > 0)
}

/// Parses a `movies.csv` row: `movieId,title,genres`
pub fn parse_catalog_line(line: &str) -> LineOutcome<CatalogRecord> {
    let fields = split_quoted(line.trim_end_matches('\r'));
    if fields.len() < 3 {
        return LineOutcome::Skip;
    }

    let Some(id) = positive_id(&fields[0]) else {
        return LineOutcome::Skip;
    };

    let genres = fields[2]
        .split('|')
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect();

    LineOutcome::Record(CatalogRecord {
        id,
        title: fields[1].clone(),
        genres,
    })
}

/// Parses a `ratings.csv` row: `userId,movieId,rating,timestamp`
///
/// Only the item id and rating are required. Ratings outside `[1, 5]` are skipped.
pub fn parse_rating_line(line: &str) -> LineOutcome<RatingSample> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 3 {
        return LineOutcome::Skip;
    }

    let Some(item_id) = positive_id(fields[1]) else {
        return LineOutcome::Skip;
    };

    let value = match fields[2].parse::<f64>() {
        Ok(value) if (1.0..=5.0).contains(&value) => value,
        _ => return LineOutcome::Skip,
    };

    LineOutcome::Record(RatingSample {
        user_id: fields[0].parse().unwrap_or_default(),
        item_id,
        value,
        timestamp: fields.get(3).and_then(|ts| ts.parse().ok()).unwrap_or_default(),
    })
}

/// Parses a `links.csv` row: `movieId,imdbId,tmdbId`
pub fn parse_link_line(line: &str) -> LineOutcome<LinkRow> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 3 {
        return LineOutcome::Skip;
    }

    match (positive_id(fields[0]), positive_id(fields[2])) {
        (Some(item_id), Some(external_id)) => LineOutcome::Record(LinkRow {
            item_id,
            external_id,
        }),
        _ => LineOutcome::Skip,
    }
}

/// Reassembles lines from arbitrarily split byte chunks
///
/// Bytes are only decoded at `\n` boundaries, so a multi-byte character split
/// across two chunks still decodes. The first non-empty line is treated as the
/// header and withheld.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    header_seen: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns every complete, non-empty data line in it
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        String::from_utf8_lossy(&complete)
            .split('\n')
            .filter_map(|line| self.accept(line))
            .collect()
    }

    /// Returns the trailing partial line, if it holds data
    pub fn finish(mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        let line = String::from_utf8_lossy(&rest).into_owned();
        self.accept(&line)
    }

    fn accept(&mut self, line: &str) -> Option<String> {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            return None;
        }
        if !self.header_seen {
            self.header_seen = true;
            return None;
        }
        Some(line.to_string())
    }
}

/// Splits a whole file into data lines, dropping the header and blank lines
pub fn data_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .skip(1)
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
}
