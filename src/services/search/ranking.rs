use crate::models::CatalogRecord;

/// Minimum trimmed query length, in characters
pub const MIN_QUERY_CHARS: usize = 2;

/// Priority bucket a title falls into for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    /// Title equals the query
    Exact,
    /// Title starts with or contains the query
    Partial,
    /// A word of the title starts with the query, or the query contains it
    Fuzzy,
}

/// Lower-cases and trims a title or query for comparison
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whether a raw query is long enough to search for
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Words of a title; empty pieces are skipped since every query contains the empty string
fn title_words(title: &str) -> impl Iterator<Item = &str> {
    title
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '-'))
        .filter(|word| !word.is_empty())
}

/// Classifies a normalized title against a normalized query
///
/// Tiers are checked in priority order, so a title gets at most one.
pub fn classify(title: &str, query: &str) -> Option<MatchTier> {
    if title == query {
        Some(MatchTier::Exact)
    } else if title.starts_with(query) || title.contains(query) {
        Some(MatchTier::Partial)
    } else if title_words(title).any(|word| word.starts_with(query) || query.contains(word)) {
        Some(MatchTier::Fuzzy)
    } else {
        None
    }
}

/// Ranks catalog records for a query, best tier first, catalog order within a tier
pub fn rank<'a>(records: &'a [CatalogRecord], query: &str, limit: usize) -> Vec<&'a CatalogRecord> {
    if !is_searchable(query) || limit == 0 {
        return Vec::new();
    }

    let query = normalize_text(query);
    let mut exact = Vec::new();
    let mut partial = Vec::new();
    let mut fuzzy = Vec::new();

    for record in records {
        match classify(&normalize_text(&record.title), &query) {
            Some(MatchTier::Exact) => exact.push(record),
            Some(MatchTier::Partial) => partial.push(record),
            Some(MatchTier::Fuzzy) => fuzzy.push(record),
            None => {}
        }
    }

    exact
        .into_iter()
        .chain(partial)
        .chain(fuzzy)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, title: &str) -> CatalogRecord {
        CatalogRecord {
            id,
            title: title.to_string(),
            genres: vec![],
        }
    }

    fn titles(ranked: &[&CatalogRecord]) -> Vec<String> {
        ranked.iter().map(|r| r.title.clone()).collect()
    }

    #[test]
    fn test_short_queries_return_nothing() {
        let records = vec![record(1, "A"), record(2, "Up")];
        assert!(rank(&records, "", 10).is_empty());
        assert!(rank(&records, "a", 10).is_empty());
        assert!(rank(&records, "  u  ", 10).is_empty());
        assert_eq!(rank(&records, " up ", 10).len(), 1);
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let records = vec![
            record(2, "Interstellar"),
            record(3, "Inception"),
            record(1, "Her"),
            record(4, "Mother!"),
        ];

        let ranked = rank(&records, "her", 10);
        assert_eq!(titles(&ranked)[0], "Her");
        assert_eq!(titles(&ranked), vec!["Her", "Mother!"]);
    }

    #[test]
    fn test_exact_short_title_beats_longer_matches() {
        let records = vec![
            record(1, "Her"),
            record(2, "Interstellar"),
            record(3, "Inception"),
        ];
        assert_eq!(titles(&rank(&records, "her", 10)), vec!["Her"]);
    }

    #[test]
    fn test_partial_keeps_catalog_order() {
        let records = vec![
            record(1, "The Matrix Reloaded (2003)"),
            record(2, "Matrix, The (1999)"),
            record(3, "The Matrix Revolutions (2003)"),
        ];

        let ranked = rank(&records, "matrix", 10);
        assert_eq!(
            ranked.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_fuzzy_word_prefix_and_query_containing_word() {
        assert_eq!(classify("star wars", "wa"), Some(MatchTier::Partial));
        assert_eq!(
            classify("the lord of the rings", "lordly"),
            Some(MatchTier::Fuzzy)
        );
        assert_eq!(classify("heat (1995)", "heatwave"), Some(MatchTier::Fuzzy));
        assert_eq!(classify("alien", "predator"), None);
    }

    #[test]
    fn test_trailing_punctuation_does_not_match_everything() {
        // Splitting "heat (1995)" leaves an empty token after ')'
        assert_eq!(classify("heat (1995)", "zodiac"), None);
    }

    #[test]
    fn test_tiers_are_exclusive() {
        let records = vec![
            record(1, "Up"),
            record(2, "Up in the Air"),
            record(3, "Pixar Up-close"),
        ];

        let query = normalize_text("up");
        let tiers: Vec<Option<MatchTier>> = records
            .iter()
            .map(|r| classify(&normalize_text(&r.title), &query))
            .collect();
        assert_eq!(
            tiers,
            vec![
                Some(MatchTier::Exact),
                Some(MatchTier::Partial),
                Some(MatchTier::Partial),
            ]
        );

        let ranked = rank(&records, "up", 10);
        let mut ids: Vec<u64> = ranked.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_tier_order_across_catalog() {
        let records = vec![
            record(1, "Toy Story (1995)"),
            record(2, "Story of Us, The (1999)"),
            record(3, "Toy"),
            record(4, "Toys (1992)"),
        ];

        let ranked = rank(&records, "toy", 10);
        assert_eq!(
            ranked.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![3, 1, 4]
        );
    }

    #[test]
    fn test_limit_truncates_after_tiering() {
        let records = vec![
            record(1, "Alien Resurrection"),
            record(2, "Aliens"),
            record(3, "Alien"),
        ];

        let ranked = rank(&records, "alien", 2);
        assert_eq!(ranked.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 1]);
        assert!(rank(&records, "alien", 0).is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let records = vec![record(1, "HEAT")];
        assert_eq!(rank(&records, "  Heat ", 5).len(), 1);
    }
}
