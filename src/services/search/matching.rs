use crate::models::Movie;

/// Removes a trailing ` (YYYY)` release year from a title
pub fn strip_year(title: &str) -> &str {
    let trimmed = title.trim_end();

    let Some(open) = trimmed.rfind('(') else {
        return title.trim();
    };

    let inside = &trimmed[open + 1..];
    let is_year = inside.len() == 5
        && inside.ends_with(')')
        && inside[..4].chars().all(|c| c.is_ascii_digit());

    if is_year {
        trimmed[..open].trim()
    } else {
        title.trim()
    }
}

fn comparable(title: &str) -> String {
    strip_year(title).to_lowercase()
}

/// Picks the external result that best corresponds to a local title
///
/// Preference: same title ignoring case and year, then either title
/// containing the other, then the provider's first result.
pub fn best_match<'a>(local_title: &str, candidates: &'a [Movie]) -> Option<&'a Movie> {
    let wanted = comparable(local_title);

    candidates
        .iter()
        .find(|movie| comparable(&movie.title) == wanted)
        .or_else(|| {
            candidates.iter().find(|movie| {
                let title = comparable(&movie.title);
                title.contains(&wanted) || wanted.contains(&title)
            })
        })
        .or_else(|| candidates.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, title: &str) -> Movie {
        Movie::new(id, title, vec![])
    }

    #[test]
    fn test_strip_year() {
        assert_eq!(strip_year("Toy Story (1995)"), "Toy Story");
        assert_eq!(strip_year("Toy Story (1995)  "), "Toy Story");
        assert_eq!(strip_year("Heat"), "Heat");
        assert_eq!(strip_year("Seven (a.k.a. Se7en) (1995)"), "Seven (a.k.a. Se7en)");
        assert_eq!(strip_year("Brazil (film)"), "Brazil (film)");
        assert_eq!(strip_year("1984 (19845)"), "1984 (19845)");
    }

    #[test]
    fn test_exact_match_preferred() {
        let candidates = vec![
            movie(1, "Heat Wave"),
            movie(2, "HEAT"),
            movie(3, "Heat (1986)"),
        ];
        assert_eq!(best_match("Heat (1995)", &candidates).map(|m| m.movie_id), Some(2));
    }

    #[test]
    fn test_substring_match_second() {
        let candidates = vec![
            movie(1, "Something Else"),
            movie(2, "Alien: Resurrection"),
            movie(3, "Aliens"),
        ];
        assert_eq!(
            best_match("Aliens (1986)", &candidates).map(|m| m.movie_id),
            Some(3)
        );
        assert_eq!(
            best_match("Alien (1979)", &candidates).map(|m| m.movie_id),
            Some(2)
        );
    }

    #[test]
    fn test_first_result_fallback() {
        let candidates = vec![movie(10, "El origen"), movie(11, "Inception: The Cobol Job")];
        assert_eq!(
            best_match("Inception (2010)", &candidates).map(|m| m.movie_id),
            Some(11)
        );

        let candidates = vec![movie(10, "El origen"), movie(12, "Origen")];
        assert_eq!(
            best_match("Inception (2010)", &candidates).map(|m| m.movie_id),
            Some(10)
        );
    }

    #[test]
    fn test_no_candidates() {
        assert!(best_match("Heat", &[]).is_none());
    }
}
