/// Rescales a 0-10 external rating to the 0-5 scale used across the app
///
/// Out-of-range input is scaled, not rejected.
pub fn normalize(external_rating: f64) -> f64 {
    external_rating / 10.0 * 5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bounds() {
        assert_eq!(normalize(0.0), 0.0);
        assert_eq!(normalize(10.0), 5.0);
    }

    #[test]
    fn test_normalize_fraction() {
        assert_eq!(normalize(7.5), 3.75);
    }

    #[test]
    fn test_normalize_out_of_range_is_scaled() {
        assert_eq!(normalize(20.0), 10.0);
        assert_eq!(normalize(-2.0), -1.0);
    }
}
