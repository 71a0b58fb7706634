//! Canonical cache key derivation
//!
//! Two logically identical requests must land on the same key no matter the
//! order their parameters were supplied in, so parameter names are sorted
//! before rendering. Keys are derived from caller-supplied parameters only;
//! merged defaults such as the API key never appear in them.

/// Builds the canonical key for an endpoint and its parameters.
///
/// With no parameters the key is the endpoint alone. Otherwise parameters are
/// sorted lexicographically by name, rendered as `name=value` joined by `&`,
/// and appended as `endpoint?sorted`.
pub fn build_key<'a, I>(endpoint: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = params.into_iter().collect();
    if pairs.is_empty() {
        return endpoint.to_string();
    }

    pairs.sort_by(|a, b| a.0.cmp(b.0));
    let query = pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{endpoint}?{query}")
}

/// Renders a multi-valued parameter as a single value.
///
/// The separator is a fixed `,` so the rendering is unambiguous and the key
/// matches exactly what the request sends.
pub fn join_values<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_params_yields_endpoint_alone() {
        assert_eq!(build_key("/movie/popular", []), "/movie/popular");
    }

    #[test]
    fn test_params_are_sorted_by_name() {
        let key = build_key("/discover/movie", [("year", "2024"), ("page", "2")]);
        assert_eq!(key, "/discover/movie?page=2&year=2024");
    }

    #[test]
    fn test_insertion_order_does_not_change_the_key() {
        let forward = build_key("e", [("a", "1"), ("b", "2")]);
        let reversed = build_key("e", [("b", "2"), ("a", "1")]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_different_values_yield_different_keys() {
        assert_ne!(build_key("e", [("a", "1")]), build_key("e", [("a", "2")]));
    }

    #[test]
    fn test_join_values_uses_comma() {
        assert_eq!(join_values(&["28", "12", "16"]), "28,12,16");
        assert_eq!(join_values::<&str>(&[]), "");
    }
}
