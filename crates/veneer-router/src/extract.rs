//! One-shot param extraction outside of route rendering.

use veneer_params::{parse_query, ParamStore, Params};

use crate::error::Result;
use crate::history::Location;
use crate::path::PathPattern;

/// Matches `location` exactly against `pattern`, stores the captured params
/// and the query, and returns both merged (query wins on collision).
///
/// When the path does not match, the store's params are cleared and only
/// the query is returned.
///
/// ```
/// use veneer_params::ParamStore;
/// use veneer_router::{extract_params, Location};
///
/// let store = ParamStore::with_defaults(["id", "tab"]);
/// let merged = extract_params(&store, "/users/:id", &Location::parse("/users/7?tab=a&x=1")).unwrap();
///
/// assert_eq!(merged.get("id"), Some("7"));
/// assert_eq!(merged.get("tab"), Some("a"));
/// assert_eq!(merged.get("x"), None);
/// ```
pub fn extract_params(store: &ParamStore, pattern: &str, location: &Location) -> Result<Params> {
    let pattern = PathPattern::parse(pattern)?;
    let raw = pattern.match_path(&location.path).unwrap_or_default();
    let state = store.replace(&raw, &parse_query(&location.query));
    Ok(state.params.merge(&state.query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_clears_params() {
        let store = ParamStore::with_defaults(["id", "q"]);
        store.set_params(Params::from_iter([("id", "old")]));

        let merged = extract_params(&store, "/users/:id", &Location::parse("/posts/1?q=x")).unwrap();

        assert_eq!(store.get_param("id"), None);
        assert_eq!(merged.get("q"), Some("x"));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_values_sanitized() {
        let store = ParamStore::with_defaults(["id"]);
        let merged =
            extract_params(&store, "/users/:id", &Location::parse("/users/<script>")).unwrap();
        assert_eq!(merged.get("id"), Some(""));
        assert_eq!(store.get_param("id").as_deref(), Some(""));
    }
}
