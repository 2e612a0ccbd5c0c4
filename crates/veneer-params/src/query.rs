//! Query string parsing.

use crate::params::Params;

/// Parses a query string into [`Params`].
///
/// A leading `?` is ignored. Keys and values are form-urlencoded (`+` is a
/// space, `%XX` is decoded). When a key repeats, the last value wins.
pub fn parse_query(search: &str) -> Params {
    let search = search.strip_prefix('?').unwrap_or(search);
    url::form_urlencoded::parse(search.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_parsing() {
        let query = parse_query("name=John+Doe&age=30&city=New%20York");
        assert_eq!(query.get("name"), Some("John Doe"));
        assert_eq!(query.get("age"), Some("30"));
        assert_eq!(query.get("city"), Some("New York"));
    }

    #[test]
    fn test_leading_question_mark() {
        let query = parse_query("?debug=1");
        assert_eq!(query.get("debug"), Some("1"));
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn test_empty_and_valueless() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
        assert_eq!(parse_query("flag").get("flag"), Some(""));
    }

    #[test]
    fn test_last_duplicate_wins() {
        assert_eq!(parse_query("a=1&a=2").get("a"), Some("2"));
    }
}
