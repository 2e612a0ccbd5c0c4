//! Route tree matching.

use veneer_params::Params;

use crate::route::Route;

/// One level of a match: a route and the params visible at that level.
#[derive(Debug, Clone)]
pub struct MatchedRoute<'r> {
    /// The matched route.
    pub route: &'r Route,
    /// Inherited params merged with the ones this route captured.
    pub params: Params,
    /// Part of the path left for nested routes.
    pub remainder: String,
}

/// The result of matching a path against a route tree.
///
/// `chain` runs from the top-level route down to the deepest match. The
/// deepest route is the one that "matched"; its ancestors only supplied a
/// path prefix and inherited params.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    chain: Vec<MatchedRoute<'r>>,
}

impl<'r> RouteMatch<'r> {
    /// The deepest matched route.
    pub fn route(&self) -> &'r Route {
        self.leaf().route
    }

    /// Params of the deepest matched route, including inherited ones.
    pub fn params(&self) -> &Params {
        &self.leaf().params
    }

    /// Every matched level, outermost first.
    pub fn chain(&self) -> &[MatchedRoute<'r>] {
        &self.chain
    }

    /// Consumes the match and returns its levels.
    pub fn into_chain(self) -> Vec<MatchedRoute<'r>> {
        self.chain
    }

    fn leaf(&self) -> &MatchedRoute<'r> {
        // A match always holds at least one level.
        &self.chain[self.chain.len() - 1]
    }
}

/// Strips a query string and fragment from `path`.
pub fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Finds the first route in `routes` matching `path`.
///
/// Routes are tried in order and the first match wins. `*` matches
/// unconditionally. When a matching route has children, they are matched
/// against the rest of the path with the merged params, and a matching
/// child takes the parent's place as the result. A parent with no
/// matching child is returned itself.
///
/// ```
/// use veneer_params::Params;
/// use veneer_router::{match_routes, Route};
///
/// let routes = vec![Route::page("/users/:id", |_, _, _| Ok(()))
///     .child(Route::page("/posts/:postId", |_, _, _| Ok(())))];
///
/// let m = match_routes("/users/42/posts/7?x=1", &routes, &Params::new()).unwrap();
/// assert_eq!(m.route().path(), "/posts/:postId");
/// assert_eq!(m.params().get("id"), Some("42"));
/// assert_eq!(m.params().get("postId"), Some("7"));
/// assert_eq!(m.chain().len(), 2);
/// ```
pub fn match_routes<'r>(
    path: &str,
    routes: &'r [Route],
    inherited: &Params,
) -> Option<RouteMatch<'r>> {
    let chain = match_level(strip_query(path), routes, inherited)?;
    Some(RouteMatch { chain })
}

fn match_level<'r>(
    path: &str,
    routes: &'r [Route],
    inherited: &Params,
) -> Option<Vec<MatchedRoute<'r>>> {
    for route in routes {
        let Some(pattern) = route.pattern() else {
            return Some(vec![MatchedRoute {
                route,
                params: inherited.clone(),
                remainder: String::new(),
            }]);
        };

        let Some(found) = pattern.match_prefix(path) else {
            continue;
        };

        let params = inherited.merge(&found.params);
        let children = route.nested();

        let tail = if children.is_empty() {
            None
        } else {
            match_level(found.remainder, children, &params)
        };

        let mut chain = vec![MatchedRoute {
            route,
            params,
            remainder: found.remainder.to_string(),
        }];
        chain.extend(tail.unwrap_or_default());
        return Some(chain);
    }

    None
}

#[cfg(test)]
mod tests {
    use veneer_dom::Element;

    use super::*;
    use crate::error::RenderResult;

    fn noop(_: &mut Element, _: &Params, _: &Params) -> RenderResult {
        Ok(())
    }

    fn matched<'r>(path: &str, routes: &'r [Route]) -> Option<RouteMatch<'r>> {
        match_routes(path, routes, &Params::new())
    }

    #[test]
    fn test_first_match_wins() {
        let routes = vec![
            Route::page("/users/:id", noop),
            Route::page("/users/me", noop),
        ];
        let m = matched("/users/me", &routes).unwrap();
        assert_eq!(m.route().path(), "/users/:id");
        assert_eq!(m.params().get("id"), Some("me"));
    }

    #[test]
    fn test_no_match() {
        let routes = vec![Route::page("/a", noop)];
        assert!(matched("/b", &routes).is_none());
        assert!(matched("/b", &[]).is_none());
    }

    #[test]
    fn test_wildcard_matches_anything_with_inherited() {
        let routes = vec![Route::page("/a", noop), Route::fallback(noop)];
        let inherited = Params::from_iter([("lang", "en")]);
        let m = match_routes("/zzz", &routes, &inherited).unwrap();

        assert_eq!(m.route().path(), "*");
        assert_eq!(m.params(), &inherited);
        assert_eq!(matched("*", &routes).unwrap().route().path(), "*");
    }

    #[test]
    fn test_query_ignored() {
        let routes = vec![Route::page("/search", noop)];
        assert!(matched("/search?q=rust", &routes).is_some());
        assert!(matched("/search#top", &routes).is_some());
    }

    #[test]
    fn test_nested_child_replaces_parent() {
        let routes = vec![Route::page("/users/:id", noop)
            .child(Route::page("/posts/:postId", noop))];
        let m = matched("/users/42/posts/7", &routes).unwrap();

        assert_eq!(m.route().path(), "/posts/:postId");
        assert_eq!(m.chain()[0].route.path(), "/users/:id");
        assert_eq!(m.chain()[0].params.len(), 1);
        assert_eq!(m.chain()[0].remainder, "/posts/7");
        assert_eq!(m.params().get("id"), Some("42"));
        assert_eq!(m.params().get("postId"), Some("7"));
    }

    #[test]
    fn test_parent_returned_without_child_match() {
        let routes = vec![Route::page("/users/:id", noop)
            .child(Route::page("/posts/:postId", noop))];
        let m = matched("/users/42/settings", &routes).unwrap();
        assert_eq!(m.route().path(), "/users/:id");
        assert_eq!(m.chain().len(), 1);
    }

    #[test]
    fn test_child_param_overrides_inherited() {
        let routes = vec![Route::page("/org/:id", noop).child(Route::page("/team/:id", noop))];
        let m = matched("/org/1/team/2", &routes).unwrap();
        assert_eq!(m.params().get("id"), Some("2"));
        assert_eq!(m.chain()[0].params.get("id"), Some("1"));
    }

    #[test]
    fn test_three_levels() {
        let routes = vec![Route::page("/a", noop)
            .child(Route::page("/b/:x", noop).child(Route::page("/c/:y", noop)))];
        let m = matched("/a/b/1/c/2", &routes).unwrap();
        assert_eq!(m.chain().len(), 3);
        assert_eq!(m.route().path(), "/c/:y");
        assert_eq!(m.params().len(), 2);
    }

    #[test]
    fn test_nested_fallback() {
        let routes = vec![Route::page("/docs", noop)
            .children([Route::page("/intro", noop), Route::fallback(noop)])];
        let m = matched("/docs/missing", &routes).unwrap();
        assert_eq!(m.route().path(), "*");
        assert_eq!(m.chain().len(), 2);
    }

    #[test]
    fn test_index_child_only_matches_empty_remainder() {
        let routes = vec![Route::page("/docs", noop)
            .children([Route::page("/", noop), Route::page("/intro", noop)])];
        assert_eq!(matched("/docs", &routes).unwrap().route().path(), "/");
        assert_eq!(matched("/docs/", &routes).unwrap().route().path(), "/");
        assert_eq!(matched("/docs/intro", &routes).unwrap().route().path(), "/intro");
    }

    #[test]
    fn test_redirect_route_matches() {
        let routes = vec![Route::redirect("/old", "/new")];
        let m = matched("/old", &routes).unwrap();
        assert_eq!(m.route().redirect_target(), Some("/new"));
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/a?b=1#c"), "/a");
        assert_eq!(strip_query("/a#c?x"), "/a");
        assert_eq!(strip_query("/a"), "/a");
    }
}
