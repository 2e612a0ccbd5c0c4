//! JSON route manifests.

use std::path::Path;

use ironhtml::typed::Element as Html;
use ironhtml_elements::{Code, Div, H5, P};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use veneer_dom::{Element, MarkupSanitizer};
use veneer_params::Params;
use veneer_router::{PathPattern, RenderResult, Route, RouterOptions};

use crate::error::{InspectError, Result};

/// One route entry in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    /// Path pattern, or `*` for the fallback.
    pub path: String,
    /// Redirect target. Makes this a redirect route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_to: Option<String>,
    /// Nested routes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteSpec>,
}

/// A route table plus the router options to run it with.
///
/// ```
/// use veneer_inspect::Manifest;
///
/// let manifest = Manifest::from_json(r#"{
///     "expectedParams": ["id"],
///     "routes": [{ "path": "/users/:id" }, { "path": "*" }]
/// }"#).unwrap();
///
/// assert_eq!(manifest.options.outlet_id, "child");
/// assert_eq!(manifest.routes.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(flatten)]
    pub options: RouterOptions,
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

impl Manifest {
    /// Parses a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| InspectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "manifest loaded");
        Self::from_json(&json)
    }

    /// Adds names to the allow-list, skipping ones already present.
    pub fn expect<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.options.expected_params.contains(&name) {
                self.options.expected_params.push(name);
            }
        }
    }

    /// Builds the route tree. Every page renders a summary card of the
    /// params it received.
    pub fn build_routes(&self) -> Result<Vec<Route>> {
        self.routes
            .iter()
            .map(|spec| build_route(spec, &self.options.outlet_id))
            .collect()
    }
}

fn build_route(spec: &RouteSpec, outlet_id: &str) -> Result<Route> {
    if spec.path == "*" {
        if spec.route_to.is_some() || !spec.children.is_empty() {
            warn!("`*` route ignores routeTo and children");
        }
        return Ok(Route::fallback(not_found_view));
    }

    // Route constructors panic on bad patterns; check first.
    PathPattern::parse(&spec.path)?;

    if let Some(to) = &spec.route_to {
        if !spec.children.is_empty() {
            warn!(path = %spec.path, "redirect route ignores children");
        }
        return Ok(Route::redirect(&spec.path, to.as_str()));
    }

    let outlet = (!spec.children.is_empty()).then(|| outlet_id.to_string());
    let route = Route::page(&spec.path, page_view(spec.path.clone(), outlet));

    spec.children
        .iter()
        .map(|child| build_route(child, outlet_id))
        .collect::<Result<Vec<_>>>()
        .map(|children| route.children(children))
}

fn page_view(
    pattern: String,
    outlet: Option<String>,
) -> impl Fn(&mut Element, &Params, &Params) -> RenderResult + 'static {
    move |container, params, query| {
        let card = Html::<Div>::new()
            .class("route")
            .attr("data-pattern", &pattern)
            .child::<H5, _>(|h| h.text(&pattern))
            .child::<P, _>(|p| {
                p.text("params ")
                    .child::<Code, _>(|c| c.text(&params.to_string()))
            })
            .child::<P, _>(|p| {
                p.text("query ")
                    .child::<Code, _>(|c| c.text(&query.to_string()))
            })
            .render();

        container.set_html(&card, &MarkupSanitizer);
        if let Some(id) = &outlet {
            container.append_child(Element::new("div").id(id.as_str()));
        }
        Ok(())
    }
}

fn not_found_view(container: &mut Element, _: &Params, query: &Params) -> RenderResult {
    let card = Html::<Div>::new()
        .class("route not-found")
        .child::<H5, _>(|h| h.text("Not found"))
        .child::<P, _>(|p| {
            p.text("query ")
                .child::<Code, _>(|c| c.text(&query.to_string()))
        })
        .render();
    container.set_html(&card, &MarkupSanitizer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG: &str = r#"{
        "expectedParams": ["id"],
        "maxRedirects": 4,
        "routes": [
            { "path": "/users/:id", "children": [{ "path": "/posts/:postId" }] },
            { "path": "/old", "routeTo": "/users/1" },
            { "path": "*" }
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_json(BLOG).unwrap();

        assert_eq!(manifest.options.expected_params, vec!["id"]);
        assert_eq!(manifest.options.max_redirects, 4);
        assert_eq!(manifest.options.container_tag, "div");
        assert_eq!(manifest.routes[0].children[0].path, "/posts/:postId");
        assert_eq!(manifest.routes[1].route_to.as_deref(), Some("/users/1"));
    }

    #[test]
    fn test_build_routes() {
        let routes = Manifest::from_json(BLOG).unwrap().build_routes().unwrap();

        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].nested()[0].path(), "/posts/:postId");
        assert_eq!(routes[1].redirect_target(), Some("/users/1"));
        assert!(matches!(routes[2], Route::Fallback { .. }));
    }

    #[test]
    fn test_expect_merges_without_duplicates() {
        let mut manifest = Manifest::from_json(BLOG).unwrap();
        manifest.expect(["id", "postId"]);
        assert_eq!(manifest.options.expected_params, vec!["id", "postId"]);
    }

    #[test]
    fn test_page_view_adds_outlet_for_parents() {
        let view = page_view("/users/:id".to_string(), Some("child".to_string()));
        let mut container = Element::new("div");

        view(&mut container, &Params::from_iter([("id", "7")]), &Params::new()).unwrap();

        assert!(container.find_by_id("child").is_some());
        assert!(container.to_html().contains("/users/:id"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Manifest::from_json("{ routes: }"),
            Err(InspectError::Json(_))
        ));
    }
}
