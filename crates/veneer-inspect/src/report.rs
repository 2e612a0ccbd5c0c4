//! `resolve` and `tree` reports.

use std::fmt;
use std::fmt::Write as _;

use tracing::debug;
use veneer_params::Params;
use veneer_router::{MemoryHistory, Navigation, Route, Router, Viewport};

use crate::error::Result;
use crate::manifest::Manifest;

/// What a router did with one href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// History entry the router ended on, after redirects.
    pub location: String,
    pub outcome: Navigation,
    /// Params left in the store.
    pub params: Params,
    /// Query left in the store.
    pub query: Params,
    /// Mounted HTML, if anything was rendered.
    pub html: Option<String>,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "location: {}", self.location)?;
        match &self.outcome {
            Navigation::Rendered { pattern } => writeln!(f, "outcome:  rendered {pattern}")?,
            Navigation::Fallback => writeln!(f, "outcome:  fallback")?,
            Navigation::Unmatched => writeln!(f, "outcome:  no route matched")?,
            Navigation::Queued => writeln!(f, "outcome:  queued")?,
        }
        writeln!(f, "params:   {}", self.params)?;
        writeln!(f, "query:    {}", self.query)?;
        if let Some(html) = &self.html {
            writeln!(f, "html:     {html}")?;
        }
        Ok(())
    }
}

/// Runs `href` through a router built from `manifest`.
///
/// The router starts at `/`, so a manifest whose `/` redirects forever
/// fails before `href` is tried.
pub fn resolve(manifest: &Manifest, href: &str) -> Result<Resolution> {
    let history = MemoryHistory::new("/");
    let viewport = Viewport::new();
    let router = Router::builder(history.clone())
        .options(manifest.options.clone())
        .mount(viewport.clone())
        .routes(manifest.build_routes()?)
        .build()?;
    let before = viewport.mount_count();

    let outcome = router.navigate(href)?;
    debug!(href, ?outcome, "navigation finished");

    let state = router.store().state();
    Ok(Resolution {
        location: history.current(),
        outcome,
        params: state.params,
        query: state.query,
        html: (viewport.mount_count() > before).then(|| viewport.to_html()),
    })
}

/// Lists a route tree, one route per line, indented by depth.
///
/// ```
/// use veneer_inspect::{render_tree, Manifest};
///
/// let manifest = Manifest::from_json(r#"{ "routes": [
///     { "path": "/a", "children": [{ "path": "/b" }] },
///     { "path": "/old", "routeTo": "/a" }
/// ] }"#).unwrap();
///
/// assert_eq!(render_tree(&manifest.build_routes().unwrap()), "/a\n  /b\n/old -> /a\n");
/// ```
pub fn render_tree(routes: &[Route]) -> String {
    let mut out = String::new();
    write_level(&mut out, routes, 0);
    out
}

fn write_level(out: &mut String, routes: &[Route], depth: usize) {
    for route in routes {
        let indent = "  ".repeat(depth);
        // Writing to a String cannot fail.
        let _ = match route.redirect_target() {
            Some(to) => writeln!(out, "{indent}{} -> {to}", route.path()),
            None => writeln!(out, "{indent}{}", route.path()),
        };
        write_level(out, route.nested(), depth + 1);
    }
}
