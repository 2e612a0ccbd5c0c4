//! Route tree definitions.

use std::fmt;
use std::rc::Rc;

use tracing::warn;
use veneer_dom::Element;
use veneer_params::Params;

use crate::error::RenderResult;
use crate::path::PathPattern;

/// A render callback: `(container, params, query)`.
///
/// The container is detached when the callback runs. Params and query are
/// already filtered to the expected names and sanitized.
pub type RenderFn = Rc<dyn Fn(&mut Element, &Params, &Params) -> RenderResult>;

/// What a route renders.
#[derive(Clone)]
pub struct View {
    /// Renders the route.
    pub element: RenderFn,
    /// Renders instead of `element` when `element` fails.
    pub error_element: Option<RenderFn>,
}

impl View {
    fn new<F>(element: F) -> Self
    where
        F: Fn(&mut Element, &Params, &Params) -> RenderResult + 'static,
    {
        Self {
            element: Rc::new(element),
            error_element: None,
        }
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("error_element", &self.error_element.is_some())
            .finish_non_exhaustive()
    }
}

/// A node in the route tree.
#[derive(Debug, Clone)]
pub enum Route {
    /// A rendered route, optionally with nested routes.
    Page {
        /// Path pattern.
        pattern: PathPattern,
        /// What to render.
        view: View,
        /// Nested routes, matched in order against the rest of the path.
        children: Vec<Route>,
    },
    /// Matching this route navigates to `to` instead of rendering.
    Redirect {
        /// Path pattern.
        pattern: PathPattern,
        /// Target path.
        to: String,
    },
    /// The `*` route: matches anything. Keep it last in its list.
    Fallback {
        /// What to render.
        view: View,
    },
}

impl Route {
    /// Creates a page route.
    ///
    /// ```
    /// use veneer_router::Route;
    ///
    /// let route = Route::page("/users/:id", |container, params, _query| {
    ///     container.append_text(params.get("id").unwrap_or_default());
    ///     Ok(())
    /// });
    /// assert_eq!(route.path(), "/users/:id");
    /// ```
    pub fn page<F>(path: &str, element: F) -> Self
    where
        F: Fn(&mut Element, &Params, &Params) -> RenderResult + 'static,
    {
        Self::Page {
            pattern: PathPattern::new(path),
            view: View::new(element),
            children: Vec::new(),
        }
    }

    /// Creates a redirect route.
    pub fn redirect(path: &str, to: impl Into<String>) -> Self {
        Self::Redirect {
            pattern: PathPattern::new(path),
            to: to.into(),
        }
    }

    /// Creates the `*` fallback route.
    pub fn fallback<F>(element: F) -> Self
    where
        F: Fn(&mut Element, &Params, &Params) -> RenderResult + 'static,
    {
        Self::Fallback {
            view: View::new(element),
        }
    }

    /// Adds a nested route. Ignored for redirect and fallback routes.
    #[must_use]
    pub fn child(mut self, route: Self) -> Self {
        match &mut self {
            Self::Page { children, .. } => children.push(route),
            other => warn!(path = other.path(), "only page routes can have children"),
        }
        self
    }

    /// Adds several nested routes.
    #[must_use]
    pub fn children(self, routes: impl IntoIterator<Item = Self>) -> Self {
        routes.into_iter().fold(self, Self::child)
    }

    /// Sets the view rendered when `element` fails. Ignored for redirects.
    #[must_use]
    pub fn error_element<F>(mut self, error_element: F) -> Self
    where
        F: Fn(&mut Element, &Params, &Params) -> RenderResult + 'static,
    {
        match &mut self {
            Self::Page { view, .. } | Self::Fallback { view } => {
                view.error_element = Some(Rc::new(error_element));
            }
            Self::Redirect { pattern, .. } => {
                warn!(path = pattern.as_str(), "redirect routes do not render");
            }
        }
        self
    }

    /// Returns the path pattern, or `*` for the fallback.
    pub fn path(&self) -> &str {
        match self {
            Self::Page { pattern, .. } | Self::Redirect { pattern, .. } => pattern.as_str(),
            Self::Fallback { .. } => "*",
        }
    }

    /// Returns the compiled pattern, if the route has one.
    pub fn pattern(&self) -> Option<&PathPattern> {
        match self {
            Self::Page { pattern, .. } | Self::Redirect { pattern, .. } => Some(pattern),
            Self::Fallback { .. } => None,
        }
    }

    /// Returns the nested routes.
    pub fn nested(&self) -> &[Self] {
        match self {
            Self::Page { children, .. } => children,
            _ => &[],
        }
    }

    /// Returns the view, if the route renders.
    pub fn view(&self) -> Option<&View> {
        match self {
            Self::Page { view, .. } | Self::Fallback { view } => Some(view),
            Self::Redirect { .. } => None,
        }
    }

    /// Returns the redirect target, if this is a redirect.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Element, _: &Params, _: &Params) -> RenderResult {
        Ok(())
    }

    #[test]
    fn test_page_with_children() {
        let route = Route::page("/users/:id", noop)
            .children([Route::page("/posts/:postId", noop), Route::fallback(noop)]);

        assert_eq!(route.nested().len(), 2);
        assert_eq!(route.nested()[1].path(), "*");
        assert!(route.view().is_some());
    }

    #[test]
    fn test_redirect_has_no_view_or_children() {
        let route = Route::redirect("/old", "/new").child(Route::page("/x", noop));
        assert!(route.view().is_none());
        assert!(route.nested().is_empty());
        assert_eq!(route.redirect_target(), Some("/new"));
    }

    #[test]
    fn test_error_element_attached() {
        let route = Route::page("/", noop).error_element(noop);
        assert!(route.view().unwrap().error_element.is_some());
        assert!(Route::fallback(noop).pattern().is_none());
    }
}
