//! # veneer-router
//!
//! A nested client-side router for vanilla single-page applications.
//!
//! This crate provides:
//! - Path pattern matching with `:name` parameters
//! - Nested routes rendered into parent outlets
//! - A `*` fallback route and redirect routes
//! - Query parsing and param store sync, with every URL-derived value
//!   filtered to an allow-list and sanitized before a view sees it
//!
//! ## Quick Start
//!
//! ```
//! use veneer_dom::Element;
//! use veneer_router::{MemoryHistory, Route, Router, Viewport};
//!
//! let viewport = Viewport::new();
//! let router = Router::builder(MemoryHistory::new("/"))
//!     .expected_params(["id", "postId"])
//!     .mount(viewport.clone())
//!     .route(
//!         Route::page("/users/:id", |container, params, _query| {
//!             container.append_child(Element::new("h1").text(params.get("id").unwrap_or_default()));
//!             container.append_child(Element::new("div").id("child"));
//!             Ok(())
//!         })
//!         .child(Route::page("/posts/:postId", |container, params, _query| {
//!             container.append_text(params.get("postId").unwrap_or_default());
//!             Ok(())
//!         })),
//!     )
//!     .route(Route::fallback(|container, _, _| {
//!         container.append_text("not found");
//!         Ok(())
//!     }))
//!     .build()
//!     .unwrap();
//!
//! router.navigate("/users/42/posts/7").unwrap();
//! assert_eq!(
//!     viewport.to_html(),
//!     r#"<div><h1>42</h1><div id="child"><div data-route="/posts/:postId">7</div></div></div>"#
//! );
//! ```
//!
//! ## Browser integration
//!
//! Implement [`History`] over `window.history`/`window.location` and
//! [`Mount`] over the app's root element, then install
//! [`Router::pop_state_listener`] as the `popstate` handler.

mod error;
mod extract;
mod history;
mod matcher;
mod mount;
mod options;
mod path;
mod route;
mod router;

pub use error::{RenderError, RenderResult, Result, RouterError};
pub use extract::extract_params;
pub use history::{History, Location, MemoryHistory};
pub use matcher::{match_routes, strip_query, MatchedRoute, RouteMatch};
pub use mount::{Mount, Viewport};
pub use options::RouterOptions;
pub use path::{PathPattern, PathSegment, PrefixMatch};
pub use route::{RenderFn, Route, View};
pub use router::{Navigation, Navigator, Phase, Router, RouterBuilder};
