//! # veneer-inspect
//!
//! Loads a JSON route manifest and runs it through a real
//! [`veneer_router::Router`] over an in-memory history, so route tables can
//! be checked without a browser.
//!
//! ```
//! use veneer_inspect::{resolve, Manifest};
//! use veneer_router::Navigation;
//!
//! let manifest = Manifest::from_json(r#"{
//!     "expectedParams": ["id"],
//!     "routes": [{ "path": "/users/:id" }]
//! }"#).unwrap();
//!
//! let report = resolve(&manifest, "/users/42").unwrap();
//! assert_eq!(report.outcome, Navigation::Rendered { pattern: "/users/:id".into() });
//! assert_eq!(report.params.get("id"), Some("42"));
//! ```

mod error;
mod manifest;
mod report;

pub use error::{InspectError, Result};
pub use manifest::{Manifest, RouteSpec};
pub use report::{render_tree, resolve, Resolution};
