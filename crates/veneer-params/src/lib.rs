//! # veneer-params
//!
//! Reactive state for the current route's path parameters and query values.
//!
//! The [`ParamStore`] only keeps names listed in its allow-list of expected
//! parameters, and every value is sanitized on the way in. Anything a URL
//! carries beyond that list is dropped instead of being forwarded into the
//! DOM.
//!
//! ```
//! use veneer_params::{parse_query, ParamStore, Params};
//!
//! let store = ParamStore::with_defaults(["id", "tab"]);
//! store.set_params(Params::from_iter([("id", "42"), ("debug", "1")]));
//! store.set_query(parse_query("?tab=posts&utm=x"));
//!
//! assert_eq!(store.get_param("id").as_deref(), Some("42"));
//! assert_eq!(store.get_param("debug"), None);
//! assert_eq!(store.get_query("tab").as_deref(), Some("posts"));
//! ```
//!
//! [`Signal`] is the underlying reactive cell and can be used on its own.

mod params;
mod query;
mod signal;
mod store;

pub use params::Params;
pub use query::parse_query;
pub use signal::{Signal, Subscription};
pub use store::{ParamState, ParamStore};
