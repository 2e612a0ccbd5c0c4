//! # veneer-dom
//!
//! DOM-facing building blocks shared by the rest of the toolkit.
//!
//! This crate provides:
//! - The [`Sanitizer`] capability and two stock implementations
//! - An in-memory [`Element`] tree used as a render scratch container
//! - Markup helpers that sanitize every interpolated value
//!
//! ## Sanitizing
//!
//! ```
//! use veneer_dom::{MarkupSanitizer, Sanitizer};
//!
//! let clean = MarkupSanitizer.sanitize(r#"<b onclick="steal()">hi</b>"#);
//! assert_eq!(clean, "<b>hi</b>");
//! ```
//!
//! ## Containers
//!
//! ```
//! use veneer_dom::{Element, MarkupSanitizer};
//!
//! let mut container = Element::new("div");
//! container.set_html("<p>Profile</p>", &MarkupSanitizer);
//! container.append_child(Element::new("div").id("child"));
//!
//! assert!(container.find_by_id("child").is_some());
//! assert_eq!(container.to_html(), r#"<div><p>Profile</p><div id="child"></div></div>"#);
//! ```

mod element;
mod sanitizer;
mod template;

pub use element::{Element, Node};
pub use sanitizer::{html_escape, EscapeSanitizer, MarkupSanitizer, Sanitizer};
pub use template::{mapper, Markup};
