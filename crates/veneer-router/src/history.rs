//! Browser history abstraction.

use std::cell::RefCell;
use std::rc::Rc;

/// The current path and query string, without protocol or host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Path part, e.g. `/users/42`.
    pub path: String,
    /// Query part without the leading `?`. Empty if there is none.
    pub query: String,
}

impl Location {
    /// Splits an href into path and query. Any `#fragment` is dropped.
    ///
    /// ```
    /// use veneer_router::Location;
    ///
    /// let loc = Location::parse("/users/42?tab=posts#top");
    /// assert_eq!(loc.path, "/users/42");
    /// assert_eq!(loc.query, "tab=posts");
    /// ```
    pub fn parse(href: &str) -> Self {
        let href = href.split_once('#').map_or(href, |(before, _)| before);
        let (path, query) = href.split_once('?').unwrap_or((href, ""));
        let path = if path.is_empty() { "/" } else { path };

        Self {
            path: path.to_string(),
            query: query.to_string(),
        }
    }

    /// Path plus `?query` when a query is present.
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// Session history the router reads and pushes to.
///
/// In a browser this wraps `window.history` and `window.location`; the
/// host forwards `popstate` events to [`Router::handle_pop_state`].
///
/// [`Router::handle_pop_state`]: crate::Router::handle_pop_state
pub trait History {
    /// Returns the current location.
    fn location(&self) -> Location;

    /// Pushes a new entry and makes it current.
    fn push(&mut self, href: &str);

    /// Moves one entry back. Returns false if already at the start.
    fn back(&mut self) -> bool;

    /// Moves one entry forward. Returns false if already at the end.
    fn forward(&mut self) -> bool;
}

#[derive(Debug)]
struct Stack {
    entries: Vec<String>,
    index: usize,
}

/// In-memory history stack.
///
/// Cloning yields another handle to the same stack, so a caller can keep a
/// handle after giving one to the router.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    stack: Rc<RefCell<Stack>>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl MemoryHistory {
    /// Creates a stack with one entry.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            stack: Rc::new(RefCell::new(Stack {
                entries: vec![initial.into()],
                index: 0,
            })),
        }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.stack.borrow().entries.clone()
    }

    /// The current entry.
    pub fn current(&self) -> String {
        let stack = self.stack.borrow();
        stack.entries[stack.index].clone()
    }

    /// Position of the current entry.
    pub fn index(&self) -> usize {
        self.stack.borrow().index
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        Location::parse(&self.current())
    }

    fn push(&mut self, href: &str) {
        let mut stack = self.stack.borrow_mut();
        let next = stack.index + 1;
        stack.entries.truncate(next);
        stack.entries.push(href.to_string());
        stack.index = next;
    }

    fn back(&mut self) -> bool {
        let mut stack = self.stack.borrow_mut();
        if stack.index == 0 {
            return false;
        }
        stack.index -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        let mut stack = self.stack.borrow_mut();
        if stack.index + 1 >= stack.entries.len() {
            return false;
        }
        stack.index += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse() {
        assert_eq!(
            Location::parse("/a?b=1"),
            Location {
                path: "/a".to_string(),
                query: "b=1".to_string()
            }
        );
        assert_eq!(Location::parse("").path, "/");
        assert_eq!(Location::parse("?x=1").path, "/");
        assert_eq!(Location::parse("/a#frag").query, "");
        assert_eq!(Location::parse("/a?b=1").href(), "/a?b=1");
        assert_eq!(Location::parse("/a").href(), "/a");
    }

    #[test]
    fn test_push_back_forward() {
        let mut history = MemoryHistory::new("/");
        history.push("/a");
        history.push("/b");
        assert_eq!(history.current(), "/b");

        assert!(history.back());
        assert_eq!(history.location().path, "/a");
        assert!(history.forward());
        assert!(!history.forward());

        assert!(history.back());
        assert!(history.back());
        assert!(!history.back());
        assert_eq!(history.current(), "/");
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = MemoryHistory::new("/");
        history.push("/a");
        history.push("/b");
        history.back();
        history.push("/c");

        assert_eq!(history.entries(), vec!["/", "/a", "/c"]);
        assert_eq!(history.index(), 2);
    }

    #[test]
    fn test_clones_share_stack() {
        let handle = MemoryHistory::new("/");
        let mut other = handle.clone();
        other.push("/x");
        assert_eq!(handle.current(), "/x");
    }
}
