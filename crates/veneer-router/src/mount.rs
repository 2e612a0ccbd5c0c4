//! Mounting rendered containers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use veneer_dom::Element;

/// Receives a fully rendered top-level container.
pub trait Mount {
    /// Makes `container` the visible content.
    fn mount(&mut self, container: Element);
}

impl<F: FnMut(Element)> Mount for F {
    fn mount(&mut self, container: Element) {
        self(container);
    }
}

/// Keeps the most recently mounted container in memory.
///
/// Clones share state, so one handle can go to the router while another
/// is used to inspect what was rendered.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    current: Rc<RefCell<Option<Element>>>,
    mounts: Rc<Cell<usize>>,
}

impl Viewport {
    /// Creates an empty viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the mounted container.
    pub fn current(&self) -> Option<Element> {
        self.current.borrow().clone()
    }

    /// Renders the mounted container, or an empty string.
    pub fn to_html(&self) -> String {
        self.current
            .borrow()
            .as_ref()
            .map(Element::to_html)
            .unwrap_or_default()
    }

    /// How many times something was mounted.
    pub fn mount_count(&self) -> usize {
        self.mounts.get()
    }
}

impl Mount for Viewport {
    fn mount(&mut self, container: Element) {
        self.current.replace(Some(container));
        self.mounts.set(self.mounts.get() + 1);
    }
}
