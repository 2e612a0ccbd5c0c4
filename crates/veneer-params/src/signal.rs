//! Single-threaded reactive cell.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Listener<T> = Rc<dyn Fn(&T)>;

/// Handle returned by [`Signal::subscribe`] and [`Signal::watch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Inner<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(Subscription, Listener<T>)>>,
    next_id: Cell<u64>,
}

/// A value that notifies listeners synchronously whenever it is set.
///
/// Cloning a `Signal` yields another handle to the same value.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use veneer_params::Signal;
///
/// let count = Signal::new(1);
/// let seen = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&seen);
/// count.subscribe(move |v| sink.set(*v));
/// assert_eq!(seen.get(), 1);
///
/// count.set(5);
/// assert_eq!(seen.get(), 5);
/// ```
pub struct Signal<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.inner.value.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Creates a signal holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(initial),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.value.borrow())
    }

    /// Replaces the value and notifies every listener.
    pub fn set(&self, value: T) {
        self.inner.value.replace(value.clone());
        self.notify(&value);
    }

    /// Updates the value in place and notifies every listener.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let value = {
            let mut slot = self.inner.value.borrow_mut();
            f(&mut *slot);
            slot.clone()
        };
        self.notify(&value);
    }

    /// Registers a listener and calls it right away with the current value.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let listener: Listener<T> = Rc::new(listener);
        let id = self.register(Rc::clone(&listener));
        let current = self.get();
        listener(&current);
        id
    }

    /// Registers a listener that only runs on later changes.
    pub fn watch(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        self.register(Rc::new(listener))
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription);
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn register(&self, listener: Listener<T>) -> Subscription {
        let id = Subscription(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push((id, listener));
        id
    }

    fn notify(&self, value: &T) {
        // Snapshot so listeners can subscribe, unsubscribe or set re-entrantly.
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();

        for listener in listeners {
            listener(value);
        }
    }
}
