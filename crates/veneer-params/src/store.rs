//! The route param store.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use tracing::trace;
use veneer_dom::{MarkupSanitizer, Sanitizer};

use crate::params::Params;
use crate::signal::{Signal, Subscription};

/// Sanitized params and query for the current route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamState {
    /// Path parameters.
    pub params: Params,
    /// Query string values.
    pub query: Params,
}

struct Inner {
    expected: BTreeSet<String>,
    sanitizer: Rc<dyn Sanitizer>,
    state: Signal<ParamState>,
}

/// Holds the current route's params and query.
///
/// Only keys in the allow-list given at construction are stored, and each
/// value is sanitized when written. Reads return stored values as is.
///
/// The store is an explicit context object: clone the handle and pass it to
/// the router and to anything else that needs to read route state.
#[derive(Clone)]
pub struct ParamStore {
    inner: Rc<Inner>,
}

impl fmt::Debug for ParamStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamStore")
            .field("expected", &self.inner.expected)
            .field("state", &self.inner.state)
            .finish_non_exhaustive()
    }
}

impl ParamStore {
    /// Creates a store with an allow-list and a sanitizer.
    pub fn new<I, S>(expected: I, sanitizer: impl Sanitizer + 'static) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_shared_sanitizer(expected, Rc::new(sanitizer))
    }

    /// Creates a store with a sanitizer shared with other components.
    pub fn with_shared_sanitizer<I, S>(expected: I, sanitizer: Rc<dyn Sanitizer>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Rc::new(Inner {
                expected: expected.into_iter().map(Into::into).collect(),
                sanitizer,
                state: Signal::new(ParamState::default()),
            }),
        }
    }

    /// Creates a store that sanitizes with [`MarkupSanitizer`].
    pub fn with_defaults<I, S>(expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(expected, MarkupSanitizer)
    }

    /// Returns true if `key` is on the allow-list.
    pub fn is_expected(&self, key: &str) -> bool {
        self.inner.expected.contains(key)
    }

    /// Iterates over the allow-list.
    pub fn expected(&self) -> impl Iterator<Item = &str> {
        self.inner.expected.iter().map(String::as_str)
    }

    /// Filters `raw` to expected keys and sanitizes each value, without
    /// touching stored state.
    pub fn sanitized(&self, raw: &Params) -> Params {
        raw.iter()
            .filter(|(key, _)| self.is_expected(key))
            .map(|(key, value)| (key, self.inner.sanitizer.sanitize(value)))
            .collect()
    }

    /// Replaces the stored params.
    pub fn set_params(&self, raw: Params) {
        let params = self.sanitized(&raw);
        trace!(dropped = raw.len() - params.len(), "store params");
        self.inner.state.update(|state| state.params = params);
    }

    /// Replaces the stored query values.
    pub fn set_query(&self, raw: Params) {
        let query = self.sanitized(&raw);
        trace!(dropped = raw.len() - query.len(), "store query");
        self.inner.state.update(|state| state.query = query);
    }

    /// Replaces params and query together with a single notification.
    /// Returns what was stored.
    pub fn replace(&self, raw_params: &Params, raw_query: &Params) -> ParamState {
        let state = ParamState {
            params: self.sanitized(raw_params),
            query: self.sanitized(raw_query),
        };
        trace!(params = %state.params, query = %state.query, "store replace");
        self.inner.state.set(state.clone());
        state
    }

    /// Gets a stored param.
    pub fn get_param(&self, key: &str) -> Option<String> {
        self.inner
            .state
            .with(|state| state.params.get(key).map(str::to_string))
    }

    /// Gets a stored query value.
    pub fn get_query(&self, key: &str) -> Option<String> {
        self.inner
            .state
            .with(|state| state.query.get(key).map(str::to_string))
    }

    /// Returns a copy of the stored params.
    pub fn params(&self) -> Params {
        self.inner.state.with(|state| state.params.clone())
    }

    /// Returns a copy of the stored query.
    pub fn query(&self) -> Params {
        self.inner.state.with(|state| state.query.clone())
    }

    /// Returns a copy of the whole state.
    pub fn state(&self) -> ParamState {
        self.inner.state.get()
    }

    /// Calls `listener` synchronously after every write.
    pub fn subscribe(&self, listener: impl Fn(&ParamState) + 'static) -> Subscription {
        self.inner.state.watch(listener)
    }

    /// Removes a listener.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.inner.state.unsubscribe(subscription)
    }
}
