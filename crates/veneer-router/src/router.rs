//! Main router implementation.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};
use veneer_dom::{Element, MarkupSanitizer, Sanitizer};
use veneer_params::{parse_query, ParamStore, Params};

use crate::error::{Result, RouterError};
use crate::extract::extract_params;
use crate::history::{History, Location};
use crate::matcher::{match_routes, MatchedRoute};
use crate::mount::{Mount, Viewport};
use crate::options::RouterOptions;
use crate::route::{Route, View};

/// What a navigation ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// A route was rendered and mounted. Holds the deepest matched pattern.
    Rendered { pattern: String },
    /// Nothing matched and the `*` route was rendered.
    Fallback,
    /// Nothing matched and there is no `*` route. Nothing was rendered.
    Unmatched,
    /// Another navigation was in progress; this one runs after it.
    Queued,
}

/// Where the router is in handling a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a navigation.
    Idle,
    /// Reading the location and matching routes.
    Resolving,
    /// Running render callbacks.
    Rendering,
}

#[derive(Debug)]
enum Step {
    /// Push an entry, then resolve it.
    Push(String),
    /// Resolve whatever the history currently points at.
    Pop,
}

enum Resolution {
    Redirect(String),
    Done(Navigation),
}

struct Inner {
    routes: RefCell<Rc<Vec<Route>>>,
    history: RefCell<Box<dyn History>>,
    mount: RefCell<Box<dyn Mount>>,
    store: ParamStore,
    options: RouterOptions,
    phase: Cell<Phase>,
    pending: RefCell<VecDeque<Step>>,
}

/// Resets the phase when a navigation run ends. On a panic, navigations
/// queued by the failed run are dropped too.
struct IdleOnDrop<'a>(&'a Inner);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            if let Ok(mut pending) = self.0.pending.try_borrow_mut() {
                pending.clear();
            }
        }
        self.0.phase.set(Phase::Idle);
    }
}

impl Inner {
    fn run(&self, step: Step) -> Result<Navigation> {
        if self.phase.get() != Phase::Idle {
            debug!(?step, "navigation queued");
            self.pending.borrow_mut().push_back(step);
            return Ok(Navigation::Queued);
        }

        let _idle = IdleOnDrop(self);
        let mut outcome = Navigation::Unmatched;
        let mut redirects = 0;
        let mut next = Some(step);

        while let Some(step) = next.take() {
            if let Step::Push(href) = &step {
                self.history.borrow_mut().push(href);
            }

            self.phase.set(Phase::Resolving);
            match self.resolve() {
                Resolution::Redirect(to) => {
                    redirects += 1;
                    if redirects > self.options.max_redirects {
                        warn!(path = %to, limit = self.options.max_redirects, "redirect limit exceeded");
                        self.pending.borrow_mut().clear();
                        return Err(RouterError::RedirectLimit {
                            path: to,
                            limit: self.options.max_redirects,
                        });
                    }
                    next = Some(Step::Push(to));
                    continue;
                }
                Resolution::Done(navigation) => {
                    outcome = navigation;
                    redirects = 0;
                }
            }

            next = self.pending.borrow_mut().pop_front();
        }

        Ok(outcome)
    }

    fn resolve(&self) -> Resolution {
        let location = self.history.borrow().location();
        let raw_query = parse_query(&location.query);
        let routes = Rc::clone(&self.routes.borrow());

        debug!(path = %location.path, "resolving");

        let found = match_routes(&location.path, &routes, &Params::new())
            .or_else(|| match_routes("*", &routes, &Params::new()));

        let Some(found) = found else {
            debug!(path = %location.path, "no route matched");
            return Resolution::Done(Navigation::Unmatched);
        };

        if let Some(to) = found.route().redirect_target() {
            debug!(from = %location.path, to, "redirect");
            return Resolution::Redirect(to.to_string());
        }

        let state = self.store.replace(found.params(), &raw_query);

        self.phase.set(Phase::Rendering);
        let mut container = Element::new(self.options.container_tag.as_str());
        let deepest = self.render_chain(found.chain(), &mut container, &state.query);
        self.mount.borrow_mut().mount(container);

        let navigation = match found.chain() {
            [only] if matches!(only.route, Route::Fallback { .. }) => Navigation::Fallback,
            _ => Navigation::Rendered {
                pattern: deepest.unwrap_or(found.route()).path().to_string(),
            },
        };
        debug!(path = %location.path, ?navigation, "resolved");
        Resolution::Done(navigation)
    }

    /// Renders `levels[0]` into `target`, then each deeper level into the
    /// outlet of the level above it. Returns the deepest route whose view
    /// ran.
    fn render_chain<'r>(
        &self,
        levels: &[MatchedRoute<'r>],
        target: &mut Element,
        query: &Params,
    ) -> Option<&'r Route> {
        let (level, deeper) = levels.split_first()?;
        let view = level.route.view()?;

        let params = self.store.sanitized(&level.params);
        if !render_view(level.route.path(), view, target, &params, query) {
            return Some(level.route);
        }
        if level.route.nested().is_empty() {
            return Some(level.route);
        }

        let outlet_id = self.options.outlet_id.as_str();
        if target.find_by_id(outlet_id).is_none() && target.lift_from_markup(outlet_id) {
            debug!(route = level.route.path(), outlet = outlet_id, "outlet lifted from markup");
        }
        let Some(outlet) = target.find_by_id_mut(outlet_id) else {
            if let Some(next) = deeper.first() {
                warn!(
                    route = level.route.path(),
                    child = next.route.path(),
                    outlet = outlet_id,
                    "view has no outlet, nested route not rendered"
                );
            }
            return Some(level.route);
        };

        let Some(next) = deeper.first() else {
            outlet.clear_children();
            return Some(level.route);
        };

        let slot = outlet.append_child(
            Element::new(self.options.container_tag.as_str()).attr("data-route", next.route.path()),
        );
        self.render_chain(deeper, slot, query).or(Some(level.route))
    }
}

/// Runs a view, falling back to its error element. Returns true if the
/// primary element succeeded.
fn render_view(path: &str, view: &View, target: &mut Element, params: &Params, query: &Params) -> bool {
    let Err(err) = (view.element)(target, params, query) else {
        return true;
    };

    warn!(route = path, error = %err, "route view failed");
    target.clear_children();

    if let Some(error_element) = &view.error_element {
        if let Err(err) = error_element(target, params, query) {
            warn!(route = path, error = %err, "route error view failed");
        }
    }
    false
}

/// A client-side router.
///
/// Cloning yields another handle to the same router.
///
/// ```
/// use veneer_router::{MemoryHistory, Navigation, Route, Router};
///
/// let history = MemoryHistory::new("/");
/// let router = Router::builder(history.clone())
///     .expected_params(["id"])
///     .route(Route::page("/users/:id", |container, params, _query| {
///         container.append_text(params.get("id").unwrap_or_default());
///         Ok(())
///     }))
///     .build()
///     .unwrap();
///
/// let nav = router.navigate("/users/42").unwrap();
/// assert_eq!(nav, Navigation::Rendered { pattern: "/users/:id".into() });
/// assert_eq!(router.store().get_param("id").as_deref(), Some("42"));
/// assert_eq!(history.current(), "/users/42");
/// ```
#[derive(Clone)]
pub struct Router {
    inner: Rc<Inner>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.inner.routes.borrow().len())
            .field("phase", &self.inner.phase.get())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Starts building a router over `history`.
    pub fn builder(history: impl History + 'static) -> RouterBuilder {
        RouterBuilder::new(history)
    }

    /// Pushes `path` onto the history and renders it.
    ///
    /// Called while another navigation is running (for example from a
    /// render callback), the request is queued and `Navigation::Queued` is
    /// returned. Otherwise the result describes the last navigation
    /// processed, which includes any that were queued meanwhile.
    pub fn navigate(&self, path: &str) -> Result<Navigation> {
        self.inner.run(Step::Push(path.to_string()))
    }

    /// Renders the current history entry. Call this on back/forward
    /// navigation.
    pub fn handle_pop_state(&self) -> Result<Navigation> {
        self.inner.run(Step::Pop)
    }

    /// Returns a handler for the host's `popstate` event.
    ///
    /// The handler holds a weak reference and does nothing once the router
    /// is dropped.
    pub fn pop_state_listener(&self) -> impl Fn() + 'static {
        let router = Rc::downgrade(&self.inner);
        move || {
            if let Some(inner) = router.upgrade() {
                if let Err(err) = inner.run(Step::Pop) {
                    warn!(error = %err, "popstate handling failed");
                }
            }
        }
    }

    /// Moves back one history entry and renders it. Returns `None` if the
    /// history was already at its first entry.
    pub fn back(&self) -> Result<Option<Navigation>> {
        let moved = self.inner.history.borrow_mut().back();
        if moved {
            self.handle_pop_state().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Moves forward one history entry and renders it. Returns `None` if
    /// there is no later entry.
    pub fn forward(&self) -> Result<Option<Navigation>> {
        let moved = self.inner.history.borrow_mut().forward();
        if moved {
            self.handle_pop_state().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Appends a top-level route. The current location is not re-rendered.
    pub fn add_route(&self, route: Route) {
        debug!(path = route.path(), "route added");
        Rc::make_mut(&mut self.inner.routes.borrow_mut()).push(route);
    }

    /// Writes params captured by `pattern` from the current location, plus
    /// the query, into the store and returns them merged.
    pub fn extract_params(&self, pattern: &str) -> Result<Params> {
        extract_params(&self.inner.store, pattern, &self.location())
    }

    /// The param store the router writes to.
    pub fn store(&self) -> &ParamStore {
        &self.inner.store
    }

    /// The current history location.
    pub fn location(&self) -> Location {
        self.inner.history.borrow().location()
    }

    /// The current navigation phase.
    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    /// The router's options.
    pub fn options(&self) -> &RouterOptions {
        &self.inner.options
    }

    /// A navigator bound to this router.
    pub fn navigator(&self) -> Navigator {
        let navigator = Navigator::new();
        navigator.bind(&self.inner);
        navigator
    }
}

/// A handle for navigating from inside render callbacks.
///
/// Create one before building the router so callbacks can capture it, then
/// pass it to [`RouterBuilder::navigator`]. It only holds a weak reference.
#[derive(Clone, Default)]
pub struct Navigator {
    target: Rc<RefCell<Weak<Inner>>>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl Navigator {
    /// Creates an unbound navigator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigates the bound router. See [`Router::navigate`].
    pub fn navigate(&self, path: &str) -> Result<Navigation> {
        let Some(inner) = self.target.borrow().upgrade() else {
            warn!(path, "navigate called on detached navigator");
            return Err(RouterError::Detached);
        };
        inner.run(Step::Push(path.to_string()))
    }

    /// Returns true if bound to a live router.
    pub fn is_bound(&self) -> bool {
        self.target.borrow().strong_count() > 0
    }

    fn bind(&self, inner: &Rc<Inner>) {
        self.target.replace(Rc::downgrade(inner));
    }
}

/// Builder for [`Router`].
pub struct RouterBuilder {
    history: Box<dyn History>,
    routes: Vec<Route>,
    options: RouterOptions,
    store: Option<ParamStore>,
    sanitizer: Option<Rc<dyn Sanitizer>>,
    mount: Box<dyn Mount>,
    navigators: Vec<Navigator>,
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("routes", &self.routes.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RouterBuilder {
    fn new(history: impl History + 'static) -> Self {
        Self {
            history: Box::new(history),
            routes: Vec::new(),
            options: RouterOptions::default(),
            store: None,
            sanitizer: None,
            mount: Box::new(Viewport::new()),
            navigators: Vec::new(),
        }
    }

    /// Adds a top-level route.
    #[must_use]
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Adds several top-level routes.
    #[must_use]
    pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Sets the param/query allow-list. Ignored when a store is supplied.
    #[must_use]
    pub fn expected_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.expected_params = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces all options.
    #[must_use]
    pub fn options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }

    /// Uses an existing store. Its allow-list and sanitizer take precedence
    /// over `expected_params` and `sanitizer`.
    #[must_use]
    pub fn store(mut self, store: ParamStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the sanitizer for the router's own store. Defaults to
    /// [`MarkupSanitizer`].
    #[must_use]
    pub fn sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizer = Some(Rc::new(sanitizer));
        self
    }

    /// Sets where top-level containers are mounted. Defaults to a private
    /// [`Viewport`].
    #[must_use]
    pub fn mount(mut self, mount: impl Mount + 'static) -> Self {
        self.mount = Box::new(mount);
        self
    }

    /// Binds `navigator` to the router being built.
    #[must_use]
    pub fn navigator(mut self, navigator: &Navigator) -> Self {
        self.navigators.push(navigator.clone());
        self
    }

    /// Builds the router and renders the current location.
    pub fn build(self) -> Result<Router> {
        let store = match self.store {
            Some(store) => store,
            None => {
                let sanitizer = self
                    .sanitizer
                    .unwrap_or_else(|| Rc::new(MarkupSanitizer));
                ParamStore::with_shared_sanitizer(self.options.expected_params.iter().cloned(), sanitizer)
            }
        };

        let inner = Rc::new(Inner {
            routes: RefCell::new(Rc::new(self.routes)),
            history: RefCell::new(self.history),
            mount: RefCell::new(self.mount),
            store,
            options: self.options,
            phase: Cell::new(Phase::Idle),
            pending: RefCell::new(VecDeque::new()),
        });

        for navigator in &self.navigators {
            navigator.bind(&inner);
        }

        let router = Router { inner };
        router.handle_pop_state()?;
        Ok(router)
    }
}
