#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use veneer_dom::Element;
use veneer_params::Params;
use veneer_router::{RenderResult, Route};

/// One render callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub view: String,
    pub params: Params,
    pub query: Params,
}

/// Collects render callback invocations in order.
#[derive(Debug, Clone, Default)]
pub struct Calls(Rc<RefCell<Vec<Call>>>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view that records itself under `name` and writes `name` as text.
    pub fn view(
        &self,
        name: &str,
    ) -> impl Fn(&mut Element, &Params, &Params) -> RenderResult + 'static {
        let calls = self.clone();
        let name = name.to_string();
        move |container, params, query| {
            calls.0.borrow_mut().push(Call {
                view: name.clone(),
                params: params.clone(),
                query: query.clone(),
            });
            container.append_text(name.as_str());
            Ok(())
        }
    }

    /// Like [`Calls::view`], but also renders an outlet with id `child`.
    pub fn layout(
        &self,
        name: &str,
    ) -> impl Fn(&mut Element, &Params, &Params) -> RenderResult + 'static {
        let inner = self.view(name);
        move |container, params, query| {
            inner(container, params, query)?;
            container.append_child(Element::new("div").id("child"));
            Ok(())
        }
    }

    pub fn all(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.0.borrow().iter().map(|c| c.view.clone()).collect()
    }

    pub fn last(&self) -> Option<Call> {
        self.0.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub fn params<const N: usize>(pairs: [(&str, &str); N]) -> Params {
    Params::from_iter(pairs)
}

pub fn noop(_: &mut Element, _: &Params, _: &Params) -> RenderResult {
    Ok(())
}

pub fn page(path: &str) -> Route {
    Route::page(path, noop)
}
