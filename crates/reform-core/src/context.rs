//! # Typed contexts
//!
//! A [`Context<T>`] lets an ancestor publish a value that anything running
//! inside its `provide` closure can read back with `inject`, without threading
//! it through every call in between.
//!
//! ```rust
//! use reform_core::*;
//!
//! let ctx = create_context::<String>("Tabs", None);
//!
//! ctx.provide("overview".to_string(), || {
//!     assert_eq!(ctx.inject().unwrap(), "overview");
//! });
//!
//! assert_eq!(ctx.inject_or("fallback".into()), "fallback");
//! assert!(ctx.inject().is_err());
//! ```
//!
//! Every context created gets its own identity, so two contexts carrying the
//! same `T` never see each other's values. Nested `provide` calls shadow outer
//! ones for the duration of the inner closure.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::marker::PhantomData;

use crate::error::{ContextError, Result};

pub type ContextId = u64;

thread_local! {
    static FRAMES: RefCell<Vec<HashMap<ContextId, Box<dyn Any>>>> = RefCell::new(Vec::new());
    static NEXT_CONTEXT: Cell<ContextId> = const { Cell::new(1) };
}

/// Component name(s) expected to provide a context; only used in the error
/// message of a failed `inject`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Providers {
    One(String),
    AnyOf(Vec<String>),
}

impl Providers {
    fn expected(&self) -> String {
        match self {
            Providers::One(name) => format!("`{name}`"),
            Providers::AnyOf(names) => format!(
                "one of the following components: {}",
                names.join(", ")
            ),
        }
    }
}

impl From<&str> for Providers {
    fn from(name: &str) -> Self {
        Providers::One(name.to_string())
    }
}

impl From<String> for Providers {
    fn from(name: String) -> Self {
        Providers::One(name)
    }
}

impl From<Vec<String>> for Providers {
    fn from(names: Vec<String>) -> Self {
        Providers::AnyOf(names)
    }
}

impl From<Vec<&str>> for Providers {
    fn from(names: Vec<&str>) -> Self {
        Providers::AnyOf(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Providers {
    fn from(names: [&str; N]) -> Self {
        Providers::AnyOf(names.iter().map(|n| n.to_string()).collect())
    }
}

pub struct Context<T> {
    id: ContextId,
    providers: Providers,
    description: Option<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            providers: self.providers.clone(),
            description: self.description.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("symbol", &self.symbol())
            .finish()
    }
}

/// Creates a new context.
///
/// With a single provider and no `name`, the context is described as
/// `"{provider}Context"`; otherwise `name` is used as given.
pub fn create_context<T: Clone + 'static>(
    providers: impl Into<Providers>,
    name: Option<&str>,
) -> Context<T> {
    let providers = providers.into();
    let description = match (&providers, name) {
        (Providers::One(p), None) => Some(format!("{p}Context")),
        (_, name) => name.map(str::to_string),
    };
    let id = NEXT_CONTEXT.with(|n| {
        let id = n.get();
        n.set(id + 1);
        id
    });
    Context {
        id,
        providers,
        description,
        _marker: PhantomData,
    }
}

impl<T> Context<T> {
    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn symbol(&self) -> String {
        format!("Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

impl<T: Clone + 'static> Context<T> {
    /// Makes `value` visible to `inject` while `f` runs.
    pub fn provide<R>(&self, value: T, f: impl FnOnce() -> R) -> R {
        with_frame(|| {
            FRAMES.with(|st| {
                if let Some(top) = st.borrow_mut().last_mut() {
                    top.insert(self.id, Box::new(value));
                }
            });
            f()
        })
    }

    /// Nearest provided value, if any.
    pub fn try_inject(&self) -> Option<T> {
        FRAMES.with(|st| {
            st.borrow()
                .iter()
                .rev()
                .find_map(|frame| frame.get(&self.id)?.downcast_ref::<T>().cloned())
        })
    }

    pub fn inject(&self) -> Result<T> {
        self.try_inject().ok_or_else(|| ContextError::Missing {
            symbol: self.symbol(),
            expected: self.providers.expected(),
        })
    }

    pub fn inject_or(&self, fallback: T) -> T {
        self.try_inject().unwrap_or(fallback)
    }

    pub fn inject_or_else(&self, fallback: impl FnOnce() -> T) -> T {
        self.try_inject().unwrap_or_else(fallback)
    }
}

fn with_frame<R>(f: impl FnOnce() -> R) -> R {
    // Pops on unwind too.
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            FRAMES.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    FRAMES.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}
