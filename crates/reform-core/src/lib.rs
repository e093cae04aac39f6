//! # Signals, Scopes, and Contexts
//!
//! Reform keeps UI state in a small reactive core. There are four pieces:
//!
//! - `Signal<T>` — observable, cloneable value handle.
//! - `observe` — re-runs a closure when signals it read change.
//! - `Scope` / `Dispose` — lifetimes with cleanup callbacks.
//! - `Context<T>` — values published by an ancestor and injected below it.
//!
//! ## Signals
//!
//! ```rust
//! use reform_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! `get` and `with` are tracked: inside `observe`, a later write re-runs the
//! observer. `with_untracked` reads the raw value and records nothing, which
//! is what serialization and one-off lookups should use.
//!
//! ```rust
//! use reform_core::*;
//! use std::{cell::Cell, rc::Rc};
//!
//! let name = signal("Jane".to_string());
//! let runs = Rc::new(Cell::new(0));
//!
//! let obs = observe({
//!     let name = name.clone();
//!     let runs = runs.clone();
//!     move || {
//!         let _ = name.get();
//!         runs.set(runs.get() + 1);
//!     }
//! });
//!
//! name.set("Joe".into());
//! assert_eq!(runs.get(), 2);
//! obs.dispose();
//! ```
//!
//! ## Scopes and cleanup
//!
//! Work that must happen when a unit goes away (persisting a draft, closing a
//! handle) is registered on the current `Scope`:
//!
//! ```rust
//! use reform_core::*;
//!
//! let scope = Scope::new();
//! scope.run(|| {
//!     scoped_effect(|| Box::new(|| log::info!("unmounted")));
//! });
//! scope.dispose(); // logs "unmounted"
//! ```
//!
//! `effect` returns a `Dispose` guard that runs at most once, whether it is
//! fired by hand or by scope disposal.

pub mod context;
pub mod effects;
pub mod error;
pub mod prelude;
pub mod reactive;
pub mod scope;
pub mod signal;


pub use context::*;
pub use effects::*;
pub use error::ContextError;
pub use reactive::{Observer, ObserverId, SignalId, observe, untracked};
pub use scope::*;
pub use signal::*;
