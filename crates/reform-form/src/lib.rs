//! # Form state
//!
//! `FormState` keeps a form's values in a `Signal` and addresses them by
//! dot-separated paths:
//!
//! ```rust
//! use reform_form::*;
//! use serde_json::json;
//!
//! let form = use_form(
//!     json!({"user": {"name": "Bob", "age": 25}}),
//!     FormOptions::default().cache(false),
//! );
//!
//! form.set_field_value("user.name", "Charlie");
//! assert_eq!(form.get_field_value("user.name"), Some(json!("Charlie")));
//!
//! form.set_fields_value(&json!({"user": {"age": 26}}));
//! assert_eq!(form.get_field_value("user.name"), Some(json!("Charlie")));
//!
//! form.reset();
//! assert_eq!(form.get_field_value("user.age"), Some(json!(25)));
//! ```
//!
//! ## Drafts
//!
//! With `cache` on (the default), `persist()` writes the values, obfuscated
//! with `secret`, to session or local storage under the current location's
//! path. A form created later at the same path starts from that draft. Forms
//! created inside a `Scope` persist themselves when the scope is disposed
//! unless `auto_persist` is off.
//!
//! ```rust
//! use reform_core::Scope;
//! use reform_form::*;
//! use serde_json::json;
//!
//! with_host(Host::in_memory("/signup"), || {
//!     let scope = Scope::new();
//!     let form = scope.run(|| use_form(json!({"email": ""}), FormOptions::default()));
//!     form.set_field_value("email", "a@b.c");
//!     scope.dispose();
//!
//!     let again = use_form(json!({"email": ""}), FormOptions::default());
//!     assert_eq!(again.get_field_value("email"), Some(json!("a@b.c")));
//! });
//! ```
//!
//! Unreadable drafts are dropped and the form starts from its initial values;
//! nothing in this crate's form API returns an error for storage problems.

pub mod cache;
pub mod error;
pub mod form;
pub mod host;
pub mod location;
pub mod options;
pub mod patch;
pub mod path;
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod tests;

pub use error::{CacheError, FormError};
pub use form::{FormState, FormValues, use_form};
pub use host::{Host, current_host, with_host};
pub use location::{Location, StaticLocation};
pub use options::{DEFAULT_SECRET, FormOptions};
pub use storage::{MemoryStorage, Storage, StorageKind};
#[cfg(target_arch = "wasm32")]
pub use web::{WebLocation, WebStorage};
