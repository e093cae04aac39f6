use std::rc::Rc;

use reform_core::{Dispose, Signal, effect, on_unmount, signal};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::cache;
use crate::error::FormError;
use crate::host::{Host, current_host};
use crate::options::FormOptions;
use crate::patch::{apply_patch, replace_values};
use crate::path::{field_paths, get_at_path, set_at_path};

pub type FormValues = Map<String, Value>;

/// Live form values plus the snapshot they started from.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct FormState {
    inner: Rc<FormInner>,
}

struct FormInner {
    form: Signal<FormValues>,
    // Always an object; never written after construction.
    snapshot: Value,
    options: FormOptions,
    host: Host,
    auto_persist: Dispose,
}

/// Creates a form in the current scope and host.
///
/// With `cache` enabled and a non-empty secret, a draft previously persisted
/// for the current location replaces `initial`. With `cache` and
/// `auto_persist` enabled, the form persists itself once when the current
/// scope is disposed (or when [`FormState::dispose`] is called).
pub fn use_form(initial: Value, options: FormOptions) -> FormState {
    FormState::new(initial, options)
}

impl FormState {
    pub fn new(initial: Value, options: FormOptions) -> Self {
        let mut values = match initial {
            Value::Object(map) => map,
            other => {
                log::warn!("form initial values must be an object, got {other}; starting empty");
                Map::new()
            }
        };
        let snapshot = Value::Object(values.clone());
        let host = current_host();

        if options.persistence_enabled() {
            restore(&mut values, &options, &host);
        }

        let form = signal(values);

        let auto_persist = if options.cache && options.auto_persist {
            let (form, options, host) = (form.clone(), options.clone(), host.clone());
            effect(move || on_unmount(move || persist_to(&form, &options, &host)))
        } else {
            Dispose::noop()
        };

        Self {
            inner: Rc::new(FormInner {
                form,
                snapshot,
                options,
                host,
                auto_persist,
            }),
        }
    }

    /// Builds a form from any serializable value that serializes to an object.
    pub fn from_serialize<T: Serialize>(
        initial: &T,
        options: FormOptions,
    ) -> Result<Self, FormError> {
        let value = serde_json::to_value(initial).map_err(FormError::Serialize)?;
        Ok(Self::new(value, options))
    }

    /// The live container. Callers may read or mutate it directly; writes
    /// through it notify subscribers like any other write.
    pub fn form(&self) -> &Signal<FormValues> {
        &self.inner.form
    }

    /// Untracked copy of the current values.
    pub fn values(&self) -> FormValues {
        self.inner.form.with_untracked(Clone::clone)
    }

    pub fn values_as<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        self.inner
            .form
            .with_untracked(|m| serde_json::from_value(Value::Object(m.clone())))
            .map_err(FormError::Deserialize)
    }

    pub fn options(&self) -> &FormOptions {
        &self.inner.options
    }

    pub fn host(&self) -> &Host {
        &self.inner.host
    }

    /// Restores the values the form was constructed with, discarding later
    /// edits and any restored draft.
    pub fn reset(&self) {
        let snapshot = &self.inner.snapshot;
        self.inner.form.update(|m| replace_values(m, snapshot));
    }

    pub fn set_field_value(&self, path: &str, value: impl Into<Value>) {
        let value = value.into();
        self.inner.form.update(|m| set_at_path(m, path, value));
    }

    /// Reads without registering a reactive dependency.
    pub fn get_field_value(&self, path: &str) -> Option<Value> {
        self.inner
            .form
            .with_untracked(|m| get_at_path(m, path).cloned())
    }

    /// Deep merge: leaves present in `partial` overwrite, everything else is
    /// kept.
    pub fn set_fields_value(&self, partial: &Value) {
        self.inner.form.update(|m| apply_patch(m, partial));
    }

    pub fn persist(&self) {
        persist_to(&self.inner.form, &self.inner.options, &self.inner.host);
    }

    /// Removes the draft for the current location, even when `cache` is off.
    pub fn clear_cache(&self) {
        let key = self.inner.host.cache_key();
        self.inner
            .host
            .storage(self.inner.options.storage)
            .remove_item(&key);
        log::debug!("cleared form cache at {key}");
    }

    /// Fires the teardown persist now if it has not run yet. No-op when
    /// auto-persist is off.
    pub fn dispose(&self) {
        self.inner.auto_persist.run();
    }

    pub fn cache_key(&self) -> String {
        self.inner.host.cache_key()
    }

    /// Paths addressable in the initial values' shape.
    pub fn known_paths(&self) -> Vec<String> {
        field_paths(&self.inner.snapshot)
    }

    /// Whether `path` exists in the initial values' shape. Unknown paths are
    /// still accepted by the accessors.
    pub fn is_known_path(&self, path: &str) -> bool {
        self.inner
            .snapshot
            .as_object()
            .is_some_and(|m| get_at_path(m, path).is_some())
    }
}

impl std::fmt::Debug for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("values", &self.values())
            .field("options", &self.inner.options)
            .field("host", &self.inner.host)
            .finish()
    }
}

fn restore(values: &mut FormValues, options: &FormOptions, host: &Host) {
    let store = host.storage(options.storage);
    let key = host.cache_key();
    let Some(cached) = store.get_item(&key).filter(|c| !c.is_empty()) else {
        return;
    };

    match cache::decode::<Value>(&cached, &options.secret) {
        Ok(data) => {
            log::debug!("restored form values from {:?} cache at {key}", options.storage);
            replace_values(values, &data);
        }
        Err(e) => {
            log::warn!("discarding unreadable form cache at {key}: {e}");
            store.remove_item(&key);
        }
    }
}

fn persist_to(form: &Signal<FormValues>, options: &FormOptions, host: &Host) {
    if !options.persistence_enabled() {
        return;
    }
    let key = host.cache_key();
    match form.with_untracked(|m| cache::encode(m, &options.secret)) {
        Ok(text) => {
            host.storage(options.storage).set_item(&key, &text);
            log::debug!("persisted form values to {:?} cache at {key}", options.storage);
        }
        Err(e) => log::warn!("could not encode form values for {key}: {e}"),
    }
}
