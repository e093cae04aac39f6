use serde::{Deserialize, Serialize};

use crate::storage::StorageKind;

/// Secret used when none is configured.
pub const DEFAULT_SECRET: &str = "AK78FB";

/// Form configuration, fixed for the lifetime of a `FormState`.
///
/// Deserializes from the same camelCase keys web code uses:
///
/// ```rust
/// use reform_form::{FormOptions, StorageKind};
///
/// let opts: FormOptions =
///     serde_json::from_str(r#"{"storage": "local", "autoPersist": false}"#).unwrap();
/// assert!(opts.cache);
/// assert_eq!(opts.storage, StorageKind::Local);
/// assert!(!opts.auto_persist);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormOptions {
    /// Enables persistence entirely.
    pub cache: bool,
    /// Obfuscation key. Persistence is skipped when empty.
    pub secret: String,
    pub storage: StorageKind,
    /// Persist when the owning scope is disposed.
    pub auto_persist: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            cache: true,
            secret: DEFAULT_SECRET.to_string(),
            storage: StorageKind::Session,
            auto_persist: true,
        }
    }
}

impl FormOptions {
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    pub fn storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }

    pub fn auto_persist(mut self, auto_persist: bool) -> Self {
        self.auto_persist = auto_persist;
        self
    }

    /// Whether reads from and writes to storage happen at all.
    pub fn persistence_enabled(&self) -> bool {
        self.cache && !self.secret.is_empty()
    }
}
