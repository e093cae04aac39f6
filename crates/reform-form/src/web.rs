//! Browser-backed storage and location (wasm32 only).

use std::rc::Rc;

use crate::host::Host;
use crate::location::Location;
use crate::storage::Storage;

pub struct WebStorage(web_sys::Storage);

impl WebStorage {
    pub fn new(storage: web_sys::Storage) -> Self {
        Self(storage)
    }
}

impl Storage for WebStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Err(e) = self.0.set_item(key, value) {
            log::warn!("storage setItem({key}) failed: {e:?}");
        }
    }

    fn remove_item(&self, key: &str) {
        if let Err(e) = self.0.remove_item(key) {
            log::warn!("storage removeItem({key}) failed: {e:?}");
        }
    }

    fn clear(&self) {
        if let Err(e) = self.0.clear() {
            log::warn!("storage clear() failed: {e:?}");
        }
    }
}

/// `window.location`, read on every call so client-side navigation moves the
/// cache key.
pub struct WebLocation;

impl Location for WebLocation {
    fn pathname(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }
}

pub fn browser_host() -> Option<Host> {
    let window = web_sys::window()?;
    let session = window.session_storage().ok().flatten()?;
    let local = window.local_storage().ok().flatten()?;
    Some(Host::new(
        Rc::new(WebStorage::new(session)),
        Rc::new(WebStorage::new(local)),
        Rc::new(WebLocation),
    ))
}
