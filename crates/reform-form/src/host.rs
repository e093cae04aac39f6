//! The environment a form persists into: two storage backends and a location.
//!
//! Forms resolve the host once, at construction, from the nearest
//! [`with_host`] call. Outside of one they use a per-thread default whose
//! backends are shared by every form on the thread, the way browser storage
//! is shared by every component on a page.

use std::rc::Rc;

use reform_core::{Context, create_context};

use crate::cache::cache_key;
use crate::location::{Location, StaticLocation};
use crate::storage::{MemoryStorage, Storage, StorageKind};

#[derive(Clone)]
pub struct Host {
    session: Rc<dyn Storage>,
    local: Rc<dyn Storage>,
    location: Rc<dyn Location>,
}

impl Host {
    pub fn new(
        session: Rc<dyn Storage>,
        local: Rc<dyn Storage>,
        location: Rc<dyn Location>,
    ) -> Self {
        Self {
            session,
            local,
            location,
        }
    }

    /// Fresh in-memory backends at `path`.
    pub fn in_memory(path: impl AsRef<str>) -> Self {
        Self::new(
            Rc::new(MemoryStorage::new()),
            Rc::new(MemoryStorage::new()),
            Rc::new(StaticLocation::new(path)),
        )
    }

    pub fn storage(&self, kind: StorageKind) -> &dyn Storage {
        match kind {
            StorageKind::Session => self.session.as_ref(),
            StorageKind::Local => self.local.as_ref(),
        }
    }

    pub fn location(&self) -> &dyn Location {
        self.location.as_ref()
    }

    /// Same backends, different location.
    pub fn at(&self, location: Rc<dyn Location>) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }

    pub fn cache_key(&self) -> String {
        cache_key(self.location())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn platform_default() -> Self {
        Self::in_memory("/")
    }

    #[cfg(target_arch = "wasm32")]
    fn platform_default() -> Self {
        crate::web::browser_host().unwrap_or_else(|| {
            log::warn!("browser storage unavailable; falling back to in-memory storage");
            Self::in_memory("/")
        })
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("location", &self.location.pathname())
            .finish_non_exhaustive()
    }
}

thread_local! {
    static HOST: Context<Host> = create_context("FormHost", None);
    static DEFAULT_HOST: Host = Host::platform_default();
}

/// Makes `host` the environment for forms created while `f` runs.
pub fn with_host<R>(host: Host, f: impl FnOnce() -> R) -> R {
    HOST.with(Context::clone).provide(host, f)
}

pub fn current_host() -> Host {
    HOST.with(Context::clone)
        .inject_or_else(|| DEFAULT_HOST.with(Host::clone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reform_core::signal;

    #[test]
    fn default_host_is_shared_per_thread() {
        let a = current_host();
        a.storage(StorageKind::Local).set_item("/shared", "1");
        let b = current_host();
        assert_eq!(
            b.storage(StorageKind::Local).get_item("/shared").as_deref(),
            Some("1")
        );
        assert_eq!(b.storage(StorageKind::Session).get_item("/shared"), None);
        b.storage(StorageKind::Local).remove_item("/shared");
    }

    #[test]
    fn with_host_scopes_the_environment() {
        let host = Host::in_memory("/profile?tab=1");
        with_host(host.clone(), || {
            assert_eq!(current_host().cache_key(), "/profile");
            current_host()
                .storage(StorageKind::Session)
                .set_item("k", "v");
        });
        assert_eq!(
            host.storage(StorageKind::Session).get_item("k").as_deref(),
            Some("v")
        );
        assert_eq!(current_host().cache_key(), "/");
    }

    #[test]
    fn at_keeps_backends() {
        let host = Host::in_memory("/a");
        let moved = host.at(Rc::new(StaticLocation::new("/b")));
        moved.storage(StorageKind::Local).set_item("x", "1");
        assert_eq!(moved.cache_key(), "/b");
        assert!(host.storage(StorageKind::Local).get_item("x").is_some());
    }

    #[test]
    fn cache_key_follows_route_signal() {
        let route = signal(String::from("/a?x=1"));
        let host = Host::in_memory("/").at(Rc::new(route.clone()));
        assert_eq!(host.location().pathname(), "/a");

        route.set("/b#top".into());
        assert_eq!(host.location().pathname(), "/b");
        assert_eq!(host.cache_key(), "/b");
    }
}
