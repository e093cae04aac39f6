use std::rc::Rc;

use reform_core::Signal;

use crate::cache::strip_query;

/// Where the app currently is. Only the path matters to forms; query and
/// fragment are ignored when deriving cache keys.
pub trait Location {
    fn pathname(&self) -> String;
}

/// Fixed location, e.g. for tests or a server-rendered page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticLocation {
    path: String,
}

impl StaticLocation {
    /// Accepts a path or a path with `?query` / `#fragment`.
    pub fn new(url: impl AsRef<str>) -> Self {
        Self {
            path: strip_query(url.as_ref()).to_string(),
        }
    }
}

impl Default for StaticLocation {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Location for StaticLocation {
    fn pathname(&self) -> String {
        self.path.clone()
    }
}

/// A route signal driven by the app's navigator.
impl Location for Signal<String> {
    fn pathname(&self) -> String {
        self.with_untracked(|url| strip_query(url).to_string())
    }
}

impl<L: Location + ?Sized> Location for Rc<L> {
    fn pathname(&self) -> String {
        (**self).pathname()
    }
}
