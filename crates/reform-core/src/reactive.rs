use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

pub type SignalId = usize;
pub type ObserverId = usize;

thread_local! {
    static CURRENT_OBSERVER: Cell<Option<ObserverId>> = const { Cell::new(None) };
    static NEXT_SIGNAL: Cell<SignalId> = const { Cell::new(0) };
    static GRAPH: RefCell<DepGraph> = RefCell::new(DepGraph::default());
}

#[derive(Default)]
struct DepGraph {
    next_observer: ObserverId,
    // signal -> observers that read it
    edges: HashMap<SignalId, HashSet<ObserverId>>,
    // observer -> signals it read
    back: HashMap<ObserverId, HashSet<SignalId>>,
    observers: HashMap<ObserverId, Rc<dyn Fn()>>,
    running: HashSet<ObserverId>,
}

impl DepGraph {
    fn clear_deps(&mut self, obs: ObserverId) {
        if let Some(signals) = self.back.remove(&obs) {
            for s in signals {
                if let Some(set) = self.edges.get_mut(&s) {
                    set.remove(&obs);
                    if set.is_empty() {
                        self.edges.remove(&s);
                    }
                }
            }
        }
    }

    fn remove(&mut self, obs: ObserverId) {
        self.observers.remove(&obs);
        self.clear_deps(obs);
        self.running.remove(&obs);
    }
}

pub(crate) fn next_signal_id() -> SignalId {
    NEXT_SIGNAL.with(|n| {
        let id = n.get();
        n.set(id + 1);
        id
    })
}

/// Records `sig` as a dependency of the observer currently running, if any.
pub fn register_signal_read(sig: SignalId) {
    if let Some(obs) = CURRENT_OBSERVER.with(Cell::get) {
        GRAPH.with(|g| {
            let mut g = g.borrow_mut();
            g.edges.entry(sig).or_default().insert(obs);
            g.back.entry(obs).or_default().insert(sig);
        });
    }
}

/// Re-runs every observer that depends on `sig`. An observer already running
/// further up the stack is skipped.
pub fn signal_changed(sig: SignalId) {
    let mut queue: VecDeque<ObserverId> = GRAPH.with(|g| {
        g.borrow()
            .edges
            .get(&sig)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    });
    while let Some(obs) = queue.pop_front() {
        run_tracked(obs);
    }
}

fn run_tracked(obs: ObserverId) {
    let f = GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        if g.running.contains(&obs) {
            return None;
        }
        let f = g.observers.get(&obs).cloned()?;
        g.running.insert(obs);
        g.clear_deps(obs);
        Some(f)
    });
    let Some(f) = f else {
        return;
    };

    let prev = CURRENT_OBSERVER.with(|co| co.replace(Some(obs)));
    f();
    CURRENT_OBSERVER.with(|co| co.set(prev));

    GRAPH.with(|g| {
        g.borrow_mut().running.remove(&obs);
    });
}

/// Runs `f` with dependency tracking suspended.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let prev = CURRENT_OBSERVER.with(|co| co.replace(None));
    let out = f();
    CURRENT_OBSERVER.with(|co| co.set(prev));
    out
}

/// Handle to a registered observer. Dropping it does not unregister; call
/// [`Observer::dispose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observer(ObserverId);

impl Observer {
    pub fn id(&self) -> ObserverId {
        self.0
    }

    pub fn dispose(self) {
        GRAPH.with(|g| g.borrow_mut().remove(self.0));
    }

    pub fn dependency_count(&self) -> usize {
        GRAPH.with(|g| g.borrow().back.get(&self.0).map_or(0, HashSet::len))
    }
}

/// Runs `f` now under tracking and again whenever a signal it read changes.
pub fn observe(f: impl Fn() + 'static) -> Observer {
    let id = GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let id = g.next_observer;
        g.next_observer += 1;
        g.observers.insert(id, Rc::new(f));
        id
    });
    run_tracked(id);
    Observer(id)
}
