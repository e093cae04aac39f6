use std::cell::{Cell, RefCell};
use std::rc::Rc;

use reform_core::{Scope, observe, signal};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::*;

/// Storage double that counts calls, like a `vi.fn()` mock.
#[derive(Default)]
struct SpyStorage {
    inner: MemoryStorage,
    gets: Cell<usize>,
    sets: RefCell<Vec<String>>,
    removes: RefCell<Vec<String>>,
}

impl Storage for SpyStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.gets.set(self.gets.get() + 1);
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        self.sets.borrow_mut().push(key.to_string());
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) {
        self.removes.borrow_mut().push(key.to_string());
        self.inner.remove_item(key)
    }

    fn clear(&self) {
        self.inner.clear()
    }
}

struct Env {
    session: Rc<SpyStorage>,
    local: Rc<SpyStorage>,
    host: Host,
}

fn env(path: &str) -> Env {
    let _ = env_logger::builder().is_test(true).try_init();
    let session = Rc::new(SpyStorage::default());
    let local = Rc::new(SpyStorage::default());
    let host = Host::new(
        session.clone(),
        local.clone(),
        Rc::new(StaticLocation::new(path)),
    );
    Env {
        session,
        local,
        host,
    }
}

fn no_auto() -> FormOptions {
    FormOptions::default().auto_persist(false)
}

#[test]
fn initializes_with_default_values() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(
            json!({"name": "John", "age": 30, "address": {"city": "New York", "zip": "10001"}}),
            FormOptions::default().cache(false),
        );
        assert_eq!(form.get_field_value("name"), Some(json!("John")));
        assert_eq!(form.get_field_value("age"), Some(json!(30)));
        assert_eq!(form.get_field_value("address.city"), Some(json!("New York")));
    });
    assert_eq!(e.session.gets.get(), 0);
}

#[test]
fn gets_field_and_branch_values() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"user": {"details": {"name": "Alice"}}}), no_auto());
        assert_eq!(form.get_field_value("user.details.name"), Some(json!("Alice")));
        assert_eq!(
            form.get_field_value("user"),
            Some(json!({"details": {"name": "Alice"}}))
        );
        assert_eq!(form.get_field_value("user.missing"), None);
        assert_eq!(form.get_field_value("user.details.name.deeper"), None);
    });
}

#[test]
fn sets_field_value_by_path() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"user": {"name": "Bob", "age": 25}}), no_auto());

        form.set_field_value("user.name", "Charlie");
        assert_eq!(form.get_field_value("user.name"), Some(json!("Charlie")));
        assert_eq!(form.get_field_value("user.age"), Some(json!(25)));

        form.set_field_value("user.age", 26);
        assert_eq!(form.form().get()["user"]["age"], json!(26));
    });
}

#[test]
fn sets_multiple_fields_as_patch() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(
            json!({"name": "David", "settings": {"theme": "light", "notifications": true}}),
            no_auto(),
        );
        form.set_fields_value(&json!({"name": "Eve", "settings": {"theme": "dark"}}));

        let values = form.values();
        assert_eq!(values["name"], json!("Eve"));
        assert_eq!(values["settings"]["theme"], json!("dark"));
        assert_eq!(values["settings"]["notifications"], json!(true));
    });
}

#[test]
fn handles_complex_nested_paths() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(
            json!({"a": {"b": {"c": [1, 2, 3], "d": {"e": "nested"}}}}),
            no_auto(),
        );
        form.set_field_value("a.b.d.e", "changed");
        assert_eq!(form.get_field_value("a.b.d.e"), Some(json!("changed")));
        assert_eq!(form.get_field_value("a.b.c"), Some(json!([1, 2, 3])));
    });
}

#[test]
fn reset_restores_initial_values() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let initial = json!({"count": 0, "nested": {"a": 1, "b": [1]}});
        let form = use_form(initial.clone(), no_auto());

        form.set_field_value("count", 5);
        form.set_fields_value(&json!({"nested": {"a": 9, "b": [2, 3]}}));
        form.form().update(|m| {
            m.insert("count".into(), json!(6));
        });

        form.reset();
        assert_eq!(Value::Object(form.values()), initial);

        form.reset();
        assert_eq!(Value::Object(form.values()), initial);
    });
}

#[test]
fn reset_clears_keys_added_after_construction() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"count": 0}), no_auto());
        form.set_field_value("extra.flag", true);
        form.reset();
        assert_eq!(Value::Object(form.values()), json!({"count": 0, "extra": null}));
    });
}

#[test]
fn reset_discards_restored_draft() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let first = use_form(json!({"data": "initial"}), no_auto().secret("key"));
        first.set_field_value("data", "restored");
        first.persist();

        let second = use_form(json!({"data": "initial"}), no_auto().secret("key"));
        assert_eq!(second.get_field_value("data"), Some(json!("restored")));
        second.reset();
        assert_eq!(second.get_field_value("data"), Some(json!("initial")));
    });
}

#[test]
fn persists_under_location_key() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(
            json!({"data": "test"}),
            no_auto().storage(StorageKind::Local).secret("secret"),
        );
        form.persist();
    });
    assert_eq!(*e.local.sets.borrow(), vec!["/test".to_string()]);
    assert!(e.session.sets.borrow().is_empty());

    let stored = e.local.inner.get_item("/test").unwrap();
    let decoded: Value = cache::decode(&stored, "secret").unwrap();
    assert_eq!(decoded, json!({"data": "test"}));
}

#[test]
fn restores_from_storage_on_init() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let opts = no_auto().storage(StorageKind::Local).secret("key");

        let temp = use_form(json!({"data": "initial"}), opts.clone());
        temp.set_field_value("data", "restored");
        temp.persist();

        let form = use_form(json!({"data": "initial"}), opts);
        assert_eq!(form.get_field_value("data"), Some(json!("restored")));
    });
}

#[test]
fn restore_replaces_rather_than_patches() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let opts = no_auto().secret("key");
        let old = use_form(json!({"a": 1}), opts.clone());
        old.persist();

        let form = use_form(json!({"a": 0, "b": {"c": 2}}), opts);
        assert_eq!(Value::Object(form.values()), json!({"a": 1, "b": null}));
    });
}

#[test]
fn clears_cache() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"data": "test"}), no_auto());
        form.persist();
        form.clear_cache();
    });
    assert_eq!(e.session.sets.borrow().len(), 1);
    assert_eq!(*e.session.removes.borrow(), vec!["/test".to_string()]);
    assert_eq!(e.session.inner.get_item("/test"), None);
}

#[test]
fn clear_cache_runs_even_when_cache_disabled() {
    let e = env("/test");
    e.session.inner.set_item("/test", "stale");
    with_host(e.host.clone(), || {
        use_form(json!({}), FormOptions::default().cache(false)).clear_cache();
    });
    assert_eq!(e.session.inner.get_item("/test"), None);
}

#[test]
fn auto_persists_on_scope_disposal() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let opts = FormOptions::default()
            .storage(StorageKind::Local)
            .secret("secret");

        let scope = Scope::new();
        let form = scope.run(|| use_form(json!({"value": "initial"}), opts.clone()));
        form.form().update(|m| {
            m.insert("value".into(), json!("changed"));
        });
        scope.dispose();

        assert_eq!(e.local.sets.borrow().len(), 1);

        let restored = use_form(json!({"value": "initial"}), opts.auto_persist(false));
        assert_eq!(restored.get_field_value("value"), Some(json!("changed")));
    });
}

#[test]
fn auto_persist_runs_exactly_once() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let scope = Scope::new();
        let form = scope.run(|| use_form(json!({"v": 1}), FormOptions::default()));
        form.dispose();
        scope.dispose();
        form.dispose();
    });
    assert_eq!(e.session.sets.borrow().len(), 1);
}

#[test]
fn explicit_dispose_persists_without_scope() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"v": 1}), FormOptions::default());
        form.set_field_value("v", 2);
        form.dispose();
    });
    let stored = e.session.inner.get_item("/test").unwrap();
    let decoded: Value = cache::decode(&stored, DEFAULT_SECRET).unwrap();
    assert_eq!(decoded, json!({"v": 2}));
}

#[test]
fn no_auto_persist_when_disabled() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let scope = Scope::new();
        scope.run(|| use_form(json!({"v": 1}), no_auto()));
        scope.dispose();

        let scope = Scope::new();
        scope.run(|| use_form(json!({"v": 1}), FormOptions::default().cache(false)));
        scope.dispose();
    });
    assert!(e.session.sets.borrow().is_empty());
}

#[test]
fn does_not_persist_when_cache_disabled() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"val": 1}), FormOptions::default().cache(false).auto_persist(false));
        form.persist();
    });
    assert!(e.local.sets.borrow().is_empty());
    assert!(e.session.sets.borrow().is_empty());
}

#[test]
fn empty_secret_disables_persistence() {
    let e = env("/test");
    e.session
        .inner
        .set_item("/test", &cache::encode(&json!({"v": 9}), "").unwrap());
    with_host(e.host.clone(), || {
        let form = use_form(json!({"v": 1}), no_auto().secret(""));
        assert_eq!(form.get_field_value("v"), Some(json!(1)));
        form.persist();
    });
    assert_eq!(e.session.gets.get(), 0);
    assert!(e.session.sets.borrow().is_empty());
}

#[test]
fn corrupt_cache_is_evicted() {
    let e = env("/test");
    e.session.inner.set_item("/test", "!!not-a-draft!!");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"v": 1}), no_auto());
        assert_eq!(form.get_field_value("v"), Some(json!(1)));
    });
    assert_eq!(*e.session.removes.borrow(), vec!["/test".to_string()]);
    assert_eq!(e.session.inner.get_item("/test"), None);
}

#[test]
fn wrong_secret_is_treated_as_miss() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let writer = use_form(json!({"data": "mine"}), no_auto().secret("right"));
        writer.persist();

        let reader = use_form(json!({"data": "initial"}), no_auto().secret("wrong"));
        assert_eq!(reader.get_field_value("data"), Some(json!("initial")));
    });
    assert_eq!(e.session.inner.get_item("/test"), None);
}

#[test]
fn storage_backends_are_isolated() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let local = use_form(json!({"who": "x"}), no_auto().storage(StorageKind::Local));
        local.set_field_value("who", "local");
        local.persist();

        let session = use_form(json!({"who": "x"}), no_auto().storage(StorageKind::Session));
        assert_eq!(session.get_field_value("who"), Some(json!("x")));
        session.set_field_value("who", "session");
        session.persist();

        let local_again = use_form(json!({"who": "x"}), no_auto().storage(StorageKind::Local));
        assert_eq!(local_again.get_field_value("who"), Some(json!("local")));
    });
}

#[test]
fn query_strings_share_a_slot() {
    let e = env("/search?q=rust");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"q": ""}), no_auto());
        assert_eq!(form.cache_key(), "/search");
        form.set_field_value("q", "rust");
        form.persist();
    });

    let other = e.host.at(Rc::new(StaticLocation::new("/search?q=other#top")));
    with_host(other, || {
        let form = use_form(json!({"q": ""}), no_auto());
        assert_eq!(form.get_field_value("q"), Some(json!("rust")));
    });
}

#[test]
fn cache_key_follows_navigation() {
    let e = env("/");
    let route = signal("/step-1".to_string());
    let host = e.host.at(Rc::new(route.clone()));
    with_host(host, || {
        let form = use_form(json!({"n": 1}), no_auto());
        route.set("/step-2?x=1".into());
        form.persist();
    });
    assert_eq!(*e.session.sets.borrow(), vec!["/step-2".to_string()]);
}

#[test]
fn field_reads_are_untracked() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"name": "a"}), no_auto());
        let untracked_runs = Rc::new(Cell::new(0));
        let tracked_runs = Rc::new(Cell::new(0));

        let untracked_obs = observe({
            let (form, runs) = (form.clone(), untracked_runs.clone());
            move || {
                let _ = form.get_field_value("name");
                runs.set(runs.get() + 1);
            }
        });
        let tracked_obs = observe({
            let (form, runs) = (form.clone(), tracked_runs.clone());
            move || {
                let _ = form.form().with(|m| m.get("name").cloned());
                runs.set(runs.get() + 1);
            }
        });

        form.set_field_value("name", "b");
        assert_eq!(untracked_runs.get(), 1);
        assert_eq!(tracked_runs.get(), 2);

        untracked_obs.dispose();
        tracked_obs.dispose();
    });
}

#[test]
fn subscribers_see_every_write() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"a": 1}), no_auto());
        let writes = Rc::new(Cell::new(0));
        let w = writes.clone();
        form.form().subscribe(move |_| w.set(w.get() + 1));

        form.set_field_value("a", 2);
        form.set_fields_value(&json!({"b": 1}));
        form.reset();
        assert_eq!(writes.get(), 3);
    });
}

#[test]
fn subscriber_can_write_back_derived_field() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"first": "a", "upper": "A"}), no_auto());
        let f2 = form.clone();
        form.form().subscribe(move |m| {
            let want = m["first"].as_str().unwrap_or_default().to_uppercase();
            if m["upper"] != want {
                f2.set_field_value("upper", want);
            }
        });

        form.set_field_value("first", "b");
        assert_eq!(form.get_field_value("upper"), Some(json!("B")));
        assert_eq!(Value::Object(form.values()), json!({"first": "b", "upper": "B"}));
    });
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    settings: Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Settings {
    theme: String,
    notifications: bool,
}

#[test]
fn typed_values_round_trip() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let profile = Profile {
            name: "David".into(),
            settings: Settings {
                theme: "light".into(),
                notifications: true,
            },
        };
        let form = FormState::from_serialize(&profile, no_auto()).unwrap();
        form.set_fields_value(&json!({"settings": {"theme": "dark"}}));

        let got: Profile = form.values_as().unwrap();
        assert_eq!(got.settings.theme, "dark");
        assert!(got.settings.notifications);
        assert_eq!(got.name, "David");
    });
}

#[test]
fn values_as_reports_shape_mismatch() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"name": 1}), no_auto());
        assert!(matches!(form.values_as::<Profile>(), Err(FormError::Deserialize(_))));
    });
}

#[test]
fn non_object_initial_values_start_empty() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!([1, 2, 3]), no_auto());
        assert!(form.values().is_empty());
        form.set_field_value("a.b", 1);
        assert_eq!(form.get_field_value("a"), Some(json!({"b": 1})));
    });
}

#[test]
fn known_paths_follow_initial_shape() {
    let e = env("/test");
    with_host(e.host.clone(), || {
        let form = use_form(json!({"user": {"name": "x", "tags": []}}), no_auto());
        assert_eq!(form.known_paths(), vec!["user", "user.name", "user.tags"]);
        assert!(form.is_known_path("user.name"));
        assert!(!form.is_known_path("user.email"));
        form.set_field_value("user.email", "e");
        assert!(!form.is_known_path("user.email"));
    });
}

#[test]
fn options_deserialize_with_defaults() {
    let opts: FormOptions = serde_json::from_value(json!({"storage": "local"})).unwrap();
    assert_eq!(
        opts,
        FormOptions {
            cache: true,
            secret: DEFAULT_SECRET.into(),
            storage: StorageKind::Local,
            auto_persist: true,
        }
    );
}
