//! End-to-end behaviour of the app store: dispatch, effects, listeners.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use pocket_todo::{
    AppAction, AppConfig, AppEnvironment, AppState, AppStore, TaskId, UiAction, new_store,
    store_with_environment,
};
use pocket_todo_testing::{SequentialIdGenerator, test_clock};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

fn test_store() -> AppStore {
    let env = AppEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(SequentialIdGenerator::new("task")),
    );
    store_with_environment(env, &AppConfig::default())
}

/// Records `(task count, banner visible)` on every notification
fn record(store: &AppStore) -> (pocket_todo_runtime::Subscription, Arc<Mutex<Vec<(usize, bool)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(move |state: &AppState| {
        sink.lock()
            .unwrap()
            .push((state.tasks.len(), state.ui.banner_visible));
    });
    (subscription, seen)
}

#[test]
fn submit_creates_task_then_raises_banner() {
    let store = test_store();
    let (_subscription, seen) = record(&store);

    store.send(AppAction::submit("Buy milk"));

    let state = store.snapshot();
    assert_eq!(state.tasks.len(), 1);
    let task = &state.tasks.as_slice()[0];
    assert_eq!(task.id, TaskId::from("task-1"));
    assert_eq!(task.title, "Buy milk");
    assert!(!task.done);
    assert_eq!(task.created_at_millis(), 1_735_689_600_000);
    assert!(state.ui.banner_visible);

    // Submit, then its two follow-ups, each notified separately
    assert_eq!(*seen.lock().unwrap(), vec![(0, false), (1, false), (1, true)]);
}

#[test]
fn blank_submit_changes_nothing() {
    let store = test_store();
    let (_subscription, seen) = record(&store);

    store.send(AppAction::submit("   "));

    assert_eq!(store.snapshot(), AppState::new());
    assert_eq!(*seen.lock().unwrap(), vec![(0, false)]);
}

#[test]
fn create_toggle_wipe_keeps_most_recent_first() {
    let store = test_store();

    store.send(AppAction::create_task("Buy milk"));
    store.send(AppAction::create_task("Walk dog"));
    let (milk, dog) = store.state(|s| {
        let titles: Vec<&str> = s.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Walk dog", "Buy milk"]);
        (s.tasks.as_slice()[1].id.clone(), s.tasks.as_slice()[0].id.clone())
    });

    store.send(AppAction::toggle_task(milk.clone()));
    store.state(|s| {
        assert!(s.tasks.get(&milk).unwrap().done);
        assert!(!s.tasks.get(&dog).unwrap().done);
        // Plain creates never raise the banner
        assert!(!s.ui.banner_visible);
    });

    store.send(AppAction::wipe_tasks());
    assert!(store.state(|s| s.tasks.is_empty()));
}

#[test]
fn walkthrough_matches_expected_states() {
    let store = test_store();

    store.send(AppAction::submit("Buy milk"));
    store.send(AppAction::submit("  Walk dog  "));
    store.state(|s| {
        let titles: Vec<&str> = s.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Walk dog", "Buy milk"]);
    });

    store.send(AppAction::toggle_task("task-1"));
    assert!(store.state(|s| s.tasks.get(&TaskId::from("task-1")).unwrap().done));
    assert_eq!(store.state(|s| s.tasks.done_count()), 1);

    store.send(AppAction::Ui(UiAction::HideBanner));
    store.send(AppAction::Ui(UiAction::ToggleTheme));
    assert!(store.state(|s| s.ui.dark && !s.ui.banner_visible));

    let before = store.snapshot();
    store.send(AppAction::delete_task("no-such-task"));
    store.send(AppAction::toggle_task("no-such-task"));
    assert_eq!(store.snapshot(), before);

    store.send(AppAction::delete_task("task-2"));
    store.state(|s| {
        assert_eq!(s.tasks.len(), 1);
        assert_eq!(s.tasks.as_slice()[0].title, "Buy milk");
    });

    store.send(AppAction::wipe_tasks());
    assert!(store.state(|s| s.tasks.is_empty()));
    assert!(store.state(|s| s.ui.dark));
}

#[test]
fn listener_can_dismiss_the_banner() {
    let store = test_store();
    let inner = store.clone();
    let order = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&order);

    let subscription = store.subscribe(move |state: &AppState| {
        sink.lock().unwrap().push(state.ui.banner_visible);
        // Auto-dismiss the banner, as a view timer would
        if state.ui.banner_visible {
            inner.send(AppAction::Ui(UiAction::HideBanner));
        }
    });

    store.send(AppAction::submit("Buy milk"));

    assert!(!store.state(|s| s.ui.banner_visible));
    assert_eq!(store.state(|s| s.tasks.len()), 1);
    // Submit, Create, TriggerBanner, then the HideBanner dispatched from the listener
    assert_eq!(*order.lock().unwrap(), vec![false, false, true, false]);

    // Drops the listener and with it the store handle it captured
    subscription.unsubscribe();
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn listener_sees_its_own_dispatch_applied() {
    let store = test_store();
    let inner = store.clone();
    let observed = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&observed);

    let subscription = store.subscribe(move |state: &AppState| {
        if state.ui.banner_visible && !state.ui.dark {
            inner.send(AppAction::Ui(UiAction::ToggleTheme));
            *sink.lock().unwrap() = Some(inner.state(|s| s.ui.dark));
        }
    });

    store.send(AppAction::Ui(UiAction::TriggerBanner));

    assert_eq!(*observed.lock().unwrap(), Some(true));
    subscription.unsubscribe();
}

#[test]
fn send_inside_state_read_does_not_block() {
    let store = test_store();
    let handle = store.clone();
    let (done_tx, done_rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        handle.state(|s| {
            if !s.ui.dark {
                handle.send(AppAction::Ui(UiAction::ToggleTheme));
            }
        });
        let _ = done_tx.send(());
    });

    done_rx
        .recv_timeout(std::time::Duration::from_secs(3))
        .expect("send inside state() never returned");
    assert!(store.state(|s| s.ui.dark));
}

#[test]
fn dropped_subscription_stops_notifications() {
    let store = test_store();
    let (subscription, seen) = record(&store);

    store.send(AppAction::Ui(UiAction::ToggleTheme));
    drop(subscription);
    store.send(AppAction::Ui(UiAction::ToggleTheme));

    assert_eq!(seen.lock().unwrap().len(), 1);
    assert!(!store.state(|s| s.ui.dark));
}

#[test]
fn concurrent_submits_all_land_with_unique_ids() {
    let store = new_store(&AppConfig::default());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = store.clone();
            std::thread::spawn(move || {
                for n in 0..25 {
                    store.send(AppAction::submit(format!("task {worker}-{n}")));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    store.state(|s| {
        assert_eq!(s.tasks.len(), 100);
        let ids: HashSet<&TaskId> = s.tasks.iter().map(|t| &t.id).collect();
        assert_eq!(ids.len(), 100);
        assert!(s.ui.banner_visible);
    });
}

#[test]
fn snapshot_exports_as_json() {
    let store = test_store();
    store.send(AppAction::submit("Buy milk"));

    let json: serde_json::Value =
        serde_json::from_str(&store.state(AppState::to_json).unwrap()).unwrap();

    assert_eq!(json["tasks"][0]["id"], "task-1");
    assert_eq!(json["tasks"][0]["createdAt"], 1_735_689_600_000_i64);
    assert_eq!(json["ui"]["bannerVisible"], true);
}
