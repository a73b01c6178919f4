// SPDX-License-Identifier: MPL-2.0
use chrono::{DateTime, TimeZone, Utc};
use committed::config::{self, Config};
use committed::diagnostics::{DiagnosticEventKind, DiagnosticsCollector, ToastEvent};
use committed::error::BackendError;
use committed::notifications::{
    badge, CheatingAlert, ManualTimer, MemoryStore, Notification, NotificationCenter,
    NotificationId, NotificationType, ToastState, TokioTimer,
};
use committed::ui::theming::ThemeMode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

const USER: &str = "u-1";

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap()
}

fn unread(id: &str, secs: i64) -> Notification {
    Notification::new(
        id,
        USER,
        NotificationType::Message,
        format!("title {id}"),
        "body",
        at(secs),
    )
}

struct Harness {
    store: Arc<MemoryStore>,
    timer: ManualTimer,
    center: NotificationCenter,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let timer = ManualTimer::new();
    let mut center = NotificationCenter::new(USER, store.clone(), Arc::new(timer.clone()));
    center.connect(&*store);
    Harness {
        store,
        timer,
        center,
    }
}

fn toast_id(center: &NotificationCenter) -> Option<String> {
    center.toast().map(|n| n.id().to_string())
}

#[tokio::test]
async fn unread_count_matches_feed_after_refresh() {
    let mut h = harness();
    h.store.insert(unread("1", 1));
    h.store.insert(unread("2", 2).already_read());
    h.store.insert(unread("3", 3));
    h.center.process_pending();

    assert!(h.center.refresh().await);
    let feed = h.center.feed();
    let expected = feed.notifications().iter().filter(|n| !n.is_read()).count();
    assert_eq!(feed.unread_count(), expected);
    assert_eq!(feed.unread_count(), 2);
}

#[tokio::test]
async fn mark_as_read_is_idempotent_end_to_end() {
    let mut h = harness();
    h.store.insert(unread("1", 1));
    h.center.refresh().await;
    let id = NotificationId::from("1");

    h.center.mark_as_read(&id).expect("unread").await;
    assert!(h.center.mark_as_read(&id).is_none());
    assert_eq!(h.store.mark_calls(), 1);
    assert!(h.store.notification(&id).is_some_and(|n| n.is_read()));

    // The echo of the backend update changes nothing locally.
    assert_eq!(h.center.process_pending(), 0);
    assert!(h.center.feed().get(&id).is_some_and(Notification::is_read));
}

#[tokio::test]
async fn newest_unread_is_shown_first_and_older_waits() {
    let mut h = harness();
    h.store.insert(unread("1", 1));
    h.store.insert(unread("2", 2));
    h.center.refresh().await;

    assert_eq!(toast_id(&h.center).as_deref(), Some("2"));

    h.timer.advance(Duration::from_secs(5));
    h.center.refresh().await;
    assert_eq!(h.center.sequencer().state(), ToastState::Idle);

    // Reading 2 makes 1 the newest unread.
    h.center
        .mark_as_read(&NotificationId::from("2"))
        .expect("unread")
        .await;
    assert_eq!(toast_id(&h.center).as_deref(), Some("1"));
}

#[test]
fn toast_expires_after_five_seconds() {
    let mut h = harness();
    h.store.insert(unread("1", 1));
    h.center.process_pending();
    assert!(h.center.toast().is_some());

    h.timer.advance(Duration::from_millis(4_999));
    assert!(h.center.toast().is_some());
    h.timer.advance(Duration::from_millis(1));
    assert_eq!(h.center.sequencer().state(), ToastState::Idle);
    assert!(h.center.toast().is_none());
}

#[tokio::test]
async fn tapping_toast_reads_and_navigates() {
    let opened = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&opened);
    let store = Arc::new(MemoryStore::new());
    let timer = ManualTimer::new();
    let mut center = NotificationCenter::new(USER, store.clone(), Arc::new(timer.clone()))
        .with_navigator(move |n: &Notification| {
            sink.lock().unwrap().push(n.id().clone());
        });
    center.connect(&*store);

    store.insert(unread("1", 1));
    center.process_pending();

    let tapped = center.tap_toast().expect("toast visible");
    assert_eq!(tapped.notification, NotificationId::from("1"));
    assert_eq!(center.sequencer().state(), ToastState::Idle);
    assert!(center
        .feed()
        .get(&tapped.notification)
        .is_some_and(Notification::is_read));
    assert_eq!(timer.pending(), 0);

    tapped.request.expect("mark request").await;
    assert!(store
        .notification(&tapped.notification)
        .is_some_and(|n| n.is_read()));
    assert_eq!(*opened.lock().unwrap(), vec![NotificationId::from("1")]);
}

#[test]
fn badge_sums_and_caps() {
    assert_eq!(badge(3, 2).count(), 5);
    assert_eq!(badge(55, 60).to_string(), "99+");
}

#[tokio::test]
async fn badge_counts_notifications_and_alerts() {
    let mut h = harness();
    for i in 0..3 {
        h.store.insert(unread(&format!("n-{i}"), i));
    }
    for i in 0..2 {
        h.store
            .insert_alert(USER, CheatingAlert::new(format!("a-{i}"), at(i)));
    }
    h.center.refresh().await;

    assert_eq!(h.center.badge().count(), 5);
    assert_eq!(h.center.badge().to_string(), "5");
}

#[tokio::test]
async fn seen_notification_does_not_retrigger_on_unchanged_refresh() {
    let mut collector = DiagnosticsCollector::default();
    let mut h = harness();
    h.center.set_diagnostics(collector.handle());
    h.store.insert(unread("1", 1));
    h.center.refresh().await;
    h.timer.advance(Duration::from_secs(5));

    h.center.refresh().await;
    assert!(h.center.toast().is_none());

    collector.process_pending();
    let toast_events: Vec<ToastEvent> = collector
        .iter()
        .filter_map(|e| match &e.kind {
            DiagnosticEventKind::Toast { event, .. } => Some(*event),
            _ => None,
        })
        .collect();
    assert_eq!(toast_events.first(), Some(&ToastEvent::Shown));
    assert!(toast_events.contains(&ToastEvent::Expired));
    assert_eq!(
        toast_events
            .iter()
            .filter(|e| **e == ToastEvent::Shown)
            .count(),
        1
    );
}

#[test]
fn new_arrival_replaces_visible_toast() {
    let mut h = harness();
    h.store.insert(unread("1", 1));
    h.center.process_pending();
    h.timer.advance(Duration::from_secs(4));

    h.store.insert(unread("2", 2));
    h.center.process_pending();
    assert_eq!(toast_id(&h.center).as_deref(), Some("2"));

    // Timer restarted: still visible 4s later.
    h.timer.advance(Duration::from_secs(4));
    assert_eq!(toast_id(&h.center).as_deref(), Some("2"));
    h.timer.advance(Duration::from_secs(1));
    assert!(h.center.toast().is_none());
}

#[tokio::test]
async fn refresh_failure_keeps_state_and_toast() {
    let mut h = harness();
    h.store.insert(unread("1", 1));
    h.center.refresh().await;

    h.store
        .set_failure(Some(BackendError::Network("timed out".into())));
    assert!(!h.center.refresh().await);
    assert_eq!(h.center.feed().notifications().len(), 1);
    assert_eq!(toast_id(&h.center).as_deref(), Some("1"));
}

#[test]
fn other_users_changes_are_not_delivered() {
    let mut h = harness();
    h.store.insert(Notification::new(
        "x",
        "u-2",
        NotificationType::Follow,
        "t",
        "m",
        at(0),
    ));
    assert_eq!(h.center.process_pending(), 0);
    assert_eq!(h.center.badge().count(), 0);
}

#[tokio::test(start_paused = true)]
async fn tokio_timer_drives_auto_dismiss() {
    let store = Arc::new(MemoryStore::new());
    let timer = TokioTimer::current().expect("inside a runtime");
    let mut center = NotificationCenter::new(USER, store.clone(), Arc::new(timer));
    center.connect(&*store);

    store.insert(unread("1", 1));
    center.process_pending();
    assert!(center.toast().is_some());

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(center.toast().is_none());
}

#[test]
fn config_timeout_drives_sequencer() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let config = Config {
        toast_timeout_secs: Some(2),
        theme_mode: Some(ThemeMode::Dark),
        diagnostics_buffer_capacity: None,
    };
    config::save_to_path(&config, &path).expect("Failed to write config file");
    let loaded = config::load_from_path(&path).expect("Failed to load config from path");

    let store = Arc::new(MemoryStore::new());
    let timer = ManualTimer::new();
    let mut center = NotificationCenter::new(USER, store.clone(), Arc::new(timer.clone()))
        .with_timeout(loaded.toast_timeout());
    center.connect(&*store);

    store.insert(unread("1", 1));
    center.process_pending();
    timer.advance(Duration::from_secs(2));
    assert!(center.toast().is_none());
    assert_eq!(loaded.theme_mode(), ThemeMode::Dark);

    dir.close().expect("Failed to close temporary directory");
}

#[tokio::test]
async fn refresh_started_before_mark_does_not_unread() {
    let mut h = harness();
    h.store.insert(unread("1", 1));
    h.center.refresh().await;
    let id = NotificationId::from("1");

    let snapshot = h.center.fetch().await;
    let request = h.center.mark_as_read(&id).expect("unread notification");
    h.center.apply_fetch(snapshot);
    request.await;
    h.center.process_pending();

    assert!(h.center.feed().get(&id).is_some_and(|n| n.is_read()));
    assert_eq!(h.center.badge().count(), 0);
    assert!(h.center.mark_as_read(&id).is_none());
}
