use std::time::Duration;

use super::*;
use crate::bionic::{PrefixLength, markers};
use crate::dom::{ElementData, parse_html, share, to_html};
use crate::mutator::ReversibleMutator;
use crate::session::SessionGate;

fn workspace(source: &str) -> Workspace {
    Workspace::new(share(parse_html(source)), ReversibleMutator::default())
}

/// Append `<p>{text}</p>` to the body.
fn insert_paragraph(ws: &Workspace, text: &str) {
    let mut doc = ws.doc.lock();
    let p = doc.create_element(ElementData::new("p"));
    let t = doc.create_text(text);
    doc.append_child(p, t);
    let body = doc.body();
    doc.append_child(body, p);
}

fn word_count(ws: &Workspace) -> usize {
    to_html(&ws.doc.lock()).matches(markers::WORD).count()
}

#[tokio::test(start_paused = true)]
async fn test_transforms_inserted_content() {
    let ws = workspace("<html><body><p>existing</p></body></html>");
    let gate = SessionGate::new(PrefixLength::DEFAULT);
    gate.set_enabled(true);

    let mut monitor = ChangeMonitor::new(MonitorConfig::default());
    assert_eq!(monitor.state(), MonitorState::Idle);
    monitor.start(ws.clone(), gate.ticket());
    assert_eq!(monitor.state(), MonitorState::Observing);
    assert_eq!(ws.doc.lock().observer_count(), 1);

    insert_paragraph(&ws, "freshly loaded story");

    // Still inside the debounce window.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(word_count(&ws), 0);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(word_count(&ws), 3);
    // Content present before start is left to the full pass.
    assert!(to_html(&ws.doc.lock()).contains("<p>existing</p>"));
}

#[tokio::test(start_paused = true)]
async fn test_burst_is_debounced_into_one_batch() {
    let ws = workspace("<html><body></body></html>");
    let gate = SessionGate::new(PrefixLength::DEFAULT);
    gate.set_enabled(true);
    let mut monitor = ChangeMonitor::new(MonitorConfig::default());
    monitor.start(ws.clone(), gate.ticket());

    for i in 0..5 {
        insert_paragraph(&ws, &format!("item number {i}"));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    // 100ms after the last insertion: nothing flushed yet.
    assert_eq!(word_count(&ws), 0);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(word_count(&ws), 10);
}

#[tokio::test(start_paused = true)]
async fn test_own_output_settles() {
    let ws = workspace("<html><body></body></html>");
    let gate = SessionGate::new(PrefixLength::DEFAULT);
    gate.set_enabled(true);
    let mut monitor = ChangeMonitor::new(MonitorConfig::default());
    monitor.start(ws.clone(), gate.ticket());

    insert_paragraph(&ws, "one two, three!");
    tokio::time::sleep(Duration::from_millis(300)).await;
    let ledger = ws.mutator.lock().ledger().len();
    let html = to_html(&ws.doc.lock());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(ws.mutator.lock().ledger().len(), ledger);
    assert_eq!(to_html(&ws.doc.lock()), html);
}

#[tokio::test(start_paused = true)]
async fn test_stop_disconnects() {
    let ws = workspace("<html><body></body></html>");
    let gate = SessionGate::new(PrefixLength::DEFAULT);
    gate.set_enabled(true);
    let mut monitor = ChangeMonitor::new(MonitorConfig::default());
    monitor.start(ws.clone(), gate.ticket());

    insert_paragraph(&ws, "pending insertion");
    monitor.stop();
    assert_eq!(monitor.state(), MonitorState::Idle);
    tokio::task::yield_now().await;

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(word_count(&ws), 0);
    assert_eq!(ws.doc.lock().observer_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dead_ticket_ends_observation() {
    let ws = workspace("<html><body></body></html>");
    let gate = SessionGate::new(PrefixLength::DEFAULT);
    gate.set_enabled(true);
    let mut monitor = ChangeMonitor::new(MonitorConfig::default());
    monitor.start(ws.clone(), gate.ticket());

    insert_paragraph(&ws, "arrives before disable");
    gate.set_enabled(false);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(word_count(&ws), 0);
    assert_eq!(monitor.state(), MonitorState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_spent_budget_drops_batches() {
    let ws = workspace("<html><body></body></html>");
    let gate = SessionGate::new(PrefixLength::DEFAULT);
    gate.set_enabled(true);
    let config = MonitorConfig {
        budget_ms: 0,
        ..MonitorConfig::default()
    };
    let mut monitor = ChangeMonitor::new(config);
    monitor.start(ws.clone(), gate.ticket());

    insert_paragraph(&ws, "dropped under load");
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(word_count(&ws), 0);
    // Dropped, not queued: the monitor keeps observing.
    assert_eq!(monitor.state(), MonitorState::Observing);
}
