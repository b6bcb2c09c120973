//! Scheduler timing under paused tokio time.

mod support;

use std::time::Duration;

use surebet::app::{CycleCause, CycleEvent, CycleOutcome};
use surebet::testkit::config::{self as test_config, TENNIS_FEED};
use surebet::testkit::domain::{hours_later, sure_bet_event};
use tokio::sync::mpsc;

use support::harness_with;

const INTERVAL_SECS: u64 = 1800;

fn config(bootstrap: bool) -> surebet::app::Config {
    let mut config = test_config::config();
    config.schedule.interval_secs = INTERVAL_SECS;
    config.schedule.bootstrap_when_empty = bootstrap;
    config
}

async fn next(events: &mut mpsc::Receiver<CycleEvent>) -> CycleEvent {
    events.recv().await.expect("scheduler stopped unexpectedly")
}

#[tokio::test(start_paused = true)]
async fn empty_ledger_bootstraps_immediately() {
    let h = harness_with(config(true));
    h.source
        .set_events(TENNIS_FEED, vec![sure_bet_event("evt-1", hours_later(3))]);

    let (handle, mut events) = h.app.scheduler().unwrap().start();
    let started = tokio::time::Instant::now();
    let event = next(&mut events).await;

    assert_eq!(event.cause, CycleCause::Startup);
    assert!(event.result.unwrap().is_completed());
    assert!(started.elapsed() < Duration::from_secs(1));
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn populated_ledger_waits_for_the_first_interval() {
    let h = harness_with(config(true));
    h.source
        .set_events(TENNIS_FEED, vec![sure_bet_event("evt-1", hours_later(3))]);
    h.app.cycle().run().await.unwrap();

    let (handle, mut events) = h.app.scheduler().unwrap().start();
    let quiet = tokio::time::timeout(Duration::from_secs(INTERVAL_SECS - 60), events.recv()).await;
    assert!(quiet.is_err(), "no cycle should run before the interval");

    let event = next(&mut events).await;
    assert_eq!(event.cause, CycleCause::Interval);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn interval_keeps_scanning() {
    let h = harness_with(config(false));

    let (handle, mut events) = h.app.scheduler().unwrap().start();
    for _ in 0..3 {
        let event = next(&mut events).await;
        assert_eq!(event.cause, CycleCause::Interval);
    }
    assert_eq!(h.source.calls(), 6);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn manual_trigger_runs_a_cycle() {
    let h = harness_with(config(false));
    h.source
        .set_events(TENNIS_FEED, vec![sure_bet_event("evt-1", hours_later(3))]);

    let (handle, mut events) = h.app.scheduler().unwrap().start();
    assert!(handle.trigger());

    let event = next(&mut events).await;
    assert_eq!(event.cause, CycleCause::Manual);
    let outcome = event.result.unwrap();
    assert_eq!(outcome.report().map(|r| r.active), Some(1));
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn trigger_during_a_cycle_is_suppressed() {
    let h = harness_with(config(false));
    h.source.set_delay(Some(Duration::from_secs(5)));

    let (handle, mut events) = h.app.scheduler().unwrap().start();
    assert!(handle.trigger());
    while h.source.calls() == 0 {
        tokio::task::yield_now().await;
    }
    assert!(handle.trigger());

    let first = next(&mut events).await;
    assert_eq!(first.cause, CycleCause::Manual);
    assert!(first.result.unwrap().is_completed());

    let second = next(&mut events).await;
    assert_eq!(second.cause, CycleCause::Manual);
    assert!(matches!(second.result, Ok(CycleOutcome::Suppressed)));
    // Two feeds, fetched once.
    assert_eq!(h.source.calls(), 2);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_closes_the_event_stream() {
    let h = harness_with(config(false));
    let (handle, mut events) = h.app.scheduler().unwrap().start();

    handle.stop().await;

    assert!(events.recv().await.is_none());
}
