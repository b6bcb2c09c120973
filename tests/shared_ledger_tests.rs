//! A scanning app and an admin service sharing one ledger file, the way
//! `surebet run` and a separate `surebet admin` process do.

use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use rust_decimal_macros::dec;
use surebet::adapter::store::JsonFileStore;
use surebet::app::config::StorageBackend;
use surebet::app::{App, Config, CycleOutcome, CycleReport, MarketService};
use surebet::port::{Clock, KeyValueStore, OddsSource};
use surebet::testkit::clock::ManualClock;
use surebet::testkit::config::{self as test_config, TENNIS_FEED};
use surebet::testkit::domain::{base_time, hours_later, sure_bet_event};
use surebet::testkit::source::ScriptedSource;
use tempfile::{tempdir, TempDir};

struct Shared {
    _dir: TempDir,
    source: Arc<ScriptedSource>,
    clock: Arc<ManualClock>,
    runner: App,
    admin: MarketService,
}

fn file_config(path: &Path) -> Config {
    let mut config = test_config::config();
    config.storage.backend = StorageBackend::File;
    config.storage.path = path.to_path_buf();
    config
}

/// The runner and the admin open the file independently.
fn shared() -> Shared {
    let dir = tempdir().unwrap();
    let config = file_config(&dir.path().join("ledger.json"));

    let source = Arc::new(ScriptedSource::new());
    let clock = Arc::new(ManualClock::new(base_time()));
    let store = Arc::new(JsonFileStore::open(&config.storage.path).unwrap());
    let runner = test_config::app(
        &config,
        Arc::clone(&source) as Arc<dyn OddsSource>,
        store as Arc<dyn KeyValueStore>,
        Arc::clone(&clock) as Arc<dyn Clock>,
    );
    let admin = surebet::app::open_service(&config).unwrap();

    Shared {
        _dir: dir,
        source,
        clock,
        runner,
        admin,
    }
}

fn completed(outcome: CycleOutcome) -> CycleReport {
    match outcome {
        CycleOutcome::Completed(report) => report,
        other => panic!("expected a completed cycle, got {other:?}"),
    }
}

#[tokio::test]
async fn runner_stops_when_another_process_deactivates_scanning() {
    let s = shared();
    s.source
        .set_events(TENNIS_FEED, vec![sure_bet_event("evt-1", hours_later(3))]);
    completed(s.runner.cycle().run().await.unwrap());

    let mut settings = s.admin.settings().unwrap();
    settings.is_active = false;
    s.admin.update_settings(settings).await.unwrap();

    let outcome = s.runner.cycle().run().await.unwrap();
    assert!(matches!(outcome, CycleOutcome::Inactive));
    assert!(!s.admin.settings().unwrap().is_active);
    assert!(!s.runner.service().settings().unwrap().is_active);
}

#[tokio::test]
async fn runner_commit_keeps_settings_written_by_another_process() {
    let s = shared();
    s.source
        .set_events(TENNIS_FEED, vec![sure_bet_event("evt-1", hours_later(3))]);

    let mut settings = s.admin.settings().unwrap();
    settings.alert_threshold_percent = dec!(5);
    s.admin.update_settings(settings).await.unwrap();

    let report = completed(s.runner.cycle().run().await.unwrap());
    assert_eq!(report.detected, 1);
    assert!(report.hot.is_empty());

    // The runner's ledger write leaves the threshold in place.
    assert_eq!(s.admin.settings().unwrap().alert_threshold_percent, dec!(5));
    assert_eq!(s.admin.active(None).unwrap().len(), 1);
}

#[tokio::test]
async fn clear_from_another_process_is_not_undone_by_the_next_cycle() {
    let s = shared();
    s.source
        .set_events(TENNIS_FEED, vec![sure_bet_event("evt-1", hours_later(3))]);
    completed(s.runner.cycle().run().await.unwrap());

    s.admin.clear().await.unwrap();
    assert!(s.admin.active(None).unwrap().is_empty());

    s.clock.advance(Duration::minutes(30));
    let report = completed(s.runner.cycle().run().await.unwrap());

    // Nothing from before the clear survives: the opportunity is new again.
    assert_eq!(report.detected, 1);
    assert_eq!(report.refreshed, 0);
    assert_eq!(report.active, 1);
    assert_eq!(report.history, 1);
    assert_eq!(
        s.admin.summary().unwrap().last_sync,
        Some(base_time() + Duration::minutes(30))
    );
}
