#![allow(dead_code)]

pub mod architecture;
pub mod assertions;

use std::sync::Arc;

use surebet::app::{App, Config};
use surebet::port::{Authorizer, Clock, KeyValueStore, OddsSource};
use surebet::testkit::clock::ManualClock;
use surebet::testkit::config;
use surebet::testkit::domain::base_time;
use surebet::testkit::source::ScriptedSource;
use surebet::testkit::store::FailingStore;

/// An app wired to scripted collaborators the test keeps handles to.
pub struct Harness {
    pub source: Arc<ScriptedSource>,
    pub store: Arc<FailingStore>,
    pub clock: Arc<ManualClock>,
    pub app: App,
}

pub fn harness() -> Harness {
    harness_with(config::config())
}

pub fn harness_with(config: Config) -> Harness {
    let source = Arc::new(ScriptedSource::new());
    let store = Arc::new(FailingStore::new());
    let clock = Arc::new(ManualClock::new(base_time()));
    let app = config::app(
        &config,
        Arc::clone(&source) as Arc<dyn OddsSource>,
        Arc::clone(&store) as Arc<dyn KeyValueStore>,
        Arc::clone(&clock) as Arc<dyn Clock>,
    );
    Harness {
        source,
        store,
        clock,
        app,
    }
}

pub fn harness_with_authorizer(authorizer: Arc<dyn Authorizer>) -> Harness {
    let config = config::config();
    let source = Arc::new(ScriptedSource::new());
    let store = Arc::new(FailingStore::new());
    let clock = Arc::new(ManualClock::new(base_time()));
    let app = config::app_with_authorizer(
        &config,
        Arc::clone(&source) as Arc<dyn OddsSource>,
        Arc::clone(&store) as Arc<dyn KeyValueStore>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        authorizer,
    );
    Harness {
        source,
        store,
        clock,
        app,
    }
}
