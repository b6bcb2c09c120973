//! Recurring scan scheduler.
//!
//! Runs [`ScanCycle`]s on a fixed interval and on manual triggers. Cycles run
//! one at a time on the scheduler task; triggers that arrive while a cycle
//! is running are reported as suppressed instead of queueing another fetch.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::cycle::{CycleOutcome, ScanCycle};
use crate::error::Error;

/// Why a cycle ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleCause {
    Startup,
    Interval,
    Manual,
}

/// Result of one scheduled cycle.
#[derive(Debug)]
pub struct CycleEvent {
    pub cause: CycleCause,
    pub result: Result<CycleOutcome, Error>,
}

/// Handle to control a running scheduler.
pub struct SchedulerHandle {
    trigger_tx: mpsc::Sender<()>,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Ask for an immediate cycle.
    ///
    /// Returns false when a trigger is already pending or the scheduler has
    /// stopped.
    pub fn trigger(&self) -> bool {
        self.trigger_tx.try_send(()).is_ok()
    }

    /// Signal the scheduler to stop and wait for the current cycle to end.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(err) = self.task.await {
            error!(error = %err, "Scheduler task failed");
        }
    }
}

/// Drives scan cycles.
pub struct Scheduler {
    cycle: Arc<ScanCycle>,
    interval: Duration,
    run_on_start: bool,
}

impl Scheduler {
    pub fn new(cycle: Arc<ScanCycle>, interval: Duration) -> Self {
        Self {
            cycle,
            interval,
            run_on_start: false,
        }
    }

    /// Run a cycle immediately after [`start`](Self::start).
    pub fn run_on_start(mut self, enabled: bool) -> Self {
        self.run_on_start = enabled;
        self
    }

    /// Start the scheduler.
    ///
    /// Returns a handle to control it and a receiver for cycle results.
    pub fn start(self) -> (SchedulerHandle, mpsc::Receiver<CycleEvent>) {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(1);
        let (event_tx, event_rx) = mpsc::channel::<CycleEvent>(16);

        let cycle = self.cycle;
        let interval = self.interval;
        let run_on_start = self.run_on_start;

        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            timer.tick().await;

            info!(interval_secs = interval.as_secs(), "Scheduler started");

            if run_on_start && !run_and_report(&cycle, CycleCause::Startup, &event_tx).await {
                return;
            }

            loop {
                let cause = tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Scheduler shutting down");
                        break;
                    }
                    _ = timer.tick() => CycleCause::Interval,
                    Some(()) = trigger_rx.recv() => CycleCause::Manual,
                };

                if !run_and_report(&cycle, cause, &event_tx).await {
                    break;
                }

                // Triggers that arrived during the cycle would repeat it.
                while trigger_rx.try_recv().is_ok() {
                    let event = CycleEvent {
                        cause: CycleCause::Manual,
                        result: Ok(CycleOutcome::Suppressed),
                    };
                    if event_tx.send(event).await.is_err() {
                        return;
                    }
                }
                if cause == CycleCause::Manual {
                    timer.reset();
                }
            }
        });

        (
            SchedulerHandle {
                trigger_tx,
                shutdown_tx,
                task,
            },
            event_rx,
        )
    }
}

/// Run one cycle and forward its result. Returns false once nobody listens.
async fn run_and_report(
    cycle: &ScanCycle,
    cause: CycleCause,
    events: &mpsc::Sender<CycleEvent>,
) -> bool {
    debug!(?cause, "Cycle starting");
    let result = cycle.run().await;
    if let Err(err) = &result {
        error!(?cause, error = %err, "Scan cycle failed, ledger left unchanged");
    }

    if events.send(CycleEvent { cause, result }).await.is_err() {
        debug!("Cycle event receiver dropped");
        return false;
    }
    true
}
