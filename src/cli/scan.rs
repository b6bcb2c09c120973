//! Handler for the `scan` command.

use serde_json::json;

use super::view::{opportunity_table, timestamp};
use super::{output, ScanArgs};
use crate::app::{App, Config, CycleOutcome, CycleReport};
use crate::domain::{OddsFormat, Percent};
use crate::error::Result;

/// Run one scan cycle in the foreground.
pub async fn execute(config: &Config, args: &ScanArgs) -> Result<()> {
    config.logging.init_stderr();
    let app = App::from_config(config, &args.sport)?;
    let feeds = app.cycle().scanner().feeds().len();

    let pb = output::spinner(&format!("Scanning {feeds} feeds"));
    let outcome = match app.cycle().run().await {
        Ok(outcome) => outcome,
        Err(err) => {
            output::spinner_fail(&pb, "Scan failed, ledger left unchanged");
            return Err(err);
        }
    };

    match outcome {
        CycleOutcome::Completed(report) => {
            output::spinner_success(&pb, "Scan complete");
            let threshold = app.service().settings()?.alert_threshold_percent;
            print_report(&report, threshold);
        }
        CycleOutcome::Suppressed => {
            output::spinner_fail(&pb, "Another scan is already running");
        }
        CycleOutcome::Inactive => {
            output::spinner_fail(&pb, "Scanner is inactive");
            output::hint(&format!(
                "run {} to switch it on",
                output::highlight("surebet admin settings --active true")
            ));
            if output::is_json() {
                output::json_output(json!({ "command": "scan", "status": "inactive" }));
            }
        }
        CycleOutcome::SourceUnavailable { feeds_failed } => {
            output::spinner_fail(&pb, "Odds source unavailable");
            output::warning(&format!(
                "All {feeds_failed} feeds failed; the ledger was not changed"
            ));
            if output::is_json() {
                output::json_output(json!({
                    "command": "scan",
                    "status": "source_unavailable",
                    "feeds_failed": feeds_failed,
                }));
            }
        }
    }
    Ok(())
}

fn print_report(report: &CycleReport, threshold: Percent) {
    if output::is_json() {
        output::json_output(json!({
            "command": "scan",
            "status": "completed",
            "synced_at": report.synced_at,
            "feeds_ok": report.feeds_ok,
            "feeds_failed": report.feeds_failed,
            "events": report.events,
            "malformed": report.malformed,
            "detected": report.detected,
            "refreshed": report.refreshed,
            "carried": report.carried,
            "expired": report.expired,
            "pruned": report.pruned,
            "active": report.active,
            "history": report.history,
            "hot": report.hot,
            "remaining_quota": report.remaining_quota,
        }));
        return;
    }

    output::section("Scan");
    output::field("Synced", timestamp(report.synced_at));
    if report.feeds_failed > 0 {
        output::field(
            "Feeds",
            format!(
                "{} ok, {}",
                report.feeds_ok,
                output::negative(format!("{} failed", report.feeds_failed))
            ),
        );
    } else {
        output::field("Feeds", format!("{} ok", report.feeds_ok));
    }
    output::field("Events", report.events);
    if report.malformed > 0 {
        output::field("Malformed", output::muted(report.malformed));
    }
    output::field("New", output::positive(report.detected));
    output::field("Refreshed", report.refreshed);
    output::field("Carried", report.carried);
    output::field("Expired", report.expired);
    output::field("Active", report.active);
    output::field("History", report.history);
    if let Some(quota) = report.remaining_quota {
        output::field("Quota left", quota);
    }

    if !report.hot.is_empty() {
        output::section("Hot");
        output::lines(&opportunity_table(&report.hot, OddsFormat::Decimal, threshold));
    }
}
