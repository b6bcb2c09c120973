//! Handler for the `run` command.

use std::path::Path;

use tracing::info;

use super::view::timestamp;
use super::{output, RunArgs};
use crate::app::{App, Config, CycleEvent, CycleOutcome};
use crate::error::Result;

/// Scan on the configured schedule until Ctrl-C.
pub async fn execute(config_path: &Path, args: &RunArgs) -> Result<()> {
    let mut config = Config::load(config_path)?;

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    config.init_logging();
    output::header(env!("CARGO_PKG_VERSION"));

    let app = App::from_config(&config, &args.sport)?;
    info!(
        feeds = app.cycle().scanner().feeds().len(),
        interval_secs = config.schedule.interval_secs,
        "surebet starting"
    );

    app.run(report_event).await?;

    info!("surebet stopped");
    Ok(())
}

/// Surface hot opportunities from each completed cycle.
fn report_event(event: &CycleEvent) {
    let Ok(CycleOutcome::Completed(report)) = &event.result else {
        return;
    };
    let at = timestamp(report.synced_at);
    for opp in &report.hot {
        output::hot(
            &at,
            &format!(
                "{} {} {}",
                opp.event_name(),
                output::muted(opp.sport()),
                output::flame(format!("{:.2}%", opp.profit_percentage()))
            ),
        );
    }
}
