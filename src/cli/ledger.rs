//! Handlers for the read-only ledger views: `active`, `history`, `status`.

use serde_json::json;

use super::view::{age, odds_format, opportunity_table, timestamp};
use super::{output, ActiveArgs, HistoryArgs};
use crate::app::{open_service, Config};
use crate::error::{ConfigError, Result};

/// List active opportunities, best yield first.
pub fn active(config: &Config, args: &ActiveArgs) -> Result<()> {
    let service = open_service(config)?;
    let settings = service.settings()?;
    let opportunities = service.active(args.sport)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "active",
            "count": opportunities.len(),
            "alert_threshold_percent": settings.alert_threshold_percent,
            "opportunities": opportunities,
        }));
        return Ok(());
    }

    output::section("Active opportunities");
    if opportunities.is_empty() {
        output::note("No active opportunities");
        return Ok(());
    }

    let format = odds_format(args.fractional);
    output::lines(&opportunity_table(
        &opportunities,
        format,
        settings.alert_threshold_percent,
    ));

    let hot = opportunities
        .iter()
        .filter(|opp| opp.is_hot(settings.alert_threshold_percent))
        .count();
    output::field("Total", opportunities.len());
    if hot > 0 {
        output::field("Hot", output::flame(hot));
    }
    output::hint(&format!(
        "run {} to split a stake",
        output::highlight("surebet allocate <id> --stake <amount>")
    ));
    Ok(())
}

/// Show the history by month, newest first.
pub fn history(config: &Config, args: &HistoryArgs) -> Result<()> {
    if let Some(month) = &args.month {
        if !is_month(month) {
            return Err(ConfigError::InvalidValue {
                field: "--month",
                reason: format!("'{month}' is not YYYY-MM"),
            }
            .into());
        }
    }

    let service = open_service(config)?;
    let settings = service.settings()?;
    let buckets: Vec<_> = service
        .history()?
        .into_iter()
        .filter(|bucket| {
            args.month
                .as_deref()
                .map_or(true, |month| bucket.month.to_string() == month)
        })
        .collect();

    if output::is_json() {
        let months: Vec<_> = buckets
            .iter()
            .map(|bucket| {
                json!({
                    "month": bucket.month.to_string(),
                    "entries": bucket.entries,
                })
            })
            .collect();
        output::json_output(json!({
            "command": "history",
            "months": months,
        }));
        return Ok(());
    }

    if buckets.is_empty() {
        output::section("History");
        output::note("No history recorded");
        return Ok(());
    }

    let format = odds_format(args.fractional);
    for bucket in &buckets {
        output::section(&format!("{} ({} entries)", bucket.month, bucket.entries.len()));
        output::lines(&opportunity_table(
            &bucket.entries,
            format,
            settings.alert_threshold_percent,
        ));
    }
    Ok(())
}

/// Dashboard summary.
pub fn status(config: &Config) -> Result<()> {
    let service = open_service(config)?;
    let summary = service.summary()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "status",
            "is_active": summary.is_active,
            "active": summary.active,
            "hot": summary.hot,
            "max_yield_percent": summary.max_yield,
            "history": summary.history,
            "last_sync": summary.last_sync,
            "last_sync_age_secs": summary.last_sync_age.map(|age| age.num_seconds()),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Ledger");
    output::field(
        "Scanner",
        if summary.is_active {
            output::positive("active")
        } else {
            output::negative("inactive")
        },
    );
    output::field("Active", summary.active);
    output::field(
        "Hot",
        if summary.hot > 0 {
            output::flame(summary.hot)
        } else {
            summary.hot.to_string()
        },
    );
    output::field(
        "Max yield",
        summary
            .max_yield
            .map_or_else(|| output::muted("-"), |y| output::positive(format!("{y:.2}%"))),
    );
    output::field("History", summary.history);
    match (summary.last_sync, summary.last_sync_age) {
        (Some(at), Some(elapsed)) => {
            output::field("Last sync", format!("{} ({} ago)", timestamp(at), age(elapsed)));
        }
        _ => output::field("Last sync", output::muted("never")),
    }
    Ok(())
}

fn is_month(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || b.is_ascii_digit())
        && matches!(value[5..].parse::<u32>(), Ok(1..=12))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_filter_format() {
        assert!(is_month("2026-05"));
        assert!(is_month("2025-12"));
        assert!(!is_month("2026-13"));
        assert!(!is_month("2026-5"));
        assert!(!is_month("26-05-01"));
        assert!(!is_month("2026/05"));
    }
}
