//! Handlers for `surebet admin`.
//!
//! Every mutation goes through [`MarketService`], which asks the configured
//! authorizer before touching the ledger.

use std::fs;

use serde_json::json;

use super::{output, AdminCommand, SettingsArgs};
use crate::app::{open_service, Config, MarketService};
use crate::domain::{BookmakerId, OpportunityId, Settings};
use crate::error::Result;

pub async fn execute(config: &Config, command: AdminCommand) -> Result<()> {
    let service = open_service(config)?;

    match command {
        AdminCommand::Remove { id } => remove(&service, &id).await,
        AdminCommand::Export { output: path } => {
            let exported = service.export()?;
            match path {
                Some(path) => {
                    fs::write(&path, exported)?;
                    output::success(&format!("Active set written to {}", path.display()));
                }
                None => println!("{exported}"),
            }
            Ok(())
        }
        AdminCommand::Import { file } => {
            let json = fs::read_to_string(&file)?;
            let count = service.import(&json).await?;
            if output::is_json() {
                output::json_output(json!({ "command": "admin.import", "imported": count }));
            } else {
                output::success(&format!("Imported {count} active opportunities"));
            }
            Ok(())
        }
        AdminCommand::Clear { yes } => {
            if !yes {
                output::warning("This deletes the active set, the history and the last sync time");
                output::hint(&format!(
                    "run {} to confirm",
                    output::highlight("surebet admin clear --yes")
                ));
                return Ok(());
            }
            service.clear().await?;
            output::success("Ledger cleared");
            Ok(())
        }
        AdminCommand::Settings(args) => settings(&service, args).await,
    }
}

async fn remove(service: &MarketService, id: &str) -> Result<()> {
    let removed = service.remove(&OpportunityId::new(id)).await?;
    if output::is_json() {
        output::json_output(json!({ "command": "admin.remove", "removed": removed }));
    } else {
        output::success(&format!("Removed {} ({})", removed.id(), removed.event_name()));
    }
    Ok(())
}

/// Apply the given flags to the stored settings.
pub fn apply(mut settings: Settings, args: SettingsArgs) -> Settings {
    if let Some(active) = args.active {
        settings.is_active = active;
    }
    if let Some(commission) = args.commission {
        settings.commission_percent = commission;
    }
    if let Some(threshold) = args.threshold {
        settings.alert_threshold_percent = threshold;
    }
    if let Some(exchanges) = args.exchanges {
        settings.exchange_bookmakers = exchanges
            .into_iter()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(BookmakerId::new)
            .collect();
    }
    settings
}

async fn settings(service: &MarketService, args: SettingsArgs) -> Result<()> {
    let current = service.settings()?;
    let settings = if args.is_empty() {
        current
    } else {
        let updated = apply(current, args);
        service.update_settings(updated.clone()).await?;
        output::success("Settings updated");
        updated
    };

    if output::is_json() {
        output::json_output(json!({ "command": "admin.settings", "settings": settings }));
        return Ok(());
    }

    output::section("Settings");
    output::field(
        "Scanner",
        if settings.is_active {
            output::positive("active")
        } else {
            output::negative("inactive")
        },
    );
    output::field("Commission", format!("{}%", settings.commission_percent));
    output::field("Hot above", format!("{}%", settings.alert_threshold_percent));
    let exchanges: Vec<&str> = settings
        .exchange_bookmakers
        .iter()
        .map(BookmakerId::as_str)
        .collect();
    output::field("Exchanges", exchanges.join(", "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn apply_only_changes_given_flags() {
        let args = SettingsArgs {
            active: Some(false),
            commission: None,
            threshold: Some(dec!(5)),
            exchanges: Some(vec!["smarkets".into(), " ".into()]),
        };
        let updated = apply(Settings::default(), args);

        assert!(!updated.is_active);
        assert_eq!(updated.commission_percent, dec!(2.0));
        assert_eq!(updated.alert_threshold_percent, dec!(5));
        assert_eq!(updated.exchange_bookmakers.len(), 1);
        assert!(updated.exchange_bookmakers.contains(&BookmakerId::new("smarkets")));
    }
}
