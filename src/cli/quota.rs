//! Handler for the `quota` command.

use serde_json::json;

use super::output;
use crate::adapter::odds_api::OddsApiClient;
use crate::app::Config;
use crate::error::Result;
use crate::port::OddsSource;

/// Ask the provider how many requests remain.
pub async fn execute(config: &Config) -> Result<()> {
    let client = OddsApiClient::from_config(&config.source)?;

    let pb = output::spinner("Checking quota");
    let remaining = match client.remaining_quota().await {
        Ok(remaining) => remaining,
        Err(err) => {
            output::spinner_fail(&pb, "Quota check failed");
            return Err(err.into());
        }
    };
    output::spinner_success(&pb, "Quota checked");

    if output::is_json() {
        output::json_output(json!({
            "command": "quota",
            "source": client.name(),
            "remaining": remaining,
        }));
        return Ok(());
    }

    output::field("Source", client.name());
    match remaining {
        Some(left) if left == 0 => output::field("Remaining", output::negative(left)),
        Some(left) => output::field("Remaining", output::positive(left)),
        None => output::field("Remaining", output::muted("not reported")),
    }
    Ok(())
}
