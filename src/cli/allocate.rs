//! Handler for the `allocate` command.

use rust_decimal::Decimal;
use serde_json::json;
use tabled::{Table, Tabled};

use super::view::legs;
use super::{output, AllocateArgs};
use crate::app::{open_service, AllocationRequest, Config};
use crate::domain::{OddsFormat, OpportunityId, StakeLeg, StakeRounding};
use crate::error::Result;

#[derive(Tabled)]
struct LegRow {
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Bookmaker")]
    bookmaker: String,
    #[tabled(rename = "Odds")]
    odds: String,
    #[tabled(rename = "Stake")]
    stake: String,
    #[tabled(rename = "Payout")]
    payout: String,
}

impl From<&StakeLeg> for LegRow {
    fn from(leg: &StakeLeg) -> Self {
        let odds = if leg.is_exchange {
            format!("{:.2} (net {:.4})", leg.outcome.price, leg.effective_price)
        } else {
            format!("{:.2}", leg.outcome.price)
        };
        Self {
            outcome: leg.outcome.label.clone(),
            bookmaker: leg.outcome.bookmaker.to_string(),
            odds,
            stake: format!("{:.2}", leg.stake),
            payout: format!("{:.2}", leg.payout),
        }
    }
}

/// Compute and print a stake split.
pub fn execute(config: &Config, args: &AllocateArgs) -> Result<()> {
    let service = open_service(config)?;
    let id = OpportunityId::new(args.id.as_str());
    let opportunity = service.opportunity(&id)?;
    let request = AllocationRequest {
        stake: args.stake,
        rounding: StakeRounding::from_flag(!args.exact),
    };
    let plan = service.allocate(&id, request)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "allocate",
            "id": id.as_str(),
            "event": opportunity.event_name(),
            "plan": plan,
        }));
        return Ok(());
    }

    output::section(&format!(
        "{} {}",
        opportunity.event_name(),
        output::muted(format!("({})", opportunity.sport()))
    ));
    output::note(&legs(&opportunity, OddsFormat::Decimal).replace('\n', ", "));

    let rows: Vec<LegRow> = plan.legs.iter().map(LegRow::from).collect();
    output::lines(&Table::new(rows).to_string());

    output::field("Total stake", format!("{:.2}", plan.total_stake));
    let profit = format!(
        "{:.2} ({:.2}%)",
        plan.guaranteed_profit, plan.guaranteed_profit_percent
    );
    if plan.guaranteed_profit > Decimal::ZERO {
        output::field("Profit", output::positive(profit));
    } else {
        output::field("Profit", output::negative(profit));
        output::warning("Rounding or commission removes the guaranteed profit");
    }
    if plan.rounding == StakeRounding::WholeUnits {
        output::hint("stakes rounded to whole units; pass --exact to keep pennies");
    }
    Ok(())
}
