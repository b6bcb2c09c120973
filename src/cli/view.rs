//! Table rows shared by the listing commands.

use chrono::{DateTime, Duration, Utc};
use tabled::{Table, Tabled};

use super::output;
use crate::domain::{OddsFormat, Opportunity, Percent};

#[derive(Tabled)]
pub(crate) struct OpportunityRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Sport")]
    sport: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Profit")]
    profit: String,
    #[tabled(rename = "Legs")]
    legs: String,
}

impl OpportunityRow {
    pub(crate) fn new(opp: &Opportunity, format: OddsFormat, threshold: Percent) -> Self {
        let profit = format!("{:.2}%", opp.profit_percentage());
        let profit = if opp.is_expired() {
            output::muted(profit)
        } else if opp.is_hot(threshold) {
            output::flame(profit)
        } else {
            output::positive(profit)
        };

        Self {
            id: opp.id().to_string(),
            sport: opp.sport().to_string(),
            event: opp.event_name().to_string(),
            starts: timestamp(opp.commence_time()),
            profit,
            legs: legs(opp, format),
        }
    }
}

/// `Home @ 2.10 (williamhill)` per outcome, one per line.
pub(crate) fn legs(opp: &Opportunity, format: OddsFormat) -> String {
    opp.outcomes()
        .iter()
        .map(|o| format!("{} @ {} ({})", o.label, format.render(o.price), o.bookmaker))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn opportunity_table(
    opportunities: &[Opportunity],
    format: OddsFormat,
    threshold: Percent,
) -> String {
    let rows: Vec<OpportunityRow> = opportunities
        .iter()
        .map(|opp| OpportunityRow::new(opp, format, threshold))
        .collect();
    Table::new(rows).to_string()
}

pub(crate) fn odds_format(fractional: bool) -> OddsFormat {
    if fractional {
        OddsFormat::Fractional
    } else {
        OddsFormat::Decimal
    }
}

pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Coarse age such as `45s`, `12m`, `3h 5m` or `2d 4h`.
pub(crate) fn age(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h {}m", s / 3_600, (s % 3_600) / 60),
        s => format!("{}d {}h", s / 86_400, (s % 86_400) / 3_600),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Outcome;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn opportunity() -> Opportunity {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        Opportunity::builder()
            .id("evt-1")
            .sport(crate::domain::Sport::Tennis)
            .event_name("A vs B")
            .commence_time(now + Duration::hours(3))
            .outcome(Outcome::new("williamhill", dec!(2.10), "A"))
            .outcome(Outcome::new("coral", dec!(2.05), "B"))
            .discovered_at(now)
            .build()
            .unwrap()
    }

    #[test]
    fn legs_render_in_requested_format() {
        let opp = opportunity();
        assert_eq!(
            legs(&opp, OddsFormat::Decimal),
            "A @ 2.10 (williamhill)\nB @ 2.05 (coral)"
        );
        assert_eq!(
            legs(&opp, OddsFormat::Fractional),
            "A @ 11/10 (williamhill)\nB @ 21/20 (coral)"
        );
    }

    #[test]
    fn table_names_every_opportunity() {
        let table = opportunity_table(&[opportunity()], OddsFormat::Decimal, dec!(3.5));
        assert!(table.contains("evt-1"));
        assert!(table.contains("A vs B"));
        assert!(table.contains("Tennis"));
    }

    #[test]
    fn ages_are_coarse() {
        assert_eq!(age(Duration::seconds(42)), "42s");
        assert_eq!(age(Duration::minutes(12)), "12m");
        assert_eq!(age(Duration::minutes(185)), "3h 5m");
        assert_eq!(age(Duration::hours(52)), "2d 4h");
        assert_eq!(age(Duration::seconds(-5)), "0s");
    }
}
