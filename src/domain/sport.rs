//! Sport catalogue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sports covered by the scanner.
///
/// Serialized in snake_case (`horse_racing`); displayed with its
/// human-readable name (`Horse Racing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Football,
    Tennis,
    Basketball,
    HorseRacing,
    Cricket,
    Rugby,
    Golf,
    Boxing,
    Darts,
    Esports,
}

impl Sport {
    /// Every sport in catalogue order.
    pub const ALL: [Sport; 10] = [
        Sport::Football,
        Sport::Tennis,
        Sport::Basketball,
        Sport::HorseRacing,
        Sport::Cricket,
        Sport::Rugby,
        Sport::Golf,
        Sport::Boxing,
        Sport::Darts,
        Sport::Esports,
    ];

    /// Human-readable name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Sport::Football => "Football",
            Sport::Tennis => "Tennis",
            Sport::Basketball => "Basketball",
            Sport::HorseRacing => "Horse Racing",
            Sport::Cricket => "Cricket",
            Sport::Rugby => "Rugby",
            Sport::Golf => "Golf",
            Sport::Boxing => "Boxing",
            Sport::Darts => "Darts",
            Sport::Esports => "E-Sports",
        }
    }

    /// Config/CLI key (`horse_racing`).
    pub const fn key(self) -> &'static str {
        match self {
            Sport::Football => "football",
            Sport::Tennis => "tennis",
            Sport::Basketball => "basketball",
            Sport::HorseRacing => "horse_racing",
            Sport::Cricket => "cricket",
            Sport::Rugby => "rugby",
            Sport::Golf => "golf",
            Sport::Boxing => "boxing",
            Sport::Darts => "darts",
            Sport::Esports => "esports",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace([' ', '-'], "_");
        let normalized = if normalized == "e_sports" {
            "esports".to_string()
        } else {
            normalized
        };

        Sport::ALL
            .into_iter()
            .find(|sport| sport.key() == normalized)
            .ok_or_else(|| format!("unknown sport '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_display_names() {
        assert_eq!("football".parse::<Sport>(), Ok(Sport::Football));
        assert_eq!("Horse Racing".parse::<Sport>(), Ok(Sport::HorseRacing));
        assert_eq!("E-Sports".parse::<Sport>(), Ok(Sport::Esports));
        assert!("curling".parse::<Sport>().is_err());
    }

    #[test]
    fn every_key_round_trips_through_from_str() {
        for sport in Sport::ALL {
            assert_eq!(sport.key().parse::<Sport>(), Ok(sport));
            assert_eq!(sport.display_name().parse::<Sport>(), Ok(sport));
        }
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&Sport::HorseRacing).unwrap();
        assert_eq!(json, "\"horse_racing\"");
    }
}
