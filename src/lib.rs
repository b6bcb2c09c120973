//! Surebet - cross-bookmaker sports arbitrage scanning.
//!
//! Periodically pulls bookmaker odds for a catalogue of sports, detects
//! events where backing every outcome at the best available prices
//! guarantees a profit, and keeps a persistent ledger of those sure bets.
//!
//! # Modules
//!
//! - [`domain`] - Odds, opportunities, detection, stake allocation and the
//!   active/history ledger. Pure and synchronous.
//! - [`port`] - Traits the application depends on: odds source, key-value
//!   store, clock and admin authorizer.
//! - [`adapter`] - The Odds API client and the JSON file / in-memory stores.
//! - [`app`] - Configuration, scan cycles, the scheduler and the ledger
//!   service.
//! - [`cli`] - The `surebet` command tree.
//! - [`error`] - Error types for the crate.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use rust_decimal_macros::dec;
//! use surebet::domain::{ArbitrageDetector, Quote, Sport, SportingEvent};
//!
//! let start = Utc.with_ymd_and_hms(2026, 5, 2, 18, 0, 0).unwrap();
//! let event = SportingEvent::try_new("evt-1", Sport::Tennis, "A vs B", start)
//!     .unwrap()
//!     .with_book("williamhill", vec![Quote::new("A", dec!(2.10)), Quote::new("B", dec!(1.80))])
//!     .with_book("coral", vec![Quote::new("A", dec!(1.75)), Quote::new("B", dec!(2.05))]);
//!
//! let found = ArbitrageDetector::default().detect(&event, Utc::now());
//! assert!(found.is_some());
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
