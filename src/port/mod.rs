//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Adapters implement these to plug in the odds provider, persistence,
//! time and authorization.
//!
//! # Available Ports
//!
//! - [`OddsSource`] - Bookmaker quotes per feed
//! - [`KeyValueStore`] - Persistence for the ledger and settings
//! - [`Clock`] - Current time
//! - [`Authorizer`] - Gate for maintenance actions

mod authorizer;
mod clock;
mod source;
mod store;

pub use authorizer::{ActionAllowList, AdminAction, Authorizer};
pub use clock::{Clock, SystemClock};
pub use source::{OddsSource, SourceBatch, SportFeed};
pub use store::{BatchWrite, KeyValueStore, StoreLock};
