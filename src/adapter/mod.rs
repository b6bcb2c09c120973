//! Implementations of ports (hexagonal adapters).

pub mod odds_api;
pub mod store;
