//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - [`ScriptedSource`](source::ScriptedSource), an odds source
//!   whose per-feed answers are set by the test.
//! - [`clock`] - [`ManualClock`](clock::ManualClock) for fixed, advanceable time.
//! - [`store`] - [`FailingStore`](store::FailingStore), a memory store that
//!   fails reads or writes on demand.
//! - [`domain`] - Builders for events and opportunities.
//! - [`config`] - Canonical test configuration and app wiring.

pub mod clock;
pub mod config;
pub mod domain;
pub mod source;
pub mod store;
