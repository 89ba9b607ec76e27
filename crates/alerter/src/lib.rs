//! # Fleet Fuel Economy Alerting
//!
//! Owns the lifecycle of `FuelEconomyAlert` records: the `FuelAlertGenerator`
//! turns evaluator output into an `AlertDelta`, and an `AlertStore` applies it.

pub mod error;
pub mod generator;
pub mod store;

pub use error::AlerterError;
pub use generator::{AlertDelta, FuelAlertGenerator};
pub use store::{AlertStore, InMemoryAlertStore};
