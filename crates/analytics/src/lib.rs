//! # Fleet Fuel Economy Analytics
//!
//! This crate turns consumption figures into a per-vehicle fuel economy verdict.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` and `configuration` (Layer 0).
//! - **Stateless Calculation:** The `FuelEconomyEvaluator` holds nothing but its
//!   thresholds. It takes a vehicle and two consumption rates as input and produces a
//!   `FuelEconomyStatus` as output, so evaluations can run in parallel.
//!
//! ## Public API
//!
//! - `FuelEconomyEvaluator`: variance, trend, attention flag and recommendations.
//! - `FuelEconomyStatus`: the derived per-vehicle verdict.
//! - `ConsumptionWindows`: reduces raw sample history to baseline and current rates.

// Declare the modules that constitute this crate.
pub mod evaluator;
pub mod status;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use evaluator::{FuelEconomyEvaluator, variance_pct};
pub use status::{FuelEconomyStatus, alert_severity, severity_band};
pub use window::ConsumptionWindows;
