//! # Fleet Core Types
//!
//! Layer 0 of the workspace: the records supplied by the fleet data source and
//! the alert record owned by the alert reconciliation. Every other crate speaks
//! in these types.

pub mod enums;
pub mod error;
pub mod format;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AlertSeverity, DamageSeverity, Trend, VehicleType};
pub use error::CoreError;
pub use format::{format_variance_pct, sanitize_consumption};
pub use structs::{
    ConsumptionSample, Driver, DriverFine, FuelEconomyAlert, Vehicle, VehicleDamage,
};
