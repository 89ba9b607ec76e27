use chrono::{DateTime, Utc};
use core_types::{ConsumptionSample, Driver, DriverFine, FuelEconomyAlert, Vehicle, VehicleDamage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the engine needs for one run, already fetched by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetInput {
    /// Reference time of the run. Stamps alerts and anchors fine recency.
    #[serde(default = "Utc::now")]
    pub as_of: DateTime<Utc>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub consumption_history: Vec<ConsumptionSample>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub fines: Vec<DriverFine>,
    #[serde(default)]
    pub damages: Vec<VehicleDamage>,
    /// Alerts still open from previous runs.
    #[serde(default)]
    pub open_alerts: Vec<FuelEconomyAlert>,
    /// `current_vs_baseline` of each vehicle's previous evaluation, keyed by vehicle id.
    #[serde(default)]
    pub previous_variance: HashMap<String, f64>,
}

impl FleetInput {
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            vehicles: Vec::new(),
            consumption_history: Vec::new(),
            drivers: Vec::new(),
            fines: Vec::new(),
            damages: Vec::new(),
            open_alerts: Vec::new(),
            previous_variance: HashMap::new(),
        }
    }
}
