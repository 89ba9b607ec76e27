use crate::enums::{AlertSeverity, DamageSeverity, VehicleType};
use crate::error::CoreError;
use crate::format::sanitize_consumption;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fleet vehicle together with its reference consumption figures.
///
/// All figures are rates per 100 distance units. The unit itself depends on
/// `vehicle_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    #[serde(default)]
    pub registration: Option<String>,
    pub vehicle_type: VehicleType,
    /// Consumption rated by the manufacturer.
    #[serde(default)]
    pub manufacturer_consumption: f64,
    /// Long-run consumption observed for this vehicle in the fleet.
    #[serde(default)]
    pub baseline_consumption: f64,
    /// Rolling average of the most recent readings.
    #[serde(default)]
    pub current_consumption: f64,
}

impl Vehicle {
    /// Lists every consumption figure on this record that is not a finite,
    /// non-negative number, plus a missing manufacturer rating.
    ///
    /// The figures are still usable through `sanitize_consumption`; this only
    /// reports what was clamped.
    pub fn consumption_issues(&self) -> Vec<CoreError> {
        let mut issues = Vec::new();
        let figures = [
            ("manufacturer_consumption", self.manufacturer_consumption),
            ("baseline_consumption", self.baseline_consumption),
            ("current_consumption", self.current_consumption),
        ];
        for (field, value) in figures {
            if !value.is_finite() || value < 0.0 {
                issues.push(CoreError::InvalidInput(
                    format!("vehicle {} {}", self.id, field),
                    format!("{} clamped to 0", value),
                ));
            }
        }
        if sanitize_consumption(self.manufacturer_consumption) == 0.0
            && self.manufacturer_consumption.is_finite()
            && self.manufacturer_consumption >= 0.0
        {
            issues.push(CoreError::InvalidInput(
                format!("vehicle {} manufacturer_consumption", self.id),
                "missing manufacturer rating".to_string(),
            ));
        }
        issues
    }
}

/// A single consumption reading supplied by the consumption sample store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionSample {
    pub vehicle_id: String,
    pub recorded_at: DateTime<Utc>,
    /// Consumption rate per 100 distance units.
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub license_number: Option<String>,
}

/// A traffic or parking fine issued while a driver was operating a fleet vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverFine {
    pub id: String,
    pub driver_id: String,
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub fine_type: String,
    pub amount: Decimal,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
}

/// A damage report filed against a vehicle and the driver responsible at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDamage {
    pub id: String,
    pub driver_id: String,
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub damage_type: String,
    pub severity: DamageSeverity,
    pub estimated_cost: Decimal,
    /// Final repair cost. Overrides the estimate once present and positive.
    #[serde(default)]
    pub actual_cost: Option<Decimal>,
    #[serde(default)]
    pub is_repaired: bool,
    #[serde(default)]
    pub at_fault: bool,
    #[serde(default)]
    pub insurance_claimed: bool,
    #[serde(default)]
    pub insurance_claim_number: Option<String>,
}

impl VehicleDamage {
    /// The cost that counts towards totals: the actual cost once known, else the estimate.
    pub fn effective_cost(&self) -> Decimal {
        let cost = match self.actual_cost {
            Some(actual) if actual > Decimal::ZERO => actual,
            _ => self.estimated_cost,
        };
        cost.max(Decimal::ZERO)
    }
}

/// An alert raised when a vehicle's consumption drifts too far above its baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelEconomyAlert {
    pub id: Uuid,
    pub vehicle_id: String,
    pub severity: AlertSeverity,
    pub current_consumption: f64,
    pub baseline_consumption: f64,
    pub variance_percentage: f64,
    pub notes: String,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl FuelEconomyAlert {
    pub fn is_open(&self) -> bool {
        !self.is_resolved
    }
}
