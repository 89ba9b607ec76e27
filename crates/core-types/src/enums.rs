use serde::{Deserialize, Serialize};
use std::fmt;

/// The drivetrain of a vehicle. Decides the unit its consumption is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    /// Internal combustion engine, consumption in litres per 100 km.
    #[serde(rename = "ICE", alias = "Ice")]
    Ice,
    /// Battery electric, consumption in kWh per 100 km.
    Electric,
}

impl VehicleType {
    /// Returns the consumption unit used for display.
    pub fn consumption_unit(&self) -> &'static str {
        match self {
            VehicleType::Ice => "L/100km",
            VehicleType::Electric => "kWh/100km",
        }
    }
}

/// Severity tier of a fuel economy deviation.
///
/// Ordered from least to most severe so that bands can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Direction of a vehicle's consumption variance compared to its previous evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Degrading,
    Stable,
    Unknown,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Improving => "improving",
            Trend::Degrading => "degrading",
            Trend::Stable => "stable",
            Trend::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Severity recorded on a vehicle damage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageSeverity {
    Minor,
    Moderate,
    Major,
    Critical,
}
