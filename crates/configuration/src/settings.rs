use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// The root configuration structure for the analytics engine.
///
/// Every section has defaults, so an absent `config.toml` yields the standard
/// business thresholds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fuel_economy: FuelEconomyThresholds,
    pub risk_scoring: RiskScoring,
    pub risk_bands: RiskBands,
}

impl Config {
    /// Checks that the thresholds and weights are internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fuel_economy.validate()?;
        self.risk_scoring.validate()?;
        self.risk_bands.validate()?;
        Ok(())
    }
}

/// Variance thresholds for fuel economy evaluation and alerting.
///
/// All percentages compare current consumption against the vehicle's baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelEconomyThresholds {
    /// A vehicle needs attention strictly above this variance.
    pub attention_pct: f64,
    /// Strictly above this variance a medium alert is raised.
    pub medium_pct: f64,
    /// Strictly above this variance the alert is high.
    pub high_pct: f64,
    /// Strictly above this variance the alert is critical.
    pub critical_pct: f64,
    /// Minimum change in variance, in percentage points, before the trend moves off `stable`.
    pub trend_hysteresis_pct: f64,
    /// Number of most recent samples averaged into the current consumption.
    pub current_window_samples: usize,
    /// Number of older samples required before a baseline is derived from history.
    pub min_baseline_samples: usize,
}

impl Default for FuelEconomyThresholds {
    fn default() -> Self {
        Self {
            attention_pct: 10.0,
            medium_pct: 10.0,
            high_pct: 15.0,
            critical_pct: 20.0,
            trend_hysteresis_pct: 2.0,
            current_window_samples: 5,
            min_baseline_samples: 10,
        }
    }
}

impl FuelEconomyThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let percentages = [
            ("attention_pct", self.attention_pct),
            ("medium_pct", self.medium_pct),
            ("high_pct", self.high_pct),
            ("critical_pct", self.critical_pct),
            ("trend_hysteresis_pct", self.trend_hysteresis_pct),
        ];
        for (name, value) in percentages {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    "fuel_economy",
                    format!("{} must be a non-negative number, got {}", name, value),
                ));
            }
        }
        if !(self.medium_pct <= self.high_pct && self.high_pct <= self.critical_pct) {
            return Err(ConfigError::invalid(
                "fuel_economy",
                "bands must satisfy medium_pct <= high_pct <= critical_pct",
            ));
        }
        if self.current_window_samples == 0 {
            return Err(ConfigError::invalid(
                "fuel_economy",
                "current_window_samples must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Weights used to turn a driver's fines and damages into a risk score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskScoring {
    /// Points for a fine issued within `fine_recency_months`.
    pub recent_fine_weight: u32,
    /// Points for an older fine.
    pub stale_fine_weight: u32,
    pub fine_recency_months: u32,
    pub minor_damage_weight: u32,
    pub moderate_damage_weight: u32,
    pub major_damage_weight: u32,
    pub critical_damage_weight: u32,
    /// Extra points when the driver was at fault.
    pub at_fault_bonus: u32,
    /// Extra points while the damage is still unrepaired.
    pub unrepaired_bonus: u32,
    /// Scores at or above this value flag the driver for training.
    pub training_threshold: u32,
}

impl Default for RiskScoring {
    fn default() -> Self {
        Self {
            recent_fine_weight: 5,
            stale_fine_weight: 2,
            fine_recency_months: 12,
            minor_damage_weight: 5,
            moderate_damage_weight: 10,
            major_damage_weight: 20,
            critical_damage_weight: 35,
            at_fault_bonus: 5,
            unrepaired_bonus: 5,
            training_threshold: 25,
        }
    }
}

impl RiskScoring {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fine_recency_months == 0 {
            return Err(ConfigError::invalid("risk_scoring", "fine_recency_months must be at least 1"));
        }
        Ok(())
    }
}

/// Display bands for risk scores. Only the presentation layer uses these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskBands {
    pub watch: u32,
    pub elevated: u32,
    pub severe: u32,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            watch: 10,
            elevated: 25,
            severe: 50,
        }
    }
}

impl RiskBands {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.watch <= self.elevated && self.elevated <= self.severe) {
            return Err(ConfigError::invalid("risk_bands", "must satisfy watch <= elevated <= severe"));
        }
        Ok(())
    }
}
