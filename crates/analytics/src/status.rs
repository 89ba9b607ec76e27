use configuration::FuelEconomyThresholds;
use core_types::{AlertSeverity, Trend, VehicleType};
use serde::{Deserialize, Serialize};

/// The fuel economy verdict for one vehicle at evaluation time.
///
/// A pure function of the vehicle record and the consumption windows it was
/// evaluated with. It has no lifecycle of its own and is recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelEconomyStatus {
    pub vehicle_id: String,
    pub vehicle_type: VehicleType,

    // I. Sanitized inputs
    pub manufacturer_consumption: f64,
    pub baseline_consumption: f64,
    pub current_consumption: f64,

    // II. Variances, signed percentages (positive = worse)
    pub manufacturer_vs_baseline: f64,
    pub current_vs_baseline: f64,

    // III. Verdict
    pub trend: Trend,
    /// Highest recommendation band reached, `None` when at or below baseline.
    pub band: Option<AlertSeverity>,
    pub needs_attention: bool,
    pub recommendations: Vec<String>,
    /// Set when baseline or current consumption was unavailable.
    pub degraded: bool,
}

/// Maps a current-vs-baseline variance to its band.
///
/// Anything above zero but not above the medium threshold is `Low`; zero and
/// negative variances have no band.
pub fn severity_band(variance_pct: f64, thresholds: &FuelEconomyThresholds) -> Option<AlertSeverity> {
    if !variance_pct.is_finite() || variance_pct <= 0.0 {
        None
    } else if variance_pct > thresholds.critical_pct {
        Some(AlertSeverity::Critical)
    } else if variance_pct > thresholds.high_pct {
        Some(AlertSeverity::High)
    } else if variance_pct > thresholds.medium_pct {
        Some(AlertSeverity::Medium)
    } else {
        Some(AlertSeverity::Low)
    }
}

/// Like [`severity_band`], but only for bands that warrant an alert (medium and up).
pub fn alert_severity(variance_pct: f64, thresholds: &FuelEconomyThresholds) -> Option<AlertSeverity> {
    severity_band(variance_pct, thresholds).filter(|band| *band >= AlertSeverity::Medium)
}
