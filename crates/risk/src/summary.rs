use chrono::NaiveDate;
use configuration::RiskBands;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A driver's incident history folded into totals and a risk score.
///
/// Derived data only: recomputed whenever the driver's fines or damages change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverIncidentSummary {
    pub driver_id: String,
    pub driver_name: String,

    // I. Fines
    pub total_fines: usize,
    pub total_fine_amount: Decimal,
    pub unpaid_amount: Decimal,

    // II. Damages
    pub total_damages: usize,
    pub total_damages_cost: Decimal,

    // III. Risk
    pub risk_score: u32,
    pub last_incident_date: Option<NaiveDate>, // None when the driver has no incidents
    pub needs_training: bool,
    /// Set when a money total hit `Decimal::MAX` and was capped there.
    #[serde(default)]
    pub totals_saturated: bool,
}

/// Display grouping for risk scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Normal,
    Watch,
    Elevated,
    Severe,
}

impl RiskBand {
    pub fn from_score(score: u32, bands: &RiskBands) -> Self {
        if score >= bands.severe {
            RiskBand::Severe
        } else if score >= bands.elevated {
            RiskBand::Elevated
        } else if score >= bands.watch {
            RiskBand::Watch
        } else {
            RiskBand::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Normal => "normal",
            RiskBand::Watch => "watch",
            RiskBand::Elevated => "elevated",
            RiskBand::Severe => "severe",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        let bands = RiskBands::default();
        assert_eq!(RiskBand::from_score(0, &bands), RiskBand::Normal);
        assert_eq!(RiskBand::from_score(9, &bands), RiskBand::Normal);
        assert_eq!(RiskBand::from_score(10, &bands), RiskBand::Watch);
        assert_eq!(RiskBand::from_score(25, &bands), RiskBand::Elevated);
        assert_eq!(RiskBand::from_score(49, &bands), RiskBand::Elevated);
        assert_eq!(RiskBand::from_score(50, &bands), RiskBand::Severe);
    }
}
