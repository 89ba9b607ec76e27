use crate::IncidentScorer;
use crate::error::RiskError;
use chrono::{Months, NaiveDate};
use configuration::RiskScoring;
use core_types::{DamageSeverity, DriverFine, VehicleDamage};

/// A concrete implementation of the `IncidentScorer` trait.
///
/// Each fine scores a fixed weight, reduced once the fine is older than the
/// recency window. Each damage scores by severity, with bonuses for at-fault
/// and unrepaired damage. All weights come from configuration.
#[derive(Debug, Clone)]
pub struct WeightedIncidentScorer {
    params: RiskScoring,
}

impl WeightedIncidentScorer {
    /// Creates a new `WeightedIncidentScorer` with the given configuration parameters.
    pub fn new(params: RiskScoring) -> Result<Self, RiskError> {
        // Older fines decay, they never count more than recent ones.
        if params.stale_fine_weight > params.recent_fine_weight {
            return Err(RiskError::InvalidParameters(
                "stale_fine_weight must not exceed recent_fine_weight".to_string(),
            ));
        }
        let severity_weights = [
            params.minor_damage_weight,
            params.moderate_damage_weight,
            params.major_damage_weight,
            params.critical_damage_weight,
        ];
        if severity_weights.windows(2).any(|w| w[0] > w[1]) {
            return Err(RiskError::InvalidParameters(
                "damage weights must be ordered minor <= moderate <= major <= critical".to_string(),
            ));
        }
        Ok(Self { params })
    }

    fn severity_weight(&self, severity: DamageSeverity) -> u32 {
        match severity {
            DamageSeverity::Minor => self.params.minor_damage_weight,
            DamageSeverity::Moderate => self.params.moderate_damage_weight,
            DamageSeverity::Major => self.params.major_damage_weight,
            DamageSeverity::Critical => self.params.critical_damage_weight,
        }
    }
}

impl Default for WeightedIncidentScorer {
    fn default() -> Self {
        Self {
            params: RiskScoring::default(),
        }
    }
}

impl IncidentScorer for WeightedIncidentScorer {
    fn score_fine(&self, fine: &DriverFine, as_of: NaiveDate) -> u32 {
        // Fines on or after the cutoff are recent, including any dated after `as_of`.
        let cutoff = as_of.checked_sub_months(Months::new(self.params.fine_recency_months));
        match cutoff {
            Some(cutoff) if fine.date < cutoff => self.params.stale_fine_weight,
            _ => self.params.recent_fine_weight,
        }
    }

    fn score_damage(&self, damage: &VehicleDamage, _as_of: NaiveDate) -> u32 {
        let mut score = self.severity_weight(damage.severity);
        if damage.at_fault {
            score = score.saturating_add(self.params.at_fault_bonus);
        }
        if !damage.is_repaired {
            score = score.saturating_add(self.params.unrepaired_bonus);
        }
        score
    }

    fn training_threshold(&self) -> u32 {
        self.params.training_threshold
    }
}
