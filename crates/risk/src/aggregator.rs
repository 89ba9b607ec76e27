use crate::IncidentScorer;
use crate::summary::DriverIncidentSummary;
use crate::weighted_scorer::WeightedIncidentScorer;
use chrono::NaiveDate;
use core_types::{Driver, DriverFine, VehicleDamage};
use rust_decimal::Decimal;

/// Folds one driver's fines and damages into a `DriverIncidentSummary`.
///
/// Performs no I/O and keeps no state between calls; identical inputs give an
/// identical summary.
#[derive(Debug, Clone, Default)]
pub struct IncidentAggregator<S = WeightedIncidentScorer> {
    scorer: S,
}

impl<S: IncidentScorer> IncidentAggregator<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// Summarizes the given records for `driver`.
    ///
    /// The caller is responsible for passing only this driver's records.
    /// `as_of` anchors fine recency so the result does not depend on the clock.
    pub fn summarize(
        &self,
        driver: &Driver,
        fines: &[&DriverFine],
        damages: &[&VehicleDamage],
        as_of: NaiveDate,
    ) -> DriverIncidentSummary {
        let mut saturated = false;
        let mut add = |total: Decimal, amount: Decimal| {
            total.checked_add(amount).unwrap_or_else(|| {
                saturated = true;
                Decimal::MAX
            })
        };

        let mut total_fine_amount = Decimal::ZERO;
        let mut unpaid_amount = Decimal::ZERO;
        let mut risk_score: u32 = 0;

        for fine in fines {
            let amount = fine.amount.max(Decimal::ZERO);
            total_fine_amount = add(total_fine_amount, amount);
            if !fine.is_paid {
                unpaid_amount = add(unpaid_amount, amount);
            }
            risk_score = risk_score.saturating_add(self.scorer.score_fine(fine, as_of));
        }

        let mut total_damages_cost = Decimal::ZERO;
        for damage in damages {
            total_damages_cost = add(total_damages_cost, damage.effective_cost());
            risk_score = risk_score.saturating_add(self.scorer.score_damage(damage, as_of));
        }

        if saturated {
            tracing::warn!(driver_id = %driver.id, "Money totals overflowed; capped at Decimal::MAX.");
        }

        let last_incident_date = fines
            .iter()
            .map(|f| f.date)
            .chain(damages.iter().map(|d| d.date))
            .max();

        let needs_training = risk_score >= self.scorer.training_threshold();
        tracing::debug!(driver_id = %driver.id, risk_score, needs_training, "Driver summarized.");

        DriverIncidentSummary {
            driver_id: driver.id.clone(),
            driver_name: driver.name.clone(),
            total_fines: fines.len(),
            total_fine_amount,
            unpaid_amount,
            total_damages: damages.len(),
            total_damages_cost,
            risk_score,
            last_incident_date,
            needs_training,
            totals_saturated: saturated,
        }
    }
}
