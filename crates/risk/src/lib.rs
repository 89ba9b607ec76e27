use chrono::NaiveDate;
use core_types::{DriverFine, VehicleDamage};

pub mod aggregator;
pub mod error;
pub mod summary;
pub mod weighted_scorer;

pub use aggregator::IncidentAggregator;
pub use error::RiskError;
pub use summary::{DriverIncidentSummary, RiskBand};
pub use weighted_scorer::WeightedIncidentScorer;

/// Assigns risk points to individual incidents.
///
/// Implementations must be deterministic and must never return a value that
/// would make a driver's score drop when an incident is added. Points are
/// unsigned, so adding an incident can only add to the total.
pub trait IncidentScorer: Send + Sync {
    /// Points for a single fine, evaluated as of `as_of`.
    fn score_fine(&self, fine: &DriverFine, as_of: NaiveDate) -> u32;

    /// Points for a single damage report, evaluated as of `as_of`.
    fn score_damage(&self, damage: &VehicleDamage, as_of: NaiveDate) -> u32;

    /// Scores at or above this value flag the driver for training.
    fn training_threshold(&self) -> u32;
}
