use crate::status::{FuelEconomyStatus, severity_band};
use configuration::FuelEconomyThresholds;
use core_types::{AlertSeverity, Trend, Vehicle, VehicleType, sanitize_consumption};

/// A stateless calculator for a vehicle's fuel economy status.
///
/// Holds only its thresholds, so one instance can be shared across threads and
/// evaluate many vehicles concurrently.
#[derive(Debug, Clone, Default)]
pub struct FuelEconomyEvaluator {
    thresholds: FuelEconomyThresholds,
}

impl FuelEconomyEvaluator {
    pub fn new(thresholds: FuelEconomyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &FuelEconomyThresholds {
        &self.thresholds
    }

    /// The main entry point for evaluating one vehicle.
    ///
    /// # Arguments
    ///
    /// * `vehicle` - The vehicle record; only its type and manufacturer rating are read.
    /// * `baseline` - Long-run reference consumption, per 100 distance units.
    /// * `current` - Recent rolling average consumption, per 100 distance units.
    /// * `previous_variance` - The `current_vs_baseline` of the previous evaluation, if any.
    ///
    /// Malformed figures are clamped to zero; this never fails.
    pub fn evaluate(
        &self,
        vehicle: &Vehicle,
        baseline: f64,
        current: f64,
        previous_variance: Option<f64>,
    ) -> FuelEconomyStatus {
        let manufacturer = sanitize_consumption(vehicle.manufacturer_consumption);
        let baseline = sanitize_consumption(baseline);
        let current = sanitize_consumption(current);

        let mut status = FuelEconomyStatus {
            vehicle_id: vehicle.id.clone(),
            vehicle_type: vehicle.vehicle_type,
            manufacturer_consumption: manufacturer,
            baseline_consumption: baseline,
            current_consumption: current,
            manufacturer_vs_baseline: variance_pct(baseline, manufacturer),
            current_vs_baseline: 0.0,
            trend: Trend::Unknown,
            band: None,
            needs_attention: false,
            recommendations: Vec::new(),
            degraded: false,
        };

        // Without both figures, or when their ratio overflows, there is no
        // meaningful variance to report.
        let variance = checked_variance_pct(current, baseline).filter(|_| current > 0.0);
        let Some(variance) = variance else {
            tracing::debug!(vehicle_id = %vehicle.id, baseline, current, "Insufficient consumption data; status degraded.");
            status.manufacturer_vs_baseline = 0.0;
            status.degraded = true;
            return status;
        };

        status.current_vs_baseline = variance;
        status.trend = self.classify_trend(variance, previous_variance);
        status.band = severity_band(variance, &self.thresholds);
        status.needs_attention = variance > self.thresholds.attention_pct;
        status.recommendations = recommendations(vehicle.vehicle_type, status.band);

        tracing::debug!(
            vehicle_id = %vehicle.id,
            variance,
            trend = %status.trend,
            needs_attention = status.needs_attention,
            "Vehicle evaluated."
        );
        status
    }

    /// Compares this evaluation's variance with the previous one.
    fn classify_trend(&self, variance: f64, previous: Option<f64>) -> Trend {
        let Some(previous) = previous.filter(|p| p.is_finite()) else {
            return Trend::Unknown;
        };
        let change = variance - previous;
        let band = self.thresholds.trend_hysteresis_pct;
        if change <= -band {
            Trend::Improving
        } else if change >= band {
            Trend::Degrading
        } else {
            Trend::Stable
        }
    }
}

/// Signed percentage difference of `value` relative to `reference`.
/// Zero when there is no reference to compare against or the result would not be finite.
pub fn variance_pct(value: f64, reference: f64) -> f64 {
    checked_variance_pct(value, reference).unwrap_or(0.0)
}

fn checked_variance_pct(value: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 {
        return None;
    }
    Some((value - reference) / reference * 100.0).filter(|v| v.is_finite())
}

/// Builds the advisory list for a band. Each band includes the advice of the
/// bands below it.
fn recommendations(vehicle_type: VehicleType, band: Option<AlertSeverity>) -> Vec<String> {
    let Some(band) = band else {
        return Vec::new();
    };

    let mut advice = vec!["Check tyre pressure and wheel alignment".to_string()];
    if band >= AlertSeverity::Medium {
        advice.push("Review driving behaviour, idling time and route loading".to_string());
    }
    if band >= AlertSeverity::High {
        advice.push(match vehicle_type {
            VehicleType::Ice => "Inspect engine and drivetrain: air filter, injectors, spark plugs".to_string(),
            VehicleType::Electric => "Inspect battery health, thermal management and drivetrain".to_string(),
        });
    }
    if band >= AlertSeverity::Critical {
        advice.push("Schedule a full diagnostic before further long-distance use".to_string());
    }
    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vehicle(vehicle_type: VehicleType, manufacturer: f64) -> Vehicle {
        Vehicle {
            id: "V-100".to_string(),
            registration: Some("CA 123-456".to_string()),
            vehicle_type,
            manufacturer_consumption: manufacturer,
            baseline_consumption: 0.0,
            current_consumption: 0.0,
        }
    }

    fn evaluator() -> FuelEconomyEvaluator {
        FuelEconomyEvaluator::new(FuelEconomyThresholds::default())
    }

    #[test]
    fn test_reference_scenario() {
        let status = evaluator().evaluate(&vehicle(VehicleType::Ice, 6.0), 6.5, 8.0, None);

        assert!((status.manufacturer_vs_baseline - 8.3333).abs() < 0.001);
        assert!((status.current_vs_baseline - 23.0769).abs() < 0.001);
        assert_eq!(status.band, Some(AlertSeverity::Critical));
        assert!(status.needs_attention);
        assert_eq!(status.trend, Trend::Unknown);
        assert!(!status.degraded);
        assert_eq!(status.recommendations.len(), 4);
    }

    #[test]
    fn test_attention_boundary_is_exclusive() {
        let e = evaluator();
        let v = vehicle(VehicleType::Ice, 10.0);

        let at_ten = e.evaluate(&v, 10.0, 11.0, None);
        assert_eq!(at_ten.current_vs_baseline, 10.0);
        assert!(!at_ten.needs_attention);

        let above = e.evaluate(&v, 100.0, 110.01, None);
        assert!(above.current_vs_baseline > 10.0);
        assert!(above.needs_attention);
    }

    #[test]
    fn test_zero_manufacturer_rating_is_not_an_error() {
        let status = evaluator().evaluate(&vehicle(VehicleType::Ice, 0.0), 7.0, 7.0, None);
        assert_eq!(status.manufacturer_vs_baseline, 0.0);
        assert_eq!(status.current_vs_baseline, 0.0);
        assert!(!status.degraded);
    }

    #[test]
    fn test_invalid_inputs_degrade_instead_of_failing() {
        let e = evaluator();
        let v = vehicle(VehicleType::Electric, f64::NAN);

        let status = e.evaluate(&v, -4.0, f64::INFINITY, Some(12.0));
        assert!(status.degraded);
        assert_eq!(status.trend, Trend::Unknown);
        assert!(!status.needs_attention);
        assert_eq!(status.manufacturer_consumption, 0.0);
        assert_eq!(status.baseline_consumption, 0.0);
        assert_eq!(status.current_consumption, 0.0);
        assert!(status.recommendations.is_empty());
    }

    #[test]
    fn test_missing_baseline_zeroes_both_variances() {
        let status = evaluator().evaluate(&vehicle(VehicleType::Ice, 6.0), 0.0, 8.0, Some(5.0));
        assert!(status.degraded);
        assert_eq!(status.manufacturer_vs_baseline, 0.0);
        assert_eq!(status.current_vs_baseline, 0.0);
    }

    #[test]
    fn test_overflowing_variance_degrades() {
        let e = evaluator();

        let status = e.evaluate(&vehicle(VehicleType::Ice, 6.0), 1e-310, 1e10, None);
        assert!(status.degraded);
        assert!(!status.needs_attention);
        assert_eq!(status.current_vs_baseline, 0.0);
        assert_eq!(status.manufacturer_vs_baseline, 0.0);
        assert_eq!(status.band, None);

        let tiny_rating = e.evaluate(&vehicle(VehicleType::Ice, 1e-310), 1e10, 1e10, None);
        assert!(tiny_rating.manufacturer_vs_baseline.is_finite());
        assert_eq!(tiny_rating.manufacturer_vs_baseline, 0.0);
        assert!(!tiny_rating.degraded);
    }

    #[test]
    fn test_variance_pct_is_total() {
        assert_eq!(variance_pct(5.0, 0.0), 0.0);
        assert_eq!(variance_pct(1e10, 1e-310), 0.0);
        assert_eq!(variance_pct(11.0, 10.0), 10.0);
    }

    #[test]
    fn test_trend_uses_hysteresis() {
        let e = evaluator();
        let v = vehicle(VehicleType::Ice, 8.0);

        // Current variance is +12.5% in all cases.
        assert_eq!(e.evaluate(&v, 8.0, 9.0, Some(15.0)).trend, Trend::Improving);
        assert_eq!(e.evaluate(&v, 8.0, 9.0, Some(14.5)).trend, Trend::Improving);
        assert_eq!(e.evaluate(&v, 8.0, 9.0, Some(13.5)).trend, Trend::Stable);
        assert_eq!(e.evaluate(&v, 8.0, 9.0, Some(11.0)).trend, Trend::Stable);
        assert_eq!(e.evaluate(&v, 8.0, 9.0, Some(10.5)).trend, Trend::Degrading);
        assert_eq!(e.evaluate(&v, 8.0, 9.0, Some(f64::NAN)).trend, Trend::Unknown);
    }

    #[test]
    fn test_recommendations_are_additive() {
        let e = evaluator();
        let v = vehicle(VehicleType::Electric, 18.0);

        let low = e.evaluate(&v, 20.0, 21.0, None);
        assert_eq!(low.band, Some(AlertSeverity::Low));
        assert_eq!(low.recommendations, vec!["Check tyre pressure and wheel alignment".to_string()]);

        let high = e.evaluate(&v, 20.0, 23.4, None);
        assert_eq!(high.band, Some(AlertSeverity::High));
        assert_eq!(high.recommendations.len(), 3);
        assert_eq!(&high.recommendations[..1], &low.recommendations[..]);
        assert!(high.recommendations[2].contains("battery"));

        let better = e.evaluate(&v, 20.0, 19.0, None);
        assert_eq!(better.band, None);
        assert!(better.recommendations.is_empty());
        assert!(!better.needs_attention);
    }
}
