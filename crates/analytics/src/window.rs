use configuration::FuelEconomyThresholds;
use core_types::ConsumptionSample;
use serde::Serialize;

/// Baseline and current consumption reduced from one vehicle's sample history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsumptionWindows {
    /// Mean of the samples preceding the current window, when there are enough of them.
    pub baseline: Option<f64>,
    /// Mean of the most recent samples.
    pub current: Option<f64>,
    /// Samples skipped because their rate was not a positive finite number.
    pub invalid_samples: usize,
}

impl ConsumptionWindows {
    /// Reduces a vehicle's samples to baseline and current rates.
    ///
    /// Samples may arrive in any order; they are sorted by `recorded_at` first.
    /// The newest `current_window_samples` form the current window; everything
    /// older forms the baseline window, which is only reported once it holds at
    /// least `min_baseline_samples` readings.
    pub fn reduce(samples: &[&ConsumptionSample], thresholds: &FuelEconomyThresholds) -> Self {
        let mut valid: Vec<&ConsumptionSample> = samples
            .iter()
            .copied()
            .filter(|s| s.rate.is_finite() && s.rate > 0.0)
            .collect();
        let invalid_samples = samples.len() - valid.len();
        valid.sort_by_key(|s| s.recorded_at);

        let window = thresholds.current_window_samples.max(1);
        let split = valid.len().saturating_sub(window);
        let (older, recent) = valid.split_at(split);

        let baseline = if !older.is_empty() && older.len() >= thresholds.min_baseline_samples {
            mean(older)
        } else {
            None
        };

        Self {
            baseline,
            current: mean(recent),
            invalid_samples,
        }
    }
}

fn mean(samples: &[&ConsumptionSample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let total: f64 = samples.iter().map(|s| s.rate).sum();
    Some(total / samples.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn samples(rates: &[f64]) -> Vec<ConsumptionSample> {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        rates
            .iter()
            .enumerate()
            .map(|(i, rate)| ConsumptionSample {
                vehicle_id: "V-1".to_string(),
                recorded_at: start + Duration::days(i as i64),
                rate: *rate,
            })
            .collect()
    }

    fn thresholds(window: usize, min_baseline: usize) -> FuelEconomyThresholds {
        FuelEconomyThresholds {
            current_window_samples: window,
            min_baseline_samples: min_baseline,
            ..FuelEconomyThresholds::default()
        }
    }

    #[test]
    fn test_splits_history_into_baseline_and_current() {
        let history = samples(&[6.0, 6.0, 7.0, 7.0, 9.0, 9.0]);
        let refs: Vec<_> = history.iter().collect();

        let windows = ConsumptionWindows::reduce(&refs, &thresholds(2, 3));
        assert_eq!(windows.current, Some(9.0));
        assert_eq!(windows.baseline, Some(6.5));
        assert_eq!(windows.invalid_samples, 0);
    }

    #[test]
    fn test_order_of_samples_does_not_matter() {
        let history = samples(&[6.0, 6.0, 7.0, 7.0, 9.0, 9.0]);
        let mut refs: Vec<_> = history.iter().collect();
        refs.reverse();

        let windows = ConsumptionWindows::reduce(&refs, &thresholds(2, 3));
        assert_eq!(windows.current, Some(9.0));
        assert_eq!(windows.baseline, Some(6.5));
    }

    #[test]
    fn test_short_history_has_no_baseline() {
        let history = samples(&[6.0, 8.0, 8.0]);
        let refs: Vec<_> = history.iter().collect();

        let windows = ConsumptionWindows::reduce(&refs, &thresholds(2, 3));
        assert_eq!(windows.current, Some(8.0));
        assert_eq!(windows.baseline, None);
    }

    #[test]
    fn test_invalid_samples_are_skipped_and_counted() {
        let history = samples(&[f64::NAN, -2.0, 0.0, 8.0]);
        let refs: Vec<_> = history.iter().collect();

        let windows = ConsumptionWindows::reduce(&refs, &thresholds(5, 10));
        assert_eq!(windows.current, Some(8.0));
        assert_eq!(windows.invalid_samples, 3);
    }

    #[test]
    fn test_empty_history() {
        let windows = ConsumptionWindows::reduce(&[], &FuelEconomyThresholds::default());
        assert_eq!(windows, ConsumptionWindows::default());
    }
}
