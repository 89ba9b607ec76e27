use crate::error::AlerterError;
use crate::generator::AlertDelta;
use core_types::FuelEconomyAlert;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Holds fuel economy alerts between reconciliation passes.
///
/// Implementations must write each alert record whole so that a vehicle's alert
/// never ends up half-updated. No transaction across vehicles is required.
pub trait AlertStore {
    /// All alerts that are currently unresolved.
    fn open_alerts(&self) -> Vec<FuelEconomyAlert>;

    /// Applies a reconciliation delta.
    fn apply(&mut self, delta: &AlertDelta) -> Result<(), AlerterError>;
}

/// An `AlertStore` kept in memory, optionally persisted to a JSON file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAlertStore {
    alerts: BTreeMap<Uuid, FuelEconomyAlert>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_alerts(alerts: impl IntoIterator<Item = FuelEconomyAlert>) -> Self {
        Self {
            alerts: alerts.into_iter().map(|a| (a.id, a)).collect(),
        }
    }

    /// Loads the store from a JSON array of alerts. A missing file yields an empty store.
    pub fn load_json(path: &Path) -> Result<Self, AlerterError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No alert store file; starting empty.");
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path)?;
        let alerts: Vec<FuelEconomyAlert> = serde_json::from_str(&raw)?;
        Ok(Self::from_alerts(alerts))
    }

    pub fn save_json(&self, path: &Path) -> Result<(), AlerterError> {
        let alerts: Vec<&FuelEconomyAlert> = self.alerts.values().collect();
        fs::write(path, serde_json::to_string_pretty(&alerts)?)?;
        Ok(())
    }

    /// Unresolved alerts, ordered by vehicle id.
    pub fn active(&self) -> Vec<&FuelEconomyAlert> {
        let mut active: Vec<_> = self.alerts.values().filter(|a| a.is_open()).collect();
        active.sort_by(|a, b| a.vehicle_id.cmp(&b.vehicle_id));
        active
    }

    /// Resolved alerts, most recently resolved first.
    pub fn resolved(&self) -> Vec<&FuelEconomyAlert> {
        let mut resolved: Vec<_> = self.alerts.values().filter(|a| a.is_resolved).collect();
        resolved.sort_by(|a, b| b.resolved_at.cmp(&a.resolved_at).then_with(|| a.vehicle_id.cmp(&b.vehicle_id)));
        resolved
    }

    pub fn get(&self, id: &Uuid) -> Option<&FuelEconomyAlert> {
        self.alerts.get(id)
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Rejects a delta that would leave two open alerts for one vehicle or that
    /// touches alerts this store has never seen.
    fn validate(&self, delta: &AlertDelta) -> Result<(), AlerterError> {
        for alert in delta.updated.iter().chain(&delta.resolved) {
            if !self.alerts.contains_key(&alert.id) {
                return Err(AlerterError::UnknownAlert(alert.id));
            }
        }

        let mut open: BTreeMap<&str, Uuid> = self
            .alerts
            .values()
            .filter(|a| a.is_open())
            .map(|a| (a.vehicle_id.as_str(), a.id))
            .collect();
        for alert in &delta.resolved {
            if open.get(alert.vehicle_id.as_str()) == Some(&alert.id) {
                open.remove(alert.vehicle_id.as_str());
            }
        }
        for alert in &delta.created {
            if open.insert(alert.vehicle_id.as_str(), alert.id).is_some() {
                return Err(AlerterError::DuplicateOpenAlert(alert.vehicle_id.clone()));
            }
        }
        Ok(())
    }
}

impl AlertStore for InMemoryAlertStore {
    fn open_alerts(&self) -> Vec<FuelEconomyAlert> {
        self.active().into_iter().cloned().collect()
    }

    fn apply(&mut self, delta: &AlertDelta) -> Result<(), AlerterError> {
        self.validate(delta)?;

        // Resolutions first, so a vehicle's replacement alert never coexists with the old one.
        for alert in delta.resolved.iter().chain(&delta.updated).chain(&delta.created) {
            self.alerts.insert(alert.id, alert.clone());
        }
        tracing::debug!(
            created = delta.created.len(),
            updated = delta.updated.len(),
            resolved = delta.resolved.len(),
            "Alert delta applied."
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::FuelAlertGenerator;
    use analytics::FuelEconomyStatus;
    use chrono::{Duration, TimeZone, Utc};
    use configuration::FuelEconomyThresholds;
    use core_types::{Trend, VehicleType};

    fn statuses(entries: &[(&str, f64)]) -> BTreeMap<String, FuelEconomyStatus> {
        entries
            .iter()
            .map(|(id, variance)| {
                let status = FuelEconomyStatus {
                    vehicle_id: id.to_string(),
                    vehicle_type: VehicleType::Electric,
                    manufacturer_consumption: 18.0,
                    baseline_consumption: 20.0,
                    current_consumption: 20.0 * (1.0 + variance / 100.0),
                    manufacturer_vs_baseline: 11.1,
                    current_vs_baseline: *variance,
                    trend: Trend::Stable,
                    band: None,
                    needs_attention: *variance > 10.0,
                    recommendations: Vec::new(),
                    degraded: false,
                };
                (id.to_string(), status)
            })
            .collect()
    }

    #[test]
    fn test_store_round_trip_keeps_one_open_alert_per_vehicle() {
        let generator = FuelAlertGenerator::new(FuelEconomyThresholds::default());
        let mut store = InMemoryAlertStore::new();
        let t0 = Utc.with_ymd_and_hms(2026, 10, 1, 6, 0, 0).unwrap();

        for (day, variance) in [(0, 12.0), (1, 17.0), (2, 25.0), (3, 25.0), (4, 3.0), (5, 14.0)] {
            let delta = generator.reconcile(&statuses(&[("V-9", variance)]), &store.open_alerts(), t0 + Duration::days(day));
            store.apply(&delta).unwrap();
            assert!(store.active().len() <= 1);
        }

        assert_eq!(store.len(), 2);
        assert_eq!(store.active().len(), 1);
        assert_eq!(store.resolved().len(), 1);
    }

    #[test]
    fn test_apply_rejects_second_open_alert() {
        let generator = FuelAlertGenerator::new(FuelEconomyThresholds::default());
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 6, 0, 0).unwrap();
        let mut store = InMemoryAlertStore::new();

        let delta = generator.reconcile(&statuses(&[("V-1", 30.0)]), &[], now);
        store.apply(&delta).unwrap();

        // Same delta again would open a second alert for V-1.
        let err = store.apply(&generator.reconcile(&statuses(&[("V-1", 30.0)]), &[], now)).unwrap_err();
        assert!(matches!(err, AlerterError::DuplicateOpenAlert(ref v) if v == "V-1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_apply_rejects_unknown_alert() {
        let generator = FuelAlertGenerator::new(FuelEconomyThresholds::default());
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 6, 0, 0).unwrap();
        let foreign = generator.reconcile(&statuses(&[("V-1", 30.0)]), &[], now).created;

        let delta = generator.reconcile(&statuses(&[("V-1", 0.5)]), &foreign, now);
        let mut store = InMemoryAlertStore::new();
        assert!(matches!(store.apply(&delta), Err(AlerterError::UnknownAlert(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        let generator = FuelAlertGenerator::new(FuelEconomyThresholds::default());
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 6, 0, 0).unwrap();

        let mut store = InMemoryAlertStore::load_json(&path).unwrap();
        assert!(store.is_empty());
        store.apply(&generator.reconcile(&statuses(&[("V-1", 16.0), ("V-2", 40.0)]), &[], now)).unwrap();
        store.save_json(&path).unwrap();

        let reloaded = InMemoryAlertStore::load_json(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        let ids = |s: &InMemoryAlertStore| s.active().iter().map(|a| (a.id, a.severity)).collect::<Vec<_>>();
        assert_eq!(ids(&reloaded), ids(&store));
        for alert in store.active() {
            assert_eq!(reloaded.get(&alert.id), Some(alert));
        }
    }

    #[test]
    fn test_reload_then_reconcile_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        let generator = FuelAlertGenerator::new(FuelEconomyThresholds::default());
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 6, 0, 0).unwrap();

        // Ratios whose decimal text is long enough to expose lossy float parsing.
        let mut entries = Vec::new();
        for step in 0..400 {
            let baseline = 4.0 + step as f64 * 0.037;
            let current = baseline * 1.13261580381471399 + step as f64 * 1e-7;
            let variance = (current - baseline) / baseline * 100.0;
            entries.push((format!("V-{:03}", step), baseline, current, variance));
        }
        let fleet: BTreeMap<String, FuelEconomyStatus> = entries
            .iter()
            .map(|(id, baseline, current, variance)| {
                let mut status = statuses(&[(id.as_str(), *variance)]).remove(id.as_str()).unwrap();
                status.baseline_consumption = *baseline;
                status.current_consumption = *current;
                (id.clone(), status)
            })
            .collect();

        let mut store = InMemoryAlertStore::new();
        store.apply(&generator.reconcile(&fleet, &[], now)).unwrap();
        assert_eq!(store.active().len(), entries.len());
        store.save_json(&path).unwrap();

        let reloaded = InMemoryAlertStore::load_json(&path).unwrap();
        let delta = generator.reconcile(&fleet, &reloaded.open_alerts(), now + Duration::days(1));
        assert!(delta.is_empty(), "{} alerts changed after reload", delta.updated.len());
    }
}
