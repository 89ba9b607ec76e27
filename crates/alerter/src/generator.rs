use analytics::{FuelEconomyStatus, alert_severity};
use chrono::{DateTime, Utc};
use configuration::FuelEconomyThresholds;
use core_types::{AlertSeverity, FuelEconomyAlert, format_variance_pct};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// The changes one reconciliation pass wants applied to the alert store.
///
/// Every list is ordered by vehicle id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertDelta {
    pub created: Vec<FuelEconomyAlert>,
    pub updated: Vec<FuelEconomyAlert>,
    pub resolved: Vec<FuelEconomyAlert>,
}

impl AlertDelta {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.resolved.is_empty()
    }
}

/// Decides, per vehicle, whether a fuel economy alert is created, refreshed or resolved.
///
/// The generator never mutates its inputs; it returns the new versions of the
/// records that changed. At most one alert per vehicle is left open.
#[derive(Debug, Clone, Default)]
pub struct FuelAlertGenerator {
    thresholds: FuelEconomyThresholds,
}

impl FuelAlertGenerator {
    pub fn new(thresholds: FuelEconomyThresholds) -> Self {
        Self { thresholds }
    }

    /// Reconciles the fleet's current statuses against the currently open alerts.
    ///
    /// Vehicles without a status, or with a degraded one, keep their alert as is.
    /// Resolved alerts in `open_alerts` are ignored.
    pub fn reconcile(
        &self,
        statuses: &BTreeMap<String, FuelEconomyStatus>,
        open_alerts: &[FuelEconomyAlert],
        now: DateTime<Utc>,
    ) -> AlertDelta {
        let mut delta = AlertDelta::default();

        let mut open_by_vehicle: BTreeMap<&str, Vec<&FuelEconomyAlert>> = BTreeMap::new();
        for alert in open_alerts.iter().filter(|a| a.is_open()) {
            open_by_vehicle.entry(alert.vehicle_id.as_str()).or_default().push(alert);
        }

        let vehicle_ids: BTreeSet<&str> = statuses
            .keys()
            .map(String::as_str)
            .chain(open_by_vehicle.keys().copied())
            .collect();

        for vehicle_id in vehicle_ids {
            let open = match open_by_vehicle.remove(vehicle_id) {
                Some(alerts) => self.collapse_duplicates(alerts, now, &mut delta),
                None => None,
            };
            let Some(status) = statuses.get(vehicle_id) else {
                continue;
            };
            if status.degraded {
                tracing::debug!(vehicle_id, "Skipping alert reconciliation for degraded status.");
                continue;
            }

            match (alert_severity(status.current_vs_baseline, &self.thresholds), open) {
                (Some(severity), None) => {
                    let alert = create_alert(status, severity, now);
                    tracing::info!(vehicle_id, severity = %severity, variance = status.current_vs_baseline, "Fuel economy alert created.");
                    delta.created.push(alert);
                }
                (Some(severity), Some(existing)) => {
                    if let Some(alert) = refresh_alert(existing, status, severity, now) {
                        tracing::info!(vehicle_id, severity = %severity, "Fuel economy alert updated.");
                        delta.updated.push(alert);
                    }
                }
                (None, Some(existing)) => {
                    let note = format!(
                        "Resolved: variance back to {}.",
                        format_variance_pct(status.current_vs_baseline)
                    );
                    tracing::info!(vehicle_id, variance = status.current_vs_baseline, "Fuel economy alert resolved.");
                    delta.resolved.push(resolve_alert(existing, &note, now));
                }
                (None, None) => {}
            }
        }

        delta
    }

    /// Keeps the newest open alert of a vehicle and resolves any others.
    fn collapse_duplicates<'a>(
        &self,
        mut alerts: Vec<&'a FuelEconomyAlert>,
        now: DateTime<Utc>,
        delta: &mut AlertDelta,
    ) -> Option<&'a FuelEconomyAlert> {
        alerts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        let newest = alerts.pop()?;
        for stale in alerts {
            tracing::warn!(vehicle_id = %stale.vehicle_id, alert_id = %stale.id, "Duplicate open alert found; resolving.");
            delta
                .resolved
                .push(resolve_alert(stale, "Resolved: superseded by a newer open alert.", now));
        }
        Some(newest)
    }
}

fn create_alert(status: &FuelEconomyStatus, severity: AlertSeverity, now: DateTime<Utc>) -> FuelEconomyAlert {
    FuelEconomyAlert {
        id: Uuid::new_v4(),
        vehicle_id: status.vehicle_id.clone(),
        severity,
        current_consumption: status.current_consumption,
        baseline_consumption: status.baseline_consumption,
        variance_percentage: status.current_vs_baseline,
        notes: format!(
            "Consumption {:.2} {} is {} against baseline {:.2}.",
            status.current_consumption,
            status.vehicle_type.consumption_unit(),
            format_variance_pct(status.current_vs_baseline),
            status.baseline_consumption
        ),
        is_resolved: false,
        created_at: now,
        updated_at: None,
        resolved_at: None,
    }
}

/// Returns the refreshed alert, or `None` when nothing has changed.
fn refresh_alert(
    existing: &FuelEconomyAlert,
    status: &FuelEconomyStatus,
    severity: AlertSeverity,
    now: DateTime<Utc>,
) -> Option<FuelEconomyAlert> {
    let unchanged = existing.severity == severity
        && existing.variance_percentage == status.current_vs_baseline
        && existing.current_consumption == status.current_consumption
        && existing.baseline_consumption == status.baseline_consumption;
    if unchanged {
        return None;
    }

    let mut alert = existing.clone();
    if alert.severity != severity {
        append_note(
            &mut alert.notes,
            &format!(
                "Severity changed from {} to {} at {}.",
                alert.severity,
                severity,
                format_variance_pct(status.current_vs_baseline)
            ),
        );
    }
    alert.severity = severity;
    alert.variance_percentage = status.current_vs_baseline;
    alert.current_consumption = status.current_consumption;
    alert.baseline_consumption = status.baseline_consumption;
    alert.updated_at = Some(now);
    Some(alert)
}

fn resolve_alert(existing: &FuelEconomyAlert, note: &str, now: DateTime<Utc>) -> FuelEconomyAlert {
    let mut alert = existing.clone();
    alert.is_resolved = true;
    alert.resolved_at = Some(now);
    alert.updated_at = Some(now);
    append_note(&mut alert.notes, note);
    alert
}

fn append_note(notes: &mut String, note: &str) {
    if !notes.is_empty() {
        notes.push(' ');
    }
    notes.push_str(note);
}
