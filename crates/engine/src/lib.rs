//! # Fleet Analytics Engine
//!
//! The orchestrator of the workspace. `FleetAnalyticsEngine` takes a fully
//! fetched `FleetInput`, fans the fuel economy evaluation out over all vehicles
//! and the incident aggregation over all drivers, reconciles fuel economy
//! alerts once over the resulting statuses, and returns a single
//! `FleetAnalyticsSnapshot`.
//!
//! A problem with one vehicle or driver never fails the run: the entity is
//! reported in the snapshot's diagnostics instead.

use crate::error::EngineError;
use alerter::{AlertStore, FuelAlertGenerator};
use analytics::{ConsumptionWindows, FuelEconomyEvaluator, FuelEconomyStatus};
use configuration::Config;
use core_types::{
    ConsumptionSample, Driver, DriverFine, Vehicle, VehicleDamage, sanitize_consumption,
};
use rayon::prelude::*;
use risk::{DriverIncidentSummary, IncidentAggregator, WeightedIncidentScorer};
use std::collections::{BTreeMap, HashMap};

pub mod error;
pub mod input;
pub mod snapshot;

pub use input::FleetInput;
pub use snapshot::{Diagnostic, EntityRef, FleetAnalyticsSnapshot, IssueKind};

/// The central orchestrator for fleet analytics.
///
/// Holds only configuration-derived calculators, so a single instance can be
/// shared and reused across runs.
#[derive(Debug, Clone)]
pub struct FleetAnalyticsEngine {
    evaluator: FuelEconomyEvaluator,
    alert_generator: FuelAlertGenerator,
    aggregator: IncidentAggregator<WeightedIncidentScorer>,
}

impl FleetAnalyticsEngine {
    /// Creates a new `FleetAnalyticsEngine` from a validated configuration.
    pub fn new(config: &Config) -> Result<Self, EngineError> {
        config.validate()?;
        let scorer = WeightedIncidentScorer::new(config.risk_scoring.clone())?;
        Ok(Self {
            evaluator: FuelEconomyEvaluator::new(config.fuel_economy.clone()),
            alert_generator: FuelAlertGenerator::new(config.fuel_economy.clone()),
            aggregator: IncidentAggregator::new(scorer),
        })
    }

    /// Computes the analytics snapshot for one fleet input.
    ///
    /// The alert delta in the snapshot is not applied anywhere; see
    /// [`FleetAnalyticsEngine::compute_with_store`] for that.
    pub fn compute(&self, input: &FleetInput) -> FleetAnalyticsSnapshot {
        let mut diagnostics = Vec::new();

        // --- 1. Index reference data ---
        let vehicles = index_unique(&input.vehicles, |v| v.id.as_str(), EntityRef::Vehicle, &mut diagnostics);
        let drivers = index_unique(&input.drivers, |d| d.id.as_str(), EntityRef::Driver, &mut diagnostics);

        let samples = group_samples(&input.consumption_history, &vehicles, &mut diagnostics);

        // --- 2. Fuel economy, one vehicle at a time ---
        let evaluated: Vec<(FuelEconomyStatus, Vec<Diagnostic>)> = vehicles
            .values()
            .collect::<Vec<_>>()
            .par_iter()
            .map(|vehicle| {
                let history = samples.get(vehicle.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                let previous = input.previous_variance.get(&vehicle.id).copied();
                self.evaluate_vehicle(vehicle, history, previous)
            })
            .collect();

        let mut statuses = BTreeMap::new();
        for (status, issues) in evaluated {
            diagnostics.extend(issues);
            statuses.insert(status.vehicle_id.clone(), status);
        }

        // --- 3. Alert reconciliation over the whole fleet ---
        for alert in input.open_alerts.iter().filter(|a| a.is_open()) {
            if !vehicles.contains_key(alert.vehicle_id.as_str()) {
                diagnostics.push(Diagnostic::new(
                    IssueKind::MissingReference,
                    EntityRef::Alert(alert.id.to_string()),
                    format!("open alert references unknown vehicle '{}'; left untouched", alert.vehicle_id),
                ));
            }
        }
        let alerts = self.alert_generator.reconcile(&statuses, &input.open_alerts, input.as_of);

        // --- 4. Driver incident summaries ---
        let incidents = group_incidents(input, &vehicles, &drivers, &mut diagnostics);
        let as_of_date = input.as_of.date_naive();
        let mut driver_summaries: Vec<DriverIncidentSummary> = drivers
            .values()
            .collect::<Vec<_>>()
            .par_iter()
            .map(|driver| {
                let (fines, damages) = incidents
                    .get(driver.id.as_str())
                    .map(|(f, d)| (f.as_slice(), d.as_slice()))
                    .unwrap_or_default();
                self.aggregator.summarize(driver, fines, damages, as_of_date)
            })
            .collect();
        driver_summaries.sort_by(|a, b| {
            b.risk_score
                .cmp(&a.risk_score)
                .then_with(|| a.driver_id.cmp(&b.driver_id))
        });
        for summary in driver_summaries.iter().filter(|s| s.totals_saturated) {
            diagnostics.push(Diagnostic::new(
                IssueKind::ComputationDegraded,
                EntityRef::Driver(summary.driver_id.clone()),
                "money totals exceed the representable range; capped at the maximum",
            ));
        }

        if !diagnostics.is_empty() {
            tracing::warn!(count = diagnostics.len(), "Fleet input contained issues; see snapshot diagnostics.");
        }
        tracing::info!(
            vehicles = statuses.len(),
            drivers = driver_summaries.len(),
            alerts_created = alerts.created.len(),
            alerts_updated = alerts.updated.len(),
            alerts_resolved = alerts.resolved.len(),
            "Fleet analytics snapshot computed."
        );

        FleetAnalyticsSnapshot {
            generated_at: input.as_of,
            vehicle_statuses: statuses.into_values().collect(),
            alerts,
            driver_summaries,
            diagnostics,
        }
    }

    /// Computes a snapshot using the store's open alerts, then applies the alert delta to the store.
    pub fn compute_with_store<S: AlertStore>(
        &self,
        mut input: FleetInput,
        store: &mut S,
    ) -> Result<FleetAnalyticsSnapshot, EngineError> {
        input.open_alerts = store.open_alerts();
        let snapshot = self.compute(&input);
        store.apply(&snapshot.alerts)?;
        Ok(snapshot)
    }

    fn evaluate_vehicle(
        &self,
        vehicle: &Vehicle,
        history: &[&ConsumptionSample],
        previous_variance: Option<f64>,
    ) -> (FuelEconomyStatus, Vec<Diagnostic>) {
        let mut issues: Vec<Diagnostic> = vehicle
            .consumption_issues()
            .into_iter()
            .map(|e| Diagnostic::new(IssueKind::InvalidInput, EntityRef::Vehicle(vehicle.id.clone()), e.to_string()))
            .collect();

        let windows = ConsumptionWindows::reduce(history, self.evaluator.thresholds());
        if windows.invalid_samples > 0 {
            issues.push(Diagnostic::new(
                IssueKind::InvalidInput,
                EntityRef::Vehicle(vehicle.id.clone()),
                format!("{} consumption samples skipped as invalid", windows.invalid_samples),
            ));
        }

        // The record's baseline is the reference; history fills in when it is missing.
        let recorded_baseline = sanitize_consumption(vehicle.baseline_consumption);
        let baseline = if recorded_baseline > 0.0 {
            recorded_baseline
        } else {
            windows.baseline.unwrap_or(0.0)
        };
        let current = windows.current.unwrap_or(vehicle.current_consumption);

        let status = self.evaluator.evaluate(vehicle, baseline, current, previous_variance);
        if status.degraded {
            issues.push(Diagnostic::new(
                IssueKind::ComputationDegraded,
                EntityRef::Vehicle(vehicle.id.clone()),
                "insufficient consumption data for baseline or current rate; trend unknown",
            ));
        }
        (status, issues)
    }
}

/// Indexes records by id, keeping the first occurrence of each id and reporting the rest.
fn index_unique<'a, T>(
    records: &'a [T],
    id_of: impl Fn(&'a T) -> &'a str,
    entity: impl Fn(String) -> EntityRef,
    diagnostics: &mut Vec<Diagnostic>,
) -> BTreeMap<&'a str, &'a T> {
    let mut index = BTreeMap::new();
    for record in records {
        let id = id_of(record);
        if index.contains_key(id) {
            diagnostics.push(Diagnostic::new(
                IssueKind::InvalidInput,
                entity(id.to_string()),
                "duplicate id; only the first record is used",
            ));
            continue;
        }
        index.insert(id, record);
    }
    index
}

fn group_samples<'a>(
    history: &'a [ConsumptionSample],
    vehicles: &BTreeMap<&str, &Vehicle>,
    diagnostics: &mut Vec<Diagnostic>,
) -> HashMap<&'a str, Vec<&'a ConsumptionSample>> {
    let mut grouped: HashMap<&str, Vec<&ConsumptionSample>> = HashMap::new();
    let mut orphaned: BTreeMap<&str, usize> = BTreeMap::new();
    for sample in history {
        if vehicles.contains_key(sample.vehicle_id.as_str()) {
            grouped.entry(sample.vehicle_id.as_str()).or_default().push(sample);
        } else {
            *orphaned.entry(sample.vehicle_id.as_str()).or_default() += 1;
        }
    }
    for (vehicle_id, count) in orphaned {
        diagnostics.push(Diagnostic::new(
            IssueKind::MissingReference,
            EntityRef::Vehicle(vehicle_id.to_string()),
            format!("{} consumption samples reference an unknown vehicle; excluded", count),
        ));
    }
    grouped
}

type Incidents<'a> = (Vec<&'a DriverFine>, Vec<&'a VehicleDamage>);

/// Partitions fines and damages by driver, excluding records that reference an
/// unknown driver or vehicle.
fn group_incidents<'a>(
    input: &'a FleetInput,
    vehicles: &BTreeMap<&str, &Vehicle>,
    drivers: &BTreeMap<&str, &Driver>,
    diagnostics: &mut Vec<Diagnostic>,
) -> HashMap<&'a str, Incidents<'a>> {
    let mut grouped: HashMap<&str, Incidents<'a>> = HashMap::new();

    for fine in &input.fines {
        let entity = || EntityRef::Fine(fine.id.clone());
        if let Some(message) = missing_reference(&fine.driver_id, &fine.vehicle_id, vehicles, drivers) {
            diagnostics.push(Diagnostic::new(IssueKind::MissingReference, entity(), message));
            continue;
        }
        grouped.entry(fine.driver_id.as_str()).or_default().0.push(fine);
    }

    for damage in &input.damages {
        let entity = || EntityRef::Damage(damage.id.clone());
        if let Some(message) = missing_reference(&damage.driver_id, &damage.vehicle_id, vehicles, drivers) {
            diagnostics.push(Diagnostic::new(IssueKind::MissingReference, entity(), message));
            continue;
        }
        grouped.entry(damage.driver_id.as_str()).or_default().1.push(damage);
    }

    grouped
}

fn missing_reference(
    driver_id: &str,
    vehicle_id: &str,
    vehicles: &BTreeMap<&str, &Vehicle>,
    drivers: &BTreeMap<&str, &Driver>,
) -> Option<String> {
    if !drivers.contains_key(driver_id) {
        return Some(format!("references unknown driver '{}'; excluded from summaries", driver_id));
    }
    if !vehicles.contains_key(vehicle_id) {
        return Some(format!("references unknown vehicle '{}'; excluded from summaries", vehicle_id));
    }
    None
}
