use alerter::AlertDelta;
use analytics::FuelEconomyStatus;
use chrono::{DateTime, Utc};
use risk::DriverIncidentSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The immutable result of one engine run, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetAnalyticsSnapshot {
    pub generated_at: DateTime<Utc>,
    /// One status per known vehicle, ordered by vehicle id.
    pub vehicle_statuses: Vec<FuelEconomyStatus>,
    /// Alert changes for the alert store to apply.
    pub alerts: AlertDelta,
    /// One summary per known driver, highest risk first, ties by driver id.
    pub driver_summaries: Vec<DriverIncidentSummary>,
    /// Problems found in the input. None of them stopped the run.
    pub diagnostics: Vec<Diagnostic>,
}

impl FleetAnalyticsSnapshot {
    pub fn status_for(&self, vehicle_id: &str) -> Option<&FuelEconomyStatus> {
        self.vehicle_statuses.iter().find(|s| s.vehicle_id == vehicle_id)
    }

    pub fn summary_for(&self, driver_id: &str) -> Option<&DriverIncidentSummary> {
        self.driver_summaries.iter().find(|s| s.driver_id == driver_id)
    }

    pub fn diagnostics_of(&self, kind: IssueKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    /// A figure was malformed and clamped to a safe default.
    InvalidInput,
    /// A record pointed at a vehicle or driver that is not in the snapshot; it was excluded.
    MissingReference,
    /// Not enough data for a full evaluation; the entity was reported with a degraded status.
    ComputationDegraded,
}

/// The entity a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum EntityRef {
    Vehicle(String),
    Driver(String),
    Fine(String),
    Damage(String),
    Alert(String),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Vehicle(id) => write!(f, "vehicle {}", id),
            EntityRef::Driver(id) => write!(f, "driver {}", id),
            EntityRef::Fine(id) => write!(f, "fine {}", id),
            EntityRef::Damage(id) => write!(f, "damage {}", id),
            EntityRef::Alert(id) => write!(f, "alert {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: IssueKind,
    pub entity: EntityRef,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: IssueKind, entity: EntityRef, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity,
            message: message.into(),
        }
    }
}
