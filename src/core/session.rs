use chrono::NaiveDate;
use tracing::debug;

use crate::core::errors::Result;
use crate::core::health::{self, HealthMetrics};
use crate::core::projection::{self, ProjectionPoint, DEFAULT_HORIZON_DAYS};
use crate::core::scenario::{Scenario, ScenarioEngine, ScenarioReport};
use crate::ledger::{LedgerSnapshot, Transaction};

/// Read-side facade the presentation layer polls after every ledger
/// mutation. Owns the one snapshot of the interactive session; every query
/// is a self-contained pure computation with no shared mutable state.
pub struct FlowSession {
    snapshot: LedgerSnapshot,
    today: NaiveDate,
    horizon_days: i64,
}

impl FlowSession {
    pub fn new(snapshot: LedgerSnapshot, today: NaiveDate) -> Self {
        Self {
            snapshot,
            today,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    pub fn with_horizon(mut self, horizon_days: i64) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    /// Mutation entry point for the ledger-model operations; the session
    /// recomputes nothing until the next query.
    pub fn snapshot_mut(&mut self) -> &mut LedgerSnapshot {
        &mut self.snapshot
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn horizon_days(&self) -> i64 {
        self.horizon_days
    }

    /// Daily expected balance trajectory over the configured horizon.
    pub fn projection(&self) -> Result<Vec<ProjectionPoint>> {
        projection::project(&self.snapshot, self.today, self.horizon_days)
    }

    /// All health metrics derived from the current projection.
    pub fn health_metrics(&self) -> Result<HealthMetrics> {
        let points = self.projection()?;
        let metrics = health::assess(&points, &self.snapshot);
        debug!(
            score = metrics.pulse_score,
            horizon_days = self.horizon_days,
            "assessed ledger health"
        );
        Ok(metrics)
    }

    /// Runs `scenario` against a copy of the snapshot and reports the
    /// simulated metrics next to the baseline. The session's own snapshot
    /// is untouched.
    pub fn run_scenario(&self, scenario: &Scenario) -> Result<ScenarioReport> {
        let baseline = self.health_metrics()?;
        let derived = ScenarioEngine::apply(&self.snapshot, scenario)?;
        let projection = projection::project(&derived, self.today, self.horizon_days)?;
        let simulated = health::assess(&projection, &derived);
        Ok(ScenarioReport {
            baseline,
            simulated,
            projection,
        })
    }

    /// Pending inflows that were due before today.
    pub fn overdue_payments(&self) -> Vec<&Transaction> {
        self.snapshot.overdue_payments(self.today)
    }
}
