use chrono::Days;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::{FlowError, Result};
use crate::core::health::HealthMetrics;
use crate::core::projection::ProjectionPoint;
use crate::ledger::{LedgerSnapshot, Transaction, TransactionDraft};

/// A hypothetical, non-persisted ledger transformation requested by the
/// presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scenario {
    DelayPayments {
        transaction_ids: Vec<Uuid>,
        delay_days: u64,
    },
    WhatIf {
        transaction: TransactionDraft,
    },
}

/// Baseline and simulated metrics, both computed by the identical
/// projection/scoring pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub baseline: HealthMetrics,
    pub simulated: HealthMetrics,
    pub projection: Vec<ProjectionPoint>,
}

pub struct ScenarioEngine;

impl ScenarioEngine {
    /// Returns a copy of `snapshot` where each named pending or projected
    /// transaction is pushed `delay_days` into the future. Confirmed
    /// transactions are not delayable. The input snapshot is never mutated.
    pub fn simulate_delay(
        snapshot: &LedgerSnapshot,
        transaction_ids: &[Uuid],
        delay_days: u64,
    ) -> Result<LedgerSnapshot> {
        let mut derived = snapshot.clone();
        for id in transaction_ids {
            let txn = derived
                .transactions
                .iter_mut()
                .find(|txn| txn.id == *id)
                .ok_or_else(|| {
                    FlowError::InvalidScenario(format!("transaction {id} not found"))
                })?;
            if txn.is_confirmed() {
                return Err(FlowError::InvalidScenario(format!(
                    "transaction {id} is confirmed and cannot be delayed"
                )));
            }
            txn.date = txn
                .date
                .checked_add_days(Days::new(delay_days))
                .ok_or_else(|| {
                    FlowError::InvalidScenario(format!(
                        "delay of {delay_days} day(s) overflows the calendar"
                    ))
                })?;
        }
        Ok(derived)
    }

    /// Returns a copy of `snapshot` with one additional hypothetical
    /// transaction merged in. Never persisted; the input is never mutated.
    pub fn simulate_what_if(
        snapshot: &LedgerSnapshot,
        hypothetical: TransactionDraft,
    ) -> Result<LedgerSnapshot> {
        let txn = Transaction::try_new(hypothetical)?;
        let mut derived = snapshot.clone();
        derived.transactions.push(txn);
        Ok(derived)
    }

    /// Applies `scenario` to a copy of `snapshot`.
    pub fn apply(snapshot: &LedgerSnapshot, scenario: &Scenario) -> Result<LedgerSnapshot> {
        match scenario {
            Scenario::DelayPayments {
                transaction_ids,
                delay_days,
            } => Self::simulate_delay(snapshot, transaction_ids, *delay_days),
            Scenario::WhatIf { transaction } => {
                Self::simulate_what_if(snapshot, transaction.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionStatus;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    fn draft(status: TransactionStatus, date: NaiveDate, amount: f64) -> TransactionDraft {
        TransactionDraft {
            date,
            amount,
            status,
            probability: match status {
                TransactionStatus::Projected => Some(0.9),
                _ => None,
            },
            category: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn delay_shifts_only_named_transactions() {
        let mut snapshot = LedgerSnapshot::new(0.0);
        let moved = snapshot
            .add_transaction(draft(TransactionStatus::Pending, day(5), 100.0))
            .unwrap();
        let kept = snapshot
            .add_transaction(draft(TransactionStatus::Pending, day(6), 200.0))
            .unwrap();

        let derived = ScenarioEngine::simulate_delay(&snapshot, &[moved.id], 10).unwrap();
        assert_eq!(derived.transaction(moved.id).unwrap().date, day(15));
        assert_eq!(derived.transaction(kept.id).unwrap().date, day(6));
        // Base snapshot untouched.
        assert_eq!(snapshot.transaction(moved.id).unwrap().date, day(5));
    }

    #[test]
    fn delaying_a_confirmed_transaction_fails() {
        let mut snapshot = LedgerSnapshot::new(0.0);
        let txn = snapshot
            .add_transaction(draft(TransactionStatus::Confirmed, day(5), 100.0))
            .unwrap();
        let err = ScenarioEngine::simulate_delay(&snapshot, &[txn.id], 3)
            .expect_err("confirmed transactions must not be delayable");
        assert!(matches!(err, FlowError::InvalidScenario(_)));
    }

    #[test]
    fn delaying_an_unknown_id_fails() {
        let snapshot = LedgerSnapshot::new(0.0);
        let err = ScenarioEngine::simulate_delay(&snapshot, &[Uuid::new_v4()], 3)
            .expect_err("unknown ids must fail");
        assert!(matches!(err, FlowError::InvalidScenario(_)));
    }

    #[test]
    fn what_if_merges_without_touching_the_base() {
        let snapshot = LedgerSnapshot::new(1_000.0);
        let derived = ScenarioEngine::simulate_what_if(
            &snapshot,
            draft(TransactionStatus::Projected, day(3), -5_000.0),
        )
        .unwrap();
        assert_eq!(derived.transaction_count(), 1);
        assert_eq!(snapshot.transaction_count(), 0);
    }

    #[test]
    fn what_if_rejects_invalid_probability() {
        let snapshot = LedgerSnapshot::new(0.0);
        let mut bad = draft(TransactionStatus::Projected, day(3), -100.0);
        bad.probability = Some(2.0);
        let err = ScenarioEngine::simulate_what_if(&snapshot, bad)
            .expect_err("invalid hypothetical must fail");
        assert!(matches!(err, FlowError::InvalidTransaction(_)));
    }

    #[test]
    fn scenarios_compose_by_chaining() {
        let mut snapshot = LedgerSnapshot::new(0.0);
        let txn = snapshot
            .add_transaction(draft(TransactionStatus::Pending, day(1), 100.0))
            .unwrap();

        let delayed = ScenarioEngine::simulate_delay(&snapshot, &[txn.id], 7).unwrap();
        let stacked = ScenarioEngine::simulate_what_if(
            &delayed,
            draft(TransactionStatus::Projected, day(2), -40.0),
        )
        .unwrap();
        assert_eq!(stacked.transaction_count(), 2);
        assert_eq!(stacked.transaction(txn.id).unwrap().date, day(8));
        assert_eq!(delayed.transaction_count(), 1);
        assert_eq!(snapshot.transaction(txn.id).unwrap().date, day(1));
    }
}
