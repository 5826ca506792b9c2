use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::errors::{FlowError, Result};
use crate::ledger::LedgerSnapshot;

/// Default projection window, in days.
pub const DEFAULT_HORIZON_DAYS: i64 = 90;

/// Expected balance and flow detail for a single day of the horizon.
/// Derived on every run; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub date: NaiveDate,
    pub balance: f64,
    pub inflow: f64,
    pub outflow: f64,
    pub net_flow: f64,
}

/// Builds the expected daily balance trajectory from `today` through
/// `today + horizon_days`, one point per day whether or not anything moves.
///
/// Transactions dated before `today` are already reflected in the snapshot's
/// balance and never contribute again. Pending and projected entries enter
/// at `amount * probability`; confirmed entries at full value. Pure and
/// deterministic: identical inputs yield identical output.
pub fn project(
    snapshot: &LedgerSnapshot,
    today: NaiveDate,
    horizon_days: i64,
) -> Result<Vec<ProjectionPoint>> {
    if horizon_days <= 0 {
        return Err(FlowError::InvalidHorizon(horizon_days));
    }
    let end = today
        .checked_add_days(Days::new(horizon_days as u64))
        .ok_or(FlowError::InvalidHorizon(horizon_days))?;

    // (expected inflow, expected outflow magnitude) per day with movement.
    let mut daily: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for txn in &snapshot.transactions {
        if txn.date < today || txn.date > end {
            continue;
        }
        let expected = txn.expected_amount();
        let entry = daily.entry(txn.date).or_insert((0.0, 0.0));
        if expected >= 0.0 {
            entry.0 += expected;
        } else {
            entry.1 += -expected;
        }
    }

    let mut points = Vec::with_capacity(horizon_days as usize + 1);
    let mut balance = snapshot.current_balance;
    for offset in 0..=horizon_days {
        let date = today
            .checked_add_days(Days::new(offset as u64))
            .ok_or(FlowError::InvalidHorizon(horizon_days))?;
        let (inflow, outflow) = daily.get(&date).copied().unwrap_or((0.0, 0.0));
        let net_flow = inflow - outflow;
        balance += net_flow;
        points.push(ProjectionPoint {
            date,
            balance,
            inflow,
            outflow,
            net_flow,
        });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{TransactionDraft, TransactionStatus};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn draft(
        date: NaiveDate,
        amount: f64,
        status: TransactionStatus,
        probability: Option<f64>,
    ) -> TransactionDraft {
        TransactionDraft {
            date,
            amount,
            status,
            probability,
            category: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn empty_ledger_projects_flat() {
        let snapshot = LedgerSnapshot::new(1_250.0);
        let points = project(&snapshot, day(1), 30).unwrap();
        assert_eq!(points.len(), 31);
        assert!(points.iter().all(|p| p.balance == 1_250.0));
        assert!(points.iter().all(|p| p.net_flow == 0.0));
    }

    #[test]
    fn non_positive_horizon_is_rejected() {
        let snapshot = LedgerSnapshot::new(0.0);
        for horizon in [0, -5] {
            let err = project(&snapshot, day(1), horizon)
                .expect_err("non-positive horizon must fail");
            assert!(matches!(err, FlowError::InvalidHorizon(h) if h == horizon));
        }
    }

    #[test]
    fn past_transactions_never_contribute() {
        let mut snapshot = LedgerSnapshot::new(1_000.0);
        snapshot
            .add_transaction(draft(day(1), -400.0, TransactionStatus::Confirmed, None))
            .unwrap();
        let points = project(&snapshot, day(10), 10).unwrap();
        assert!(points.iter().all(|p| p.balance == 1_000.0));
    }

    #[test]
    fn todays_transactions_land_on_the_first_point() {
        let mut snapshot = LedgerSnapshot::new(100.0);
        snapshot
            .add_transaction(draft(day(10), 50.0, TransactionStatus::Confirmed, None))
            .unwrap();
        let points = project(&snapshot, day(10), 5).unwrap();
        assert_eq!(points[0].balance, 150.0);
        assert_eq!(points[5].balance, 150.0);
    }

    #[test]
    fn probability_weights_expected_flow() {
        let mut snapshot = LedgerSnapshot::new(0.0);
        snapshot
            .add_transaction(draft(day(3), 1_000.0, TransactionStatus::Projected, Some(0.5)))
            .unwrap();
        let points = project(&snapshot, day(1), 5).unwrap();
        assert_eq!(points[2].inflow, 500.0);
        assert_eq!(points[5].balance, 500.0);
    }

    #[test]
    fn days_with_no_movement_carry_the_balance_forward() {
        let mut snapshot = LedgerSnapshot::new(10.0);
        snapshot
            .add_transaction(draft(day(4), -30.0, TransactionStatus::Confirmed, None))
            .unwrap();
        let points = project(&snapshot, day(1), 6).unwrap();
        assert_eq!(points[2].balance, 10.0);
        assert_eq!(points[3].balance, -20.0);
        assert_eq!(points[6].balance, -20.0);
    }

    #[test]
    fn projection_is_deterministic() {
        let mut snapshot = LedgerSnapshot::new(500.0);
        for offset in [2, 9, 9, 17] {
            snapshot
                .add_transaction(draft(
                    day(offset),
                    -37.5,
                    TransactionStatus::Projected,
                    Some(0.8),
                ))
                .unwrap();
        }
        let first = project(&snapshot, day(1), 20).unwrap();
        let second = project(&snapshot, day(1), 20).unwrap();
        assert_eq!(first, second);
    }
}
