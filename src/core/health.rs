use serde::{Deserialize, Serialize};

use crate::core::projection::ProjectionPoint;
use crate::ledger::LedgerSnapshot;

/// Days a month is scaled to when deriving the burn rate.
const MONTH_DAYS: f64 = 30.0;
/// Runway beyond this many months no longer raises the score.
const RUNWAY_CAP_MONTHS: f64 = 6.0;
/// Danger closer than this many days pins the score into the critical band.
const NEAR_TERM_DANGER_DAYS: u32 = 14;

/// First future day on which the expected balance goes negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DaysUntilDanger {
    /// No negative day inside the projection horizon.
    Safe,
    Within { days: u32 },
}

/// Months of operation left at the current expected burn rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonthlyRunway {
    /// Burn rate is zero or negative; the balance is never exhausted.
    Unbounded,
    Months { months: f64 },
}

/// Net-flow direction of the back half of the horizon versus the front half.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// Score bands reproduced verbatim for UI compatibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Caution,
    Poor,
    Critical,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => ScoreBand::Excellent,
            80..=89 => ScoreBand::Good,
            60..=79 => ScoreBand::Caution,
            40..=59 => ScoreBand::Poor,
            _ => ScoreBand::Critical,
        }
    }
}

/// UI color mapping: green 80-100, yellow 60-79, red 0-59.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreColor {
    Green,
    Yellow,
    Red,
}

impl ScoreColor {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreColor::Green,
            60..=79 => ScoreColor::Yellow,
            _ => ScoreColor::Red,
        }
    }
}

/// Everything the dashboard shows about the ledger's health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub pulse_score: u8,
    pub band: ScoreBand,
    pub color: ScoreColor,
    pub days_until_danger: DaysUntilDanger,
    pub monthly_runway: MonthlyRunway,
    pub trend: Trend,
    pub min_balance: f64,
    pub current_balance: f64,
}

/// Derives all health metrics from a projection and the snapshot it was
/// built from.
pub fn assess(projection: &[ProjectionPoint], snapshot: &LedgerSnapshot) -> HealthMetrics {
    let danger = days_until_danger(projection);
    let runway = monthly_runway(projection, snapshot.current_balance);
    let direction = trend(projection, snapshot.current_balance);
    let volatility = volatility_ratio(projection, snapshot.current_balance);
    let score = pulse_score(danger, runway, direction, volatility);
    let min_balance = projection
        .iter()
        .map(|point| point.balance)
        .fold(snapshot.current_balance, f64::min);
    HealthMetrics {
        pulse_score: score,
        band: ScoreBand::from_score(score),
        color: ScoreColor::from_score(score),
        days_until_danger: danger,
        monthly_runway: runway,
        trend: direction,
        min_balance,
        current_balance: snapshot.current_balance,
    }
}

/// Index (days from today) of the first projected negative balance.
pub fn days_until_danger(projection: &[ProjectionPoint]) -> DaysUntilDanger {
    match projection.iter().position(|point| point.balance < 0.0) {
        Some(index) => DaysUntilDanger::Within { days: index as u32 },
        None => DaysUntilDanger::Safe,
    }
}

/// `current_balance / monthly burn`, where burn is the negated mean daily
/// net expected flow scaled to a 30-day month and clamped to zero-or-positive.
/// A net-positive trajectory yields `Unbounded`; there is no division error.
pub fn monthly_runway(projection: &[ProjectionPoint], current_balance: f64) -> MonthlyRunway {
    if projection.is_empty() {
        return MonthlyRunway::Unbounded;
    }
    let mean_net =
        projection.iter().map(|point| point.net_flow).sum::<f64>() / projection.len() as f64;
    let monthly_burn = (-mean_net * MONTH_DAYS).max(0.0);
    if monthly_burn <= f64::EPSILON {
        MonthlyRunway::Unbounded
    } else {
        MonthlyRunway::Months {
            months: current_balance / monthly_burn,
        }
    }
}

/// Compares net expected flow of the two horizon halves. The symmetric
/// tolerance band for `Stable` is `max(1.0, 1% of |current_balance|)`.
pub fn trend(projection: &[ProjectionPoint], current_balance: f64) -> Trend {
    let mid = projection.len() / 2;
    let first: f64 = projection[..mid].iter().map(|point| point.net_flow).sum();
    let second: f64 = projection[mid..].iter().map(|point| point.net_flow).sum();
    let tolerance = (current_balance.abs() * 0.01).max(1.0);
    let delta = second - first;
    if delta > tolerance {
        Trend::Improving
    } else if delta < -tolerance {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Standard deviation of daily net flow squashed into [0, 1) against a
/// balance-derived scale. Higher variance moves the ratio toward 1.
fn volatility_ratio(projection: &[ProjectionPoint], current_balance: f64) -> f64 {
    if projection.len() < 2 {
        return 0.0;
    }
    let n = projection.len() as f64;
    let mean = projection.iter().map(|point| point.net_flow).sum::<f64>() / n;
    let variance = projection
        .iter()
        .map(|point| (point.net_flow - mean).powi(2))
        .sum::<f64>()
        / n;
    let sd = variance.sqrt();
    let scale = (current_balance.abs() / MONTH_DAYS).max(1.0);
    sd / (sd + scale)
}

/// Weighted pulse score in [0, 100]. The danger base dominates; runway,
/// trend, and volatility shift it by a bounded amount. Two hard caps keep
/// the bands honest: near-term danger pins the score into 0-39, and 90+ is
/// reserved for a safe danger outlook with strong runway.
///
/// Danger base: Safe -> 92; d >= 60 -> 85; 30-59 -> 60 + (d-30)*25/30;
/// 14-29 -> 40 + (d-14)*20/16; under 14 -> d*39/14. Runway adds up to 6
/// (linear, capped at 6 months); trend shifts +-2; volatility subtracts up
/// to 4. Monotonic in each component holding the others fixed.
pub fn pulse_score(
    danger: DaysUntilDanger,
    runway: MonthlyRunway,
    trend: Trend,
    volatility: f64,
) -> u8 {
    let near = NEAR_TERM_DANGER_DAYS as f64;
    let danger_base = match danger {
        DaysUntilDanger::Safe => 92.0,
        DaysUntilDanger::Within { days } => {
            let d = days as f64;
            if days >= 60 {
                85.0
            } else if days >= 30 {
                60.0 + (d - 30.0) * 25.0 / 30.0
            } else if days >= NEAR_TERM_DANGER_DAYS {
                40.0 + (d - near) * 20.0 / 16.0
            } else {
                d * 39.0 / near
            }
        }
    };
    let runway_bonus = match runway {
        MonthlyRunway::Unbounded => 6.0,
        MonthlyRunway::Months { months } => {
            6.0 * months.clamp(0.0, RUNWAY_CAP_MONTHS) / RUNWAY_CAP_MONTHS
        }
    };
    let trend_shift = match trend {
        Trend::Improving => 2.0,
        Trend::Stable => 0.0,
        Trend::Declining => -2.0,
    };
    let mut score = danger_base + runway_bonus + trend_shift - 4.0 * volatility.clamp(0.0, 1.0);

    if let DaysUntilDanger::Within { days } = danger {
        if days < NEAR_TERM_DANGER_DAYS {
            score = score.min(39.0);
        }
    }
    let strong_runway = matches!(runway, MonthlyRunway::Unbounded)
        || matches!(runway, MonthlyRunway::Months { months } if months >= RUNWAY_CAP_MONTHS);
    if !(matches!(danger, DaysUntilDanger::Safe) && strong_runway) {
        score = score.min(89.0);
    }
    score.clamp(0.0, 100.0).round() as u8
}
