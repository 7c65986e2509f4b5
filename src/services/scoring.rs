use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::PoolMetrics;

/// Sentinel age for unparseable first-seen timestamps. Large enough that any
/// freshness window excludes the record instead of crashing on it.
const AGE_SENTINEL_HOURS: f64 = 1e9;

/// Hours a pool still counts as brand new / still fresh.
const FRESH_DAY_HOURS: f64 = 24.0;
const FRESH_3DAY_HOURS: f64 = 72.0;

/// Age in hours since the first-seen timestamp, floored at 0.
pub fn calc_age_hours(first_seen_iso: &str) -> f64 {
    match DateTime::parse_from_rfc3339(first_seen_iso) {
        Ok(ts) => {
            let age = Utc::now().signed_duration_since(ts.with_timezone(&Utc));
            (age.num_milliseconds() as f64 / 3_600_000.0).max(0.0)
        }
        Err(_) => AGE_SENTINEL_HOURS,
    }
}

/// Percentage move against the last recorded price. No prior price (or a
/// garbage non-positive one) counts as no movement.
pub fn calc_move_pct(current_price: f64, last_price: f64) -> f64 {
    if last_price <= 0.0 {
        return 0.0;
    }
    (current_price - last_price).abs() / last_price * 100.0
}

/// Tunable weights for the composite score, overridable from
/// `config.toml [scoring]`. TVL/volume/fees are log-scaled magnitudes; the
/// APR and base-fee terms are linear percentages.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub tvl: f64,
    pub volume: f64,
    pub fees: f64,
    pub apr: f64,
    pub base_fee: f64,
    pub movement: f64,
    pub movement_cap: f64,
    pub fresh_day: f64,
    pub fresh_3day: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            tvl: 1.0,
            volume: 1.5,
            fees: 8.0,
            apr: 0.8,
            base_fee: 10.0,
            movement: 1.2,
            movement_cap: 25.0,
            fresh_day: 20.0,
            fresh_3day: 10.0,
        }
    }
}

pub struct ScoringEngine {
    weights: ScoreWeights,
}

/// Diminishing-returns transform for magnitude metrics, so one whale pool
/// does not dominate the ranking. Negative or garbage inputs contribute 0.
fn log_scale(value: f64) -> f64 {
    (1.0 + value.max(0.0)).log10()
}

impl ScoringEngine {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Weighted sum over both metric families. A family absent upstream
    /// contributes nothing, so pools keyed on either APR-style or
    /// TVL/volume/fees-style data rank in the same list.
    pub fn composite(&self, metrics: &PoolMetrics, move_pct: f64, age_hours: f64) -> f64 {
        let w = &self.weights;
        log_scale(metrics.tvl) * w.tvl
            + log_scale(metrics.volume_24h) * w.volume
            + log_scale(metrics.fees_24h) * w.fees
            + metrics.apr * w.apr
            + metrics.base_fee_pct * w.base_fee
            + move_pct.clamp(0.0, w.movement_cap) * w.movement
            + self.freshness_bonus(age_hours)
    }

    fn freshness_bonus(&self, age_hours: f64) -> f64 {
        if age_hours <= FRESH_DAY_HOURS {
            self.weights.fresh_day
        } else if age_hours <= FRESH_3DAY_HOURS {
            self.weights.fresh_3day
        } else {
            0.0
        }
    }
}

/// LP strategy decision table. Ranges overlap, so rule order is load-bearing:
/// fresh volatility first, then fee velocity, then volume velocity, then raw
/// volatility, then moderate freshness, else the conservative default.
pub fn suggest_strategy(
    age_hours: f64,
    move_pct: f64,
    vol_per_min: f64,
    fees_per_min: f64,
) -> &'static str {
    if age_hours <= FRESH_DAY_HOURS && move_pct >= 5.0 {
        return "Spot-Spread (20-30 bins)";
    }
    if fees_per_min >= 0.5 {
        return "Fee-Harvest (tight bins)";
    }
    if vol_per_min >= 100.0 {
        return "Momentum (wide spot)";
    }
    if move_pct >= 10.0 {
        return "Spot-Wide (survival mode)";
    }
    if age_hours <= FRESH_3DAY_HOURS {
        return "Bid-Ask (DCA style)";
    }
    "Spot-Spread (moderate)"
}

/// Hold-duration decision table over (age, movement), same first-match rule.
pub fn suggest_hold(age_hours: f64, move_pct: f64) -> &'static str {
    if age_hours <= FRESH_DAY_HOURS {
        return "2-8 hours (farm early chaos)";
    }
    if move_pct >= 10.0 {
        return "1-6 hours (tight risk controls)";
    }
    "6-24 hours (monitor decay)"
}
