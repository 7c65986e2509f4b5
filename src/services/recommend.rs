use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Recommendation, Snapshot};
use crate::services::normalize;
use crate::services::scoring::{self, ScoringEngine};
use crate::services::storage::{StateStore, StoreError};
use crate::sources::{PairSource, SourceError};

const MINUTES_PER_DAY: f64 = 1440.0;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("pair fetch failed: {0}")]
    Source(#[from] SourceError),
    #[error("state persist failed: {0}")]
    Store(#[from] StoreError),
}

/// Run parameters, fixed for the duration of one scan.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub days: f64,
    pub top: usize,
    pub min_tvl: f64,
    pub min_vol24h: f64,
    pub min_fees24h: f64,
    pub new_only: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            days: 3.0,
            top: 15,
            min_tvl: 0.0,
            min_vol24h: 0.0,
            min_fees24h: 0.0,
            new_only: false,
        }
    }
}

/// Merge incoming pair records against persisted state, filter, score, rank
/// and persist the updated state for the next run.
pub struct Recommender {
    source: Arc<dyn PairSource>,
    store: StateStore,
    scoring: ScoringEngine,
}

impl Recommender {
    pub fn new(source: Arc<dyn PairSource>, store: StateStore, scoring: ScoringEngine) -> Self {
        Self {
            source,
            store,
            scoring,
        }
    }

    pub async fn run(&self, config: &ScannerConfig) -> Result<Vec<Recommendation>, ScanError> {
        let pairs = self.source.fetch_pairs().await?;
        tracing::info!("fetched {} pairs from {}", pairs.len(), self.source.name());
        Ok(self.process(&pairs, config)?)
    }

    /// The scan itself, synchronous and single-pass. A malformed record is
    /// filtered out, never an error; only state persistence can fail.
    pub fn process(
        &self,
        pairs: &[Value],
        config: &ScannerConfig,
    ) -> Result<Vec<Recommendation>, StoreError> {
        let mut first_seen = self.store.load_first_seen();
        let mut snapshots = self.store.load_snapshots();
        let now = Utc::now().to_rfc3339();

        let mut recommendations = Vec::new();

        for pair in pairs {
            let Some(address) = normalize::pair_address(pair) else {
                continue;
            };

            let is_new = !first_seen.contains_key(&address);
            if is_new {
                first_seen.insert(address.clone(), now.clone());
            }

            let age_hours = scoring::calc_age_hours(&first_seen[&address]);
            if age_hours > config.days * 24.0 {
                continue;
            }
            if config.new_only && !is_new {
                continue;
            }

            let metrics = normalize::extract_metrics(pair);
            if metrics.tvl < config.min_tvl
                || metrics.volume_24h < config.min_vol24h
                || metrics.fees_24h < config.min_fees24h
            {
                continue;
            }

            let last_price = snapshots
                .last(&address)
                .map(|s| s.current_price)
                .unwrap_or(0.0);
            let move_pct = scoring::calc_move_pct(metrics.current_price, last_price);

            let vol_per_min = per_minute(metrics.volume_24h);
            let fees_per_min = per_minute(metrics.fees_24h);

            let score = self.scoring.composite(&metrics, move_pct, age_hours);
            let strategy = scoring::suggest_strategy(age_hours, move_pct, vol_per_min, fees_per_min);
            let hold = scoring::suggest_hold(age_hours, move_pct);

            recommendations.push(Recommendation {
                name: normalize::pair_name(pair),
                pair_address: address.clone(),
                mint_x: normalize::mint_x(pair),
                mint_y: normalize::mint_y(pair),
                tvl: metrics.tvl,
                volume_24h: metrics.volume_24h,
                fees_24h: metrics.fees_24h,
                current_price: metrics.current_price,
                apr_24h: metrics.apr,
                apy_24h: metrics.apy,
                base_fee_pct: metrics.base_fee_pct,
                bin_step: metrics.bin_step,
                vol_per_min,
                fees_per_min,
                move_pct,
                age_hours,
                is_new,
                score,
                strategy: strategy.to_string(),
                hold: hold.to_string(),
            });

            snapshots.push(&address, Snapshot::new(now.clone(), &metrics));
        }

        recommendations.sort_by(|a, b| {
            b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
        });
        recommendations.truncate(config.top);

        self.store.save_first_seen(&first_seen)?;
        self.store.save_snapshots(&snapshots)?;

        Ok(recommendations)
    }
}

/// Per-minute rate of a 24h figure. A zero numerator stays exactly zero.
fn per_minute(value_24h: f64) -> f64 {
    if value_24h == 0.0 {
        return 0.0;
    }
    value_24h / MINUTES_PER_DAY
}
