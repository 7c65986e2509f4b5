use serde::{Deserialize, Serialize};

/// Per-pool numbers after normalization. Upstream fields that are missing or
/// malformed arrive here as zero, not as an error.
#[derive(Debug, Clone, Default)]
pub struct PoolMetrics {
    pub tvl: f64,
    pub volume_24h: f64,
    pub fees_24h: f64,
    pub current_price: f64,
    pub apr: f64,
    pub apy: f64,
    pub base_fee_pct: f64,
    pub bin_step: i64,
}

/// One persisted history entry for a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: String,
    pub current_price: f64,
    pub volume_24h: f64,
    pub fees_24h: f64,
    pub tvl: f64,
}

impl Snapshot {
    pub fn new(timestamp: String, metrics: &PoolMetrics) -> Self {
        Self {
            timestamp,
            current_price: metrics.current_price,
            volume_24h: metrics.volume_24h,
            fees_24h: metrics.fees_24h,
            tvl: metrics.tvl,
        }
    }
}
