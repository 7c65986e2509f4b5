use serde::{Deserialize, Serialize};

/// Ranked output record, recomputed every run and written to the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub pair_address: String,
    pub mint_x: String,
    pub mint_y: String,
    pub tvl: f64,
    pub volume_24h: f64,
    pub fees_24h: f64,
    pub current_price: f64,
    pub apr_24h: f64,
    pub apy_24h: f64,
    pub base_fee_pct: f64,
    pub bin_step: i64,
    pub vol_per_min: f64,
    pub fees_per_min: f64,
    pub move_pct: f64,
    pub age_hours: f64,
    pub is_new: bool,
    pub score: f64,
    pub strategy: String,
    pub hold: String,
}
