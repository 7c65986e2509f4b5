pub mod meteora;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use meteora::MeteoraDlmm;

/// Supplies the raw list of pool records. Rows stay loosely typed because the
/// upstream schema drifts between API versions; the normalizer sorts it out.
#[async_trait]
pub trait PairSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_pairs(&self) -> Result<Vec<Value>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("rate limited")]
    RateLimit,
    #[error("unexpected status: {0}")]
    Status(u16),
}
