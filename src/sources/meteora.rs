use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{PairSource, SourceError};

/// Meteora DLMM pair listing API client.
pub struct MeteoraDlmm {
    client: Client,
    base_url: String,
}

impl MeteoraDlmm {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PairSource for MeteoraDlmm {
    fn name(&self) -> &'static str {
        "MeteoraDlmm"
    }

    async fn fetch_pairs(&self) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/pair/all", self.base_url);

        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if resp.status() == 429 {
            return Err(SourceError::RateLimit);
        }

        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status().as_u16()));
        }

        let pairs: Vec<Value> = resp
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(pairs)
    }
}
