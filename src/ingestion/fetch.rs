//! Fetch functions - retrieve raw comp records from a comparables API

use crate::ingestion::types::RawComp;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::info;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for a comparable-sales API. Endpoint and credentials are
/// supplied at construction; nothing is read from global state.
#[derive(Debug, Clone)]
pub struct CompsClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CompsClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(CompsClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn comps_url(&self) -> String {
        format!("{}/comparables", self.base_url)
    }

    /// Fetch recent sales near `address` as unvalidated records
    pub async fn fetch_comps(
        &self,
        address: &str,
        radius_miles: f64,
        limit: usize,
    ) -> Result<Vec<RawComp>> {
        let url = self.comps_url();
        info!("Fetching comps for {} within {} miles", address, radius_miles);

        let mut request = self.http.get(&url).query(&[
            ("address", address.to_string()),
            ("radius", radius_miles.to_string()),
            ("limit", limit.to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;
        let status = response.status();

        if !status.is_success() {
            return Err(anyhow!("Comps request failed: {}", status));
        }

        let comps: Vec<RawComp> = response
            .json()
            .await
            .context("Comps response was not a JSON array of records")?;

        info!("Fetched {} raw comps", comps.len());
        Ok(comps)
    }
}
