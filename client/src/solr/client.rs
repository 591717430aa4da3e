//! HTTP transport to the engine's select endpoint.

use std::time::Duration;

use common::query_spec::QuerySpec;
use tracing::{debug, warn};

use crate::solr::response::SolrResponse;


/// Transport seam for the select endpoint. The orchestrator is generic
/// over this so tests can substitute a canned backend.
pub trait SolrApi {
    fn select(
        &self,
        url: &str,
        spec: &QuerySpec,
    ) -> impl Future<Output = anyhow::Result<SolrResponse>> + Send;
}


const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// reqwest-backed transport with bounded retry and doubling backoff.
#[derive(Debug, Clone)]
pub struct HttpSolrClient {
    http: reqwest::Client,
    attempts: u32,
}

impl HttpSolrClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            attempts: RETRY_ATTEMPTS,
        }
    }

    async fn try_select(&self, url: &str, params: &[(String, String)]) -> anyhow::Result<SolrResponse> {
        let response = self.http.get(url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_client_error() || status.is_server_error() {
            anyhow::bail!("select failed: {}: {}", status, body);
        }
        debug!("select response: len = {}", body.len());
        let parsed: SolrResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

impl Default for HttpSolrClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SolrApi for HttpSolrClient {
    async fn select(&self, url: &str, spec: &QuerySpec) -> anyhow::Result<SolrResponse> {
        let params = spec.to_params();
        let mut delay = RETRY_BASE_DELAY;
        let mut last_err = anyhow::anyhow!("select never attempted");
        for attempt in 0..self.attempts {
            if attempt > 0 {
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            match self.try_select(url, &params).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    warn!("select attempt {} of {} failed: {err:#}", attempt + 1, self.attempts);
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }
}
