// src/retrieval/providers/http.rs
use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::{Client, Url};

use crate::retrieval::normalize::normalize_body;
use crate::retrieval::types::{OpportunityProvider, OpportunityRecord};
use crate::retrieval::{ensure_metrics_described, RetrievalError};

/// Remote data provider: `GET {base}/opportunities?product={category}`.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    endpoint: Url,
    client: Client,
}

impl HttpProvider {
    pub fn new(base_url: &str) -> Result<Self, RetrievalError> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, RetrievalError> {
        let endpoint = opportunities_endpoint(base_url)?;
        Ok(Self { endpoint, client })
    }

    /// Request URL for `category`; the name is form-escaped verbatim.
    pub fn request_url(&self, category: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("product", category);
        url
    }
}

fn opportunities_endpoint(base_url: &str) -> Result<Url, RetrievalError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}/opportunities"))
        .map_err(|e| RetrievalError::InvalidUrl(format!("{base_url}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RetrievalError::InvalidUrl(format!(
            "{base_url}: unsupported scheme `{other}`"
        ))),
    }
}

#[async_trait]
impl OpportunityProvider for HttpProvider {
    async fn fetch_opportunities(
        &self,
        category: &str,
    ) -> Result<Vec<OpportunityRecord>, RetrievalError> {
        ensure_metrics_described();
        let t0 = std::time::Instant::now();
        let url = self.request_url(category);

        let resp = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(error = %e, provider = "http", category, "provider unreachable");
            RetrievalError::Transport(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let records = normalize_body(&body)?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("scout_fetch_ms").record(ms);
        counter!("scout_fetch_records_total").increment(records.len() as u64);
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
