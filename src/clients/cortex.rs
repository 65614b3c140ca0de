use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{AnalystAnswer, SearchHit};
use crate::infra::http::headers::{add_standard_headers, generate_request_id};
use crate::infra::logging;
use crate::infra::runtime::limits::{make_http_client, retry_async};

/// HTTP client for the Cortex search/analytics backend.
#[derive(Clone)]
pub struct CortexRemote {
    base: String,
    http: Client,
    retries: u32,
}

#[derive(Serialize)]
struct QueryReq<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct SearchWire {
    #[serde(default)]
    results: Vec<SearchHit>,
}

impl CortexRemote {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: make_http_client(),
            retries: 2,
        }
    }

    #[allow(dead_code)]
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base.trim_end_matches('/'));
        let (builder, _rid) = add_standard_headers(self.http.get(url), None);
        match builder.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, String> {
        let wire: SearchWire = self.post_json("/search", query, "cortex_search").await?;
        Ok(wire.results)
    }

    pub async fn analyze(&self, query: &str) -> Result<AnalystAnswer, String> {
        self.post_json("/analyze", query, "cortex_analyst").await
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        surface: &str,
    ) -> Result<T, String> {
        let url = format!("{}{}", self.base.trim_end_matches('/'), path);
        let http = self.http.clone();
        tracing::debug!(endpoint = %url, "cortex backend request");
        let req_id = generate_request_id();
        let start = Instant::now();
        let res: Result<T, String> = retry_async(self.retries, move |_| {
            let http = http.clone();
            let url = url.clone();
            let req_id = req_id.clone();
            let payload = QueryReq { query };
            async move {
                let (builder, _rid) = add_standard_headers(http.post(url), Some(req_id));
                let resp = builder
                    .json(&payload)
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;
                if !resp.status().is_success() {
                    if resp.status().is_server_error() {
                        return Err(format!("retryable status {}", resp.status()));
                    }
                    return Err(format!("upstream status {}", resp.status()));
                }
                resp.json::<T>().await.map_err(|e| e.to_string())
            }
        })
        .await;
        if res.is_err() {
            logging::count(surface, "gateway_backend_error_total");
        }
        logging::observe(
            surface,
            "gateway_backend_latency_ms",
            start.elapsed().as_millis() as f64,
        );
        res
    }
}
