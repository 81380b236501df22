//! Vector-similarity retrieval client.
//!
//! Thin HTTP wrapper over the retrieval service that fronts the offline-built
//! handbook index. The index's internal structure is none of our business;
//! the contract is `query in, ranked passages out`. No match and service
//! error look the same from here: an empty list, which drives the off-topic
//! branch upstream.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::RetrievalConfig;

use super::PassageRetriever;

pub struct HttpPassageRetriever {
    http: reqwest::Client,
    base_url: String,
    top_k: u32,
}

impl HttpPassageRetriever {
    pub fn from_config(cfg: &RetrievalConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("support-chat-moderator/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            top_k: cfg.top_k,
        }
    }

    async fn retrieve_impl(&self, query: &str) -> anyhow::Result<Vec<String>> {
        #[derive(Deserialize)]
        struct Resp {
            passages: Vec<String>,
        }

        let url = format!("{}/query", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "query": query, "top_k": self.top_k }))
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("retriever returned {}", resp.status());
        }
        let body: Resp = resp.json().await?;
        Ok(body.passages)
    }
}

#[async_trait]
impl PassageRetriever for HttpPassageRetriever {
    async fn retrieve(&self, query: &str) -> Vec<String> {
        match self.retrieve_impl(query).await {
            Ok(passages) => passages,
            Err(e) => {
                tracing::warn!(
                    provider = self.provider_name(),
                    error = %e,
                    "retrieval failed, treating as no grounding"
                );
                Vec::new()
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }
}
