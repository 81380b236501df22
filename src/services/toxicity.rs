//! Hosted toxicity classifier (Hugging Face inference API).
//!
//! The verdict is thresholded here: toxic iff the `toxic` label's confidence
//! exceeds the configured threshold. Every failure path — missing key,
//! transport error, non-2xx, undecodable body — degrades to non-toxic so an
//! outage never aborts a turn. Documented risk: a real outage silently
//! disables moderation; we log a warning each time it happens.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ToxicityConfig;

use super::ToxicityClassifier;

pub struct HfToxicityClassifier {
    http: reqwest::Client,
    api_key: String,
    model: String,
    threshold: f32,
}

impl HfToxicityClassifier {
    pub fn from_config(cfg: &ToxicityConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("support-chat-moderator/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            threshold: cfg.threshold,
        }
    }

    async fn classify_impl(&self, text: &str) -> anyhow::Result<bool> {
        if self.api_key.is_empty() {
            anyhow::bail!("no API key configured");
        }

        #[derive(Deserialize)]
        struct Label {
            label: String,
            score: f32,
        }

        let url = format!("https://api-inference.huggingface.co/models/{}", self.model);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("classifier returned {}", resp.status());
        }

        // The classification endpoint wraps labels in one array per input.
        let body: Vec<Vec<Label>> = resp.json().await?;
        let toxic = body
            .iter()
            .flatten()
            .any(|l| l.label == "toxic" && l.score > self.threshold);
        Ok(toxic)
    }
}

#[async_trait]
impl ToxicityClassifier for HfToxicityClassifier {
    async fn classify(&self, text: &str) -> bool {
        match self.classify_impl(text).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(
                    provider = self.provider_name(),
                    error = %e,
                    "toxicity classifier unavailable, treating message as non-toxic"
                );
                false
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "huggingface"
    }
}
