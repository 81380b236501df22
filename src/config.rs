// src/config.rs
//! Service configuration loaded from `config/services.json`.
//!
//! Every section has sensible defaults so a missing or partial file still
//! yields a runnable config. API keys use the `"ENV"` indirection: the
//! literal value `ENV` means "read the provider's environment variable".

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const DEFAULT_CONFIG_PATH: &str = "config/services.json";

fn default_true() -> bool {
    true
}
fn default_toxicity_model() -> String {
    "unitary/toxic-bert".to_string()
}
fn default_threshold() -> f32 {
    0.8
}
fn default_env() -> String {
    "ENV".to_string()
}
fn default_retrieval_url() -> String {
    "http://127.0.0.1:8900".to_string()
}
fn default_top_k() -> u32 {
    4
}
fn default_generation_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToxicityConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_toxicity_model")]
    pub model: String,
    /// Toxic-label confidence above this is a toxic verdict. Clamped to 0..=1.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// "ENV" means: read from HF_API_KEY.
    #[serde(default = "default_env")]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_retrieval_url")]
    pub base_url: String,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// "ENV" means: read from OPENAI_API_KEY.
    #[serde(default = "default_env")]
    pub api_key: String,
}

impl Default for ToxicityConfig {
    fn default() -> Self {
        serde_json::from_str("{}").expect("defaults")
    }
}
impl Default for RetrievalConfig {
    fn default() -> Self {
        serde_json::from_str("{}").expect("defaults")
    }
}
impl Default for GenerationConfig {
    fn default() -> Self {
        serde_json::from_str("{}").expect("defaults")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub toxicity: ToxicityConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl ServicesConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: ServicesConfig = serde_json::from_str(&data)?;
        cfg.resolve_keys();
        cfg.sanitize();
        Ok(cfg)
    }

    /// Defaults plus key resolution; used when no config file exists.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.resolve_keys();
        cfg.sanitize();
        cfg
    }

    /// Replace `"ENV"` placeholders with the corresponding environment
    /// variables. A missing variable leaves the key empty: the toxicity
    /// client fails open without one, the generator errors at call time.
    fn resolve_keys(&mut self) {
        if self.toxicity.api_key.trim().eq_ignore_ascii_case("env") {
            self.toxicity.api_key = env::var("HF_API_KEY").unwrap_or_else(|_| {
                tracing::warn!("HF_API_KEY not set; toxicity moderation will fail open");
                String::new()
            });
        }
        if self.generation.api_key.trim().eq_ignore_ascii_case("env") {
            self.generation.api_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
                tracing::warn!("OPENAI_API_KEY not set; grounded answers will fail");
                String::new()
            });
        }
    }

    fn sanitize(&mut self) {
        if !(0.0..=1.0).contains(&self.toxicity.threshold) {
            self.toxicity.threshold = default_threshold();
        }
        if self.retrieval.top_k == 0 {
            self.retrieval.top_k = default_top_k();
        }
    }
}
