// src/services/mod.rs
//! External collaborator contracts: toxicity classification, passage
//! retrieval, and answer generation. The core only ever sees these traits;
//! HTTP providers and deterministic mocks both live behind them.

pub mod generation;
pub mod retrieval;
pub mod toxicity;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::ServicesConfig;

pub use generation::OpenAiAnswerGenerator;
pub use retrieval::HttpPassageRetriever;
pub use toxicity::HfToxicityClassifier;

/// Toxic/non-toxic verdict for a text span. Implementations must fail open:
/// a service error degrades to `false` so the turn continues down the safe
/// path rather than aborting.
#[async_trait]
pub trait ToxicityClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> bool;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

/// Grounding lookup. Returns passages in ranked order; empty on no match or
/// on any service error.
#[async_trait]
pub trait PassageRetriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Vec<String>;
    fn provider_name(&self) -> &'static str;
}

/// Natural-language answer generation over a query plus grounding context.
/// Failures are hard errors; no canned fallback here.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, query: &str, context: &str) -> anyhow::Result<String>;
    fn provider_name(&self) -> &'static str;
}

pub type DynToxicity = Arc<dyn ToxicityClassifier>;
pub type DynRetriever = Arc<dyn PassageRetriever>;
pub type DynGenerator = Arc<dyn AnswerGenerator>;

/// The three collaborators bundled for the router and API state.
#[derive(Clone)]
pub struct Services {
    pub toxicity: DynToxicity,
    pub retriever: DynRetriever,
    pub generator: DynGenerator,
}

impl Services {
    /// Factory: build clients according to config and environment.
    ///
    /// * If `AI_TEST_MODE=mock`, returns deterministic mock clients.
    /// * Else builds the real HTTP providers from the config sections.
    pub fn from_config(config: &ServicesConfig) -> Self {
        if std::env::var("AI_TEST_MODE")
            .map(|v| v == "mock")
            .unwrap_or(false)
        {
            return Self::mocked();
        }

        let toxicity: DynToxicity = if config.toxicity.enabled {
            Arc::new(HfToxicityClassifier::from_config(&config.toxicity))
        } else {
            Arc::new(DisabledClassifier)
        };

        Self {
            toxicity,
            retriever: Arc::new(HttpPassageRetriever::from_config(&config.retrieval)),
            generator: Arc::new(OpenAiAnswerGenerator::from_config(&config.generation)),
        }
    }

    /// Fully mocked bundle for local runs and tests: toxicity keyed on a
    /// marker substring, one fixed passage, a fixed generated reply.
    pub fn mocked() -> Self {
        Self {
            toxicity: Arc::new(MarkerClassifier::default()),
            retriever: Arc::new(MockRetriever {
                passages: vec!["BettrMe.AI mock handbook passage.".to_string()],
            }),
            generator: Arc::new(MockGenerator::replying("(mock) Here is what the handbook says.")),
        }
    }
}

/// Never flags anything; used when moderation is switched off in config.
pub struct DisabledClassifier;

#[async_trait]
impl ToxicityClassifier for DisabledClassifier {
    async fn classify(&self, _text: &str) -> bool {
        false
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

// ------------------------------------------------------------
// Deterministic mocks (used by tests and AI_TEST_MODE=mock)
// ------------------------------------------------------------

/// Flags any message containing the marker substring; everything else is
/// clean. Keeps moderation flows reproducible without a hosted model.
pub struct MarkerClassifier {
    pub marker: String,
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self {
            marker: "[toxic]".to_string(),
        }
    }
}

#[async_trait]
impl ToxicityClassifier for MarkerClassifier {
    async fn classify(&self, text: &str) -> bool {
        text.contains(&self.marker)
    }
    fn provider_name(&self) -> &'static str {
        "marker"
    }
}

/// Returns a fixed passage list for every query.
pub struct MockRetriever {
    pub passages: Vec<String>,
}

#[async_trait]
impl PassageRetriever for MockRetriever {
    async fn retrieve(&self, _query: &str) -> Vec<String> {
        self.passages.clone()
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Fixed reply or forced failure; records every call so tests can assert on
/// invocation count and the exact grounding context passed in.
pub struct MockGenerator {
    pub reply: String,
    pub fail: bool,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl MockGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Recorded `(query, context)` pairs, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("mock generator mutex poisoned").clone()
    }
}

#[async_trait]
impl AnswerGenerator for MockGenerator {
    async fn generate(&self, query: &str, context: &str) -> anyhow::Result<String> {
        self.calls
            .lock()
            .expect("mock generator mutex poisoned")
            .push((query.to_string(), context.to_string()));
        if self.fail {
            anyhow::bail!("mock generator configured to fail");
        }
        Ok(self.reply.clone())
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
