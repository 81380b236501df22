//! Answer generator (OpenAI-style chat completions).
//!
//! Carries the support-assistant persona prompt and interpolates the
//! retrieved handbook context plus the user's question. Unlike the
//! classifier and retriever, failures here are hard errors: the caller must
//! never present a fabricated answer as a grounded one.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;

use super::AnswerGenerator;

const PERSONA: &str = "You are 'BetterBot,' a friendly, patient, and empathetic support assistant \
     for BettrMe.AI. Use the following pieces of context from the BettrMe.AI handbook to answer \
     the user's question. If the context doesn't have the answer, just say that you're not sure \
     but you'll do your best to help.";

pub struct OpenAiAnswerGenerator {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiAnswerGenerator {
    pub fn from_config(cfg: &GenerationConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("support-chat-moderator/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        }
    }

    fn user_prompt(query: &str, context: &str) -> String {
        format!(
            "CONTEXT:\n{context}\n\nUSER ASKS:\n{query}\n\nYOUR HELPFUL ANSWER:"
        )
    }
}

#[async_trait]
impl AnswerGenerator for OpenAiAnswerGenerator {
    async fn generate(&self, query: &str, context: &str) -> anyhow::Result<String> {
        if self.api_key.is_empty() {
            anyhow::bail!("missing OPENAI_API_KEY");
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let prompt = Self::user_prompt(query, context);
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: PERSONA,
                },
                Msg {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.2,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("generator returned {}", resp.status());
        }
        let body: Resp = resp.json().await?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.trim())
            .unwrap_or("");
        if content.is_empty() {
            anyhow::bail!("generator returned an empty completion");
        }
        Ok(content.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_interpolates_context_then_question() {
        let p = OpenAiAnswerGenerator::user_prompt("How do I reset?", "Passage A\n\nPassage B");
        let ctx_at = p.find("Passage A").unwrap();
        let q_at = p.find("How do I reset?").unwrap();
        assert!(p.starts_with("CONTEXT:"));
        assert!(ctx_at < q_at, "context must precede the question");
        assert!(p.ends_with("YOUR HELPFUL ANSWER:"));
    }
}
