//! # Response Router
//! Orchestrates one user turn into exactly one assistant reply.
//!
//! Branch order per turn: toxicity check → moderation policy on a toxic
//! verdict; otherwise forgiveness-lexicon check → retrieval → either grounded
//! generation or the fixed off-topic redirect. Each moderation field is
//! mutated at most once per turn, and every processed turn appends exactly
//! one assistant entry to the transcript.

use crate::error::TurnError;
use crate::moderation;
use crate::services::Services;
use crate::session::SessionState;

pub const OFF_TOPIC_REDIRECT: &str = "I'm best at helping with BettrMe.AI questions. \
     How can I help with your account or our services?";

/// Process one user turn against the current session state.
///
/// Locked sessions are rejected up front — those turns belong to the lock
/// menu, not this router. On success the reply has already been appended to
/// the transcript; on generation failure the error is surfaced and no
/// assistant entry is written.
pub async fn process_turn(
    state: &mut SessionState,
    text: &str,
    services: &Services,
) -> Result<String, TurnError> {
    if state.session_lock {
        return Err(TurnError::SessionLocked);
    }

    state.push_user(text);

    let reply = if services.toxicity.classify(text).await {
        moderation::moderate(state).to_string()
    } else if moderation::contains_forgiveness_cue(text) {
        // Lexicon match wins over retrieval: an apology is acknowledged even
        // when the message would also ground a generated answer.
        moderation::forgive(state).to_string()
    } else {
        let passages = services.retriever.retrieve(text).await;
        if passages.is_empty() {
            // No grounding, no generation call. Redirect instead of
            // hallucinating an answer.
            OFF_TOPIC_REDIRECT.to_string()
        } else {
            let context = passages.join("\n\n");
            services
                .generator
                .generate(text, &context)
                .await
                .map_err(TurnError::Generation)?
        }
    };

    state.push_assistant(&reply);
    Ok(reply)
}
