// tests/router_turns.rs
//
// Routing contract for a single user turn:
// - exactly one assistant transcript entry per processed turn
// - empty retrieval -> fixed off-topic redirect, zero generator calls
// - non-empty retrieval -> exactly one generator call, passages concatenated
// - forgiveness lexicon match wins over retrieval routing
// - generation failure surfaces as an error, no assistant entry

use std::sync::Arc;

use support_chat_moderator::moderation::FORGIVENESS_ACK;
use support_chat_moderator::router::{process_turn, OFF_TOPIC_REDIRECT};
use support_chat_moderator::services::{MarkerClassifier, MockGenerator, MockRetriever, Services};
use support_chat_moderator::session::{Role, SessionState};
use support_chat_moderator::TurnError;

fn services_with(passages: Vec<&str>, generator: Arc<MockGenerator>) -> Services {
    Services {
        toxicity: Arc::new(MarkerClassifier::default()),
        retriever: Arc::new(MockRetriever {
            passages: passages.into_iter().map(String::from).collect(),
        }),
        generator,
    }
}

#[tokio::test]
async fn grounded_turn_appends_exactly_one_reply() {
    let generator = Arc::new(MockGenerator::replying("Resetting works like this."));
    let services = services_with(vec!["Password reset passage."], generator.clone());
    let mut s = SessionState::new();
    let before = s.transcript.len();

    let reply = process_turn(&mut s, "How do I reset my password?", &services)
        .await
        .unwrap();

    assert_eq!(reply, "Resetting works like this.");
    assert_eq!(s.transcript.len(), before + 2); // user + assistant
    let assistants = s
        .transcript
        .iter()
        .skip(before)
        .filter(|e| e.role == Role::Assistant)
        .count();
    assert_eq!(assistants, 1);
}

#[tokio::test]
async fn empty_retrieval_redirects_without_calling_generator() {
    let generator = Arc::new(MockGenerator::replying("should never appear"));
    let services = services_with(vec![], generator.clone());
    let mut s = SessionState::new();

    let reply = process_turn(&mut s, "What's the weather?", &services)
        .await
        .unwrap();

    assert_eq!(reply, OFF_TOPIC_REDIRECT);
    assert!(generator.calls().is_empty(), "off-topic must not generate");
}

#[tokio::test]
async fn grounded_turn_concatenates_all_passages() {
    let generator = Arc::new(MockGenerator::replying("ok"));
    let services = services_with(vec!["First passage.", "Second passage."], generator.clone());
    let mut s = SessionState::new();

    process_turn(&mut s, "Tell me about billing", &services)
        .await
        .unwrap();

    let calls = generator.calls();
    assert_eq!(calls.len(), 1, "exactly one generator invocation");
    assert_eq!(calls[0].0, "Tell me about billing");
    assert_eq!(calls[0].1, "First passage.\n\nSecond passage.");
}

#[tokio::test]
async fn forgiveness_cue_beats_retrieval() {
    let generator = Arc::new(MockGenerator::replying("grounded answer"));
    // The retriever would happily ground this message; the lexicon must win.
    let services = services_with(vec!["A matching passage."], generator.clone());
    let mut s = SessionState::new();
    s.strike_count = 2;

    let reply = process_turn(&mut s, "sorry about the account question", &services)
        .await
        .unwrap();

    assert_eq!(reply, FORGIVENESS_ACK);
    assert_eq!(s.strike_count, 0);
    assert!(s.has_been_forgiven);
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn generation_failure_surfaces_and_leaves_no_reply() {
    let generator = Arc::new(MockGenerator::failing());
    let services = services_with(vec!["A passage."], generator.clone());
    let mut s = SessionState::new();
    let before = s.transcript.len();

    let err = process_turn(&mut s, "grounded question", &services)
        .await
        .unwrap_err();

    assert!(matches!(err, TurnError::Generation(_)));
    // The user message was taken, but no fabricated assistant reply exists.
    assert_eq!(s.transcript.len(), before + 1);
    assert_eq!(s.transcript.last().unwrap().role, Role::User);
}
