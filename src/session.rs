//! session.rs — per-conversation moderation state and transcript.
//!
//! One `SessionState` per conversation, created at the first turn and dropped
//! when the conversation ends. All moderation bookkeeping lives here; policy
//! functions take it by `&mut` so they stay testable without any UI or server.

use serde::{Deserialize, Serialize};

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One line of the conversation. Insertion order is significant; the
/// transcript is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

/// Sub-menu position while a session is locked. Meaningful only when
/// `session_lock` is set; `Default` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMenuState {
    #[default]
    Default,
    AccountHelp,
    BillingHelp,
    OtherQuery,
}

pub const GREETING: &str = "Hello! I am your AI assistant. How can I help you today?";

/// Mutable per-conversation record threaded through the router and policy.
///
/// Invariants (enforced by the policy/router/menu modules, not by setters):
/// - `strike_count` only increases on the abusive path and only resets to 0
///   via forgiveness; it is frozen once `session_lock` is set.
/// - `has_been_forgiven` and `session_lock` are sticky once true.
/// - `lock_menu_state != Default` only while `session_lock` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub transcript: Vec<TranscriptEntry>,
    pub strike_count: u8,
    pub has_been_forgiven: bool,
    pub session_lock: bool,
    pub lock_menu_state: LockMenuState,
}

impl SessionState {
    /// Fresh session with the assistant greeting already on the transcript.
    pub fn new() -> Self {
        Self {
            transcript: vec![TranscriptEntry {
                role: Role::Assistant,
                content: GREETING.to_string(),
            }],
            strike_count: 0,
            has_been_forgiven: false,
            session_lock: false,
            lock_menu_state: LockMenuState::Default,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            role: Role::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    /// Last assistant line, if any. Convenience for tests and API responses.
    pub fn last_assistant(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|e| e.role == Role::Assistant)
            .map(|e| e.content.as_str())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
