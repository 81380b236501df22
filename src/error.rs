//! error.rs — failure taxonomy for turn processing and the lock menu.
//!
//! Classifier unavailability is deliberately absent: the toxicity client
//! degrades to non-toxic on its own (fail-open) so an outage never aborts a
//! turn. Empty retrieval is likewise a valid result, not an error.

use thiserror::Error;

/// Failures surfaced by `router::process_turn`.
#[derive(Debug, Error)]
pub enum TurnError {
    /// Free-text routing is disabled once a session locks; the caller should
    /// be driving the lock menu instead.
    #[error("session is locked; only menu interactions are available")]
    SessionLocked,

    /// The answer generator failed. Propagated rather than papered over with
    /// a canned reply, so fabricated answers are never presented as grounded.
    #[error("answer generation failed: {0}")]
    Generation(#[source] anyhow::Error),
}

/// Failures surfaced by `lockmenu::handle_event`.
#[derive(Debug, Error)]
pub enum MenuError {
    /// The menu only exists for locked sessions.
    #[error("session is not locked; the menu is unavailable")]
    NotLocked,

    /// The requested event does not apply in the current menu state.
    #[error("menu event not available from state '{state}'")]
    InvalidTransition { state: &'static str },

    /// Empty required field on contact submission. No state change. Any
    /// non-empty value is accepted as-is; the sink does not validate shapes.
    #[error("please enter a phone number")]
    EmptyPhoneNumber,

    /// The contact sink could not record the request.
    #[error("failed to record contact request: {0}")]
    ContactLog(#[from] std::io::Error),
}
