//! # Moderation Policy
//! Pure, testable logic that maps `(session, toxic message)` → `(next state,
//! canned response)`. No I/O, suitable for unit tests and offline evaluation.
//!
//! Policy: a five-strike escalation ladder with an orthogonal probation
//! override. A session that has already been forgiven locks on the very next
//! offense regardless of its strike count. The ladder itself is a declarative
//! rung table so the bucket boundaries (0, 1, 2..=4, >=5) live in one place.

use crate::session::SessionState;

pub const FIRST_NUDGE: &str = "I understand you're frustrated, but I'm not able to process that \
     kind of language. 😥 Could you please rephrase your question? \
     I'm here to help with BettrMe.AI.";

pub const SECOND_NUDGE: &str = "I'm sorry, but I'm still unable to help when that language is used \
     due to my programming. I'd really like to resolve your issue. \
     How can I help with your BettrMe.AI account?";

pub const REPEATED_WARNING: &str = "I apologize, but I'm not programmed to engage with that \
     level of abusive language. I am still here to help with BettrMe.AI. \
     If you'd like to continue, please let me know what I can assist you with.";

pub const FINAL_WARNING: &str = "I've given several warnings, and I'm still unable to help. \
     For your security and mine, I am locking this chat. \
     Please select one of the options above to get the help you need.";

pub const PROBATION_LOCK: &str = "I apologize, but I'm not programmed to engage with that \
     level of abusive language. I am locking this chat. \
     Please select one of the options above to get the help you need.";

pub const FORGIVENESS_ACK: &str =
    "Thank you, I appreciate that. How can I help you with BettrMe.AI?";

/// One rung of the escalation ladder: an inclusive strike-count bucket, the
/// canned response for that bucket, and whether reaching it locks the session.
struct StrikeRung {
    min: u8,
    max: u8,
    response: &'static str,
    locks: bool,
}

/// Bucket boundaries as a single declarative artifact. Locking rungs freeze
/// the strike count; non-locking rungs increment it by exactly one.
const LADDER: &[StrikeRung] = &[
    StrikeRung {
        min: 0,
        max: 0,
        response: FIRST_NUDGE,
        locks: false,
    },
    StrikeRung {
        min: 1,
        max: 1,
        response: SECOND_NUDGE,
        locks: false,
    },
    StrikeRung {
        min: 2,
        max: 4,
        response: REPEATED_WARNING,
        locks: false,
    },
    StrikeRung {
        min: 5,
        max: u8::MAX,
        response: FINAL_WARNING,
        locks: true,
    },
];

/// Apply the moderation policy to one toxic user turn.
///
/// Precedence: the probation override first (forgiveness revokes leniency
/// entirely, the ladder is bypassed and the strike count stays frozen), then
/// the rung matching the current strike count. Must be called exactly once
/// per toxic turn; the router is the only caller.
pub fn moderate(state: &mut SessionState) -> &'static str {
    if state.has_been_forgiven {
        state.session_lock = true;
        tracing::info!(strike_count = state.strike_count, "probation breach, session locked");
        return PROBATION_LOCK;
    }

    let rung = LADDER
        .iter()
        .find(|r| (r.min..=r.max).contains(&state.strike_count))
        .unwrap_or(&LADDER[LADDER.len() - 1]);

    if rung.locks {
        state.session_lock = true;
        tracing::info!(strike_count = state.strike_count, "strike ladder exhausted, session locked");
    } else {
        state.strike_count += 1;
    }
    rung.response
}

/// Fixed apology lexicon. Matching is a case-insensitive substring check, an
/// accepted heuristic rather than an intent match ("fine, whatever" counts).
pub const FORGIVENESS_LEXICON: &[&str] =
    &["sorry", "sry", "my apologies", "my bad", "okay", "aight", "fine"];

/// True when the message contains any forgiveness cue.
pub fn contains_forgiveness_cue(text: &str) -> bool {
    let lower = text.to_lowercase();
    FORGIVENESS_LEXICON.iter().any(|cue| lower.contains(cue))
}

/// Accept an apology: reset the ladder, flag the session as on probation.
/// The probation flag is sticky for the rest of the session.
pub fn forgive(state: &mut SessionState) -> &'static str {
    state.strike_count = 0;
    state.has_been_forgiven = true;
    FORGIVENESS_ACK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_yields_five_responses_then_locks() {
        let mut s = SessionState::new();
        let expected = [
            FIRST_NUDGE,
            SECOND_NUDGE,
            REPEATED_WARNING,
            REPEATED_WARNING,
            REPEATED_WARNING,
        ];
        for (i, want) in expected.iter().enumerate() {
            let got = moderate(&mut s);
            assert_eq!(got, *want, "response {} of the ladder", i + 1);
            assert_eq!(s.strike_count, (i + 1) as u8);
            assert!(!s.session_lock);
        }
        // Sixth offense hits the locking rung; the count stays frozen.
        let got = moderate(&mut s);
        assert_eq!(got, FINAL_WARNING);
        assert!(s.session_lock);
        assert_eq!(s.strike_count, 5);
    }

    #[test]
    fn probation_locks_immediately_even_at_zero_strikes() {
        let mut s = SessionState::new();
        s.has_been_forgiven = true;
        let got = moderate(&mut s);
        assert_eq!(got, PROBATION_LOCK);
        assert!(s.session_lock);
        // Override path freezes the count.
        assert_eq!(s.strike_count, 0);
    }

    #[test]
    fn forgive_resets_ladder_and_sets_sticky_flag() {
        let mut s = SessionState::new();
        s.strike_count = 3;
        let got = forgive(&mut s);
        assert_eq!(got, FORGIVENESS_ACK);
        assert_eq!(s.strike_count, 0);
        assert!(s.has_been_forgiven);
    }

    #[test]
    fn lexicon_matches_are_case_insensitive_substrings() {
        assert!(contains_forgiveness_cue("I'm SORRY about that"));
        assert!(contains_forgiveness_cue("my bad, won't happen again"));
        assert!(contains_forgiveness_cue("fine, whatever")); // accepted false positive
        assert!(!contains_forgiveness_cue("what's the weather like?"));
    }
}
