//! lockmenu.rs — self-service menu for locked sessions.
//!
//! Active only while `session_lock` is set. A small explicit state machine:
//! `default → {account_help, billing_help, other_query} → default`. No state
//! accepts free-text chat; `other_query` takes exactly one structured field
//! (a phone number) and hands it to the contact sink. There is no transition
//! out of the locked state anywhere in this module.

use serde::{Deserialize, Serialize};

use crate::contact_log::{ContactRecord, ContactSink};
use crate::error::MenuError;
use crate::session::{LockMenuState, SessionState};

pub const LOCKED_BANNER: &str = "This chat is locked. Please select an option for help:";

pub const ACCOUNT_HELP_INFO: &str = "Here's how to get account help:\n\n\
     - To reset your password, please click 'Forgot Password' on the login page.\n\n\
     - To delete your account, go to 'Settings > Profile > Delete Account'.";

pub const BILLING_HELP_INFO: &str = "For Billing Inquiries:\n\n\
     Please email our support team directly at billing@bettrrme.ai with your account details.";

pub const OTHER_QUERY_PROMPT: &str =
    "Please provide your contact details, and a human agent will get in touch.";

pub const CONTACT_LOGGED: &str =
    "Thank you! Your details are logged. An agent will contact you shortly.";

/// Menu interactions a locked session accepts. Free-text chat is not one of
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MenuEvent {
    AccountHelp,
    BillingHelp,
    OtherQuery,
    Back,
    SubmitContact { phone_number: String },
}

/// Apply one menu event to a locked session.
///
/// Returns the text the UI should show. Sub-menu entry returns the sub-menu's
/// info text; `Back` returns the main banner; a successful contact submission
/// logs the record, returns to `default`, and confirms. Any non-empty phone
/// field is accepted as-is; the sink does not deduplicate or normalize. An
/// empty field is a user error that leaves `lock_menu_state` untouched.
pub fn handle_event(
    state: &mut SessionState,
    event: &MenuEvent,
    sink: &dyn ContactSink,
) -> Result<&'static str, MenuError> {
    if !state.session_lock {
        return Err(MenuError::NotLocked);
    }

    match (state.lock_menu_state, event) {
        (LockMenuState::Default, MenuEvent::AccountHelp) => {
            state.lock_menu_state = LockMenuState::AccountHelp;
            Ok(ACCOUNT_HELP_INFO)
        }
        (LockMenuState::Default, MenuEvent::BillingHelp) => {
            state.lock_menu_state = LockMenuState::BillingHelp;
            Ok(BILLING_HELP_INFO)
        }
        (LockMenuState::Default, MenuEvent::OtherQuery) => {
            state.lock_menu_state = LockMenuState::OtherQuery;
            Ok(OTHER_QUERY_PROMPT)
        }
        // Back is available from every sub-menu and has no other side effects.
        (_, MenuEvent::Back) => {
            state.lock_menu_state = LockMenuState::Default;
            Ok(LOCKED_BANNER)
        }
        (LockMenuState::OtherQuery, MenuEvent::SubmitContact { phone_number }) => {
            let phone = phone_number.trim();
            if phone.is_empty() {
                return Err(MenuError::EmptyPhoneNumber);
            }
            sink.append(&ContactRecord::now(phone))?;
            state.lock_menu_state = LockMenuState::Default;
            Ok(CONTACT_LOGGED)
        }
        (current, _) => Err(MenuError::InvalidTransition {
            state: state_name(current),
        }),
    }
}

fn state_name(s: LockMenuState) -> &'static str {
    match s {
        LockMenuState::Default => "default",
        LockMenuState::AccountHelp => "account_help",
        LockMenuState::BillingHelp => "billing_help",
        LockMenuState::OtherQuery => "other_query",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact_log::MemoryContactSink;

    fn locked_session() -> SessionState {
        let mut s = SessionState::new();
        s.session_lock = true;
        s
    }

    #[test]
    fn menu_rejects_unlocked_sessions() {
        let mut s = SessionState::new();
        let sink = MemoryContactSink::new();
        let err = handle_event(&mut s, &MenuEvent::AccountHelp, &sink).unwrap_err();
        assert!(matches!(err, MenuError::NotLocked));
        assert_eq!(s.lock_menu_state, LockMenuState::Default);
    }

    #[test]
    fn submenu_roundtrip_returns_to_default() {
        let mut s = locked_session();
        let sink = MemoryContactSink::new();

        let info = handle_event(&mut s, &MenuEvent::BillingHelp, &sink).unwrap();
        assert_eq!(info, BILLING_HELP_INFO);
        assert_eq!(s.lock_menu_state, LockMenuState::BillingHelp);

        let banner = handle_event(&mut s, &MenuEvent::Back, &sink).unwrap();
        assert_eq!(banner, LOCKED_BANNER);
        assert_eq!(s.lock_menu_state, LockMenuState::Default);
    }

    #[test]
    fn empty_phone_is_a_user_error_without_state_change() {
        let mut s = locked_session();
        let sink = MemoryContactSink::new();
        handle_event(&mut s, &MenuEvent::OtherQuery, &sink).unwrap();

        let err = handle_event(
            &mut s,
            &MenuEvent::SubmitContact {
                phone_number: "   ".to_string(),
            },
            &sink,
        )
        .unwrap_err();
        assert!(matches!(err, MenuError::EmptyPhoneNumber));
        assert_eq!(s.lock_menu_state, LockMenuState::OtherQuery);
        assert!(sink.snapshot().is_empty());
    }

    #[test]
    fn valid_submission_logs_and_resets_menu() {
        let mut s = locked_session();
        let sink = MemoryContactSink::new();
        handle_event(&mut s, &MenuEvent::OtherQuery, &sink).unwrap();

        let msg = handle_event(
            &mut s,
            &MenuEvent::SubmitContact {
                phone_number: "+420 777 123 456".to_string(),
            },
            &sink,
        )
        .unwrap();
        assert_eq!(msg, CONTACT_LOGGED);
        assert_eq!(s.lock_menu_state, LockMenuState::Default);

        let entries = sink.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].phone_number, "+420 777 123 456");
    }

    #[test]
    fn submit_outside_other_query_is_invalid() {
        let mut s = locked_session();
        let sink = MemoryContactSink::new();
        let err = handle_event(
            &mut s,
            &MenuEvent::SubmitContact {
                phone_number: "5550100123".to_string(),
            },
            &sink,
        )
        .unwrap_err();
        assert!(matches!(err, MenuError::InvalidTransition { state: "default" }));
        assert!(sink.snapshot().is_empty());
    }

    #[test]
    fn any_non_empty_submission_is_logged_as_given() {
        let mut s = locked_session();
        let sink = MemoryContactSink::new();
        handle_event(&mut s, &MenuEvent::OtherQuery, &sink).unwrap();

        // The sink takes entries as they arrive; there is no shape gate.
        let msg = handle_event(
            &mut s,
            &MenuEvent::SubmitContact {
                phone_number: "call me maybe".to_string(),
            },
            &sink,
        )
        .unwrap();
        assert_eq!(msg, CONTACT_LOGGED);
        assert_eq!(s.lock_menu_state, LockMenuState::Default);

        let entries = sink.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].phone_number, "call me maybe");
    }
}
