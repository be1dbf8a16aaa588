//! Event normalization
//!
//! Maps raw client events onto the handful of state-transition intents the
//! adapter reacts to. Pure mapping, no side effects.

use authgate_domain::{
    AccountInfo, EventMessage, EventPayload, EventType, InteractionType, TokenBundle,
};

/// State-transition intent derived from a raw client event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateIntent {
    /// The client's account cache may differ from the published list.
    AccountsMayHaveChanged,
    /// The interaction status may need to move.
    StatusMayHaveChanged,
    /// A login completed. Tokens are present when the payload carried a
    /// full authentication result.
    LoginSucceeded { account: Option<AccountInfo>, tokens: Option<TokenBundle> },
    /// A token acquisition completed with an authentication result.
    TokenAcquired { account: Option<AccountInfo>, tokens: TokenBundle },
    /// A logout finished, in the given interaction style.
    LogoutEnded(Option<InteractionType>),
}

/// Classify a raw event.
///
/// Unknown event types yield nothing. Known events without a dedicated row
/// only ask for a status re-evaluation.
#[must_use]
pub fn normalize(message: &EventMessage) -> Vec<StateIntent> {
    use StateIntent::{AccountsMayHaveChanged, StatusMayHaveChanged};

    match &message.event_type {
        EventType::LoginSuccess => {
            let result = message.authentication_result();
            vec![
                AccountsMayHaveChanged,
                StatusMayHaveChanged,
                StateIntent::LoginSucceeded {
                    account: payload_account(message),
                    tokens: result.map(TokenBundle::from),
                },
            ]
        }
        EventType::AcquireTokenSuccess => {
            let mut intents = vec![AccountsMayHaveChanged, StatusMayHaveChanged];
            if let Some(result) = message.authentication_result() {
                intents.push(StateIntent::TokenAcquired {
                    account: result.account.clone(),
                    tokens: TokenBundle::from(result),
                });
            }
            intents
        }
        EventType::AccountAdded | EventType::AccountRemoved => vec![AccountsMayHaveChanged],
        EventType::LoginFailure | EventType::SsoSilentFailure | EventType::AcquireTokenFailure => {
            vec![StatusMayHaveChanged]
        }
        EventType::HandleRedirectEnd => vec![AccountsMayHaveChanged, StatusMayHaveChanged],
        EventType::LogoutEnd => vec![
            AccountsMayHaveChanged,
            StatusMayHaveChanged,
            StateIntent::LogoutEnded(message.interaction_type),
        ],
        EventType::Unknown(_) => Vec::new(),
        _ => vec![StatusMayHaveChanged],
    }
}

/// Account carried by the payload, whichever payload shape it is.
fn payload_account(message: &EventMessage) -> Option<AccountInfo> {
    match &message.payload {
        Some(EventPayload::Authentication(result)) => result.account.clone(),
        Some(EventPayload::Account(account)) => Some(account.clone()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authgate_domain::AuthenticationResult;

    fn alice() -> AccountInfo {
        AccountInfo::new("h1", "l1", "alice@example.com")
    }

    #[test]
    fn test_login_success_carries_account_and_tokens() {
        let result = AuthenticationResult::new(Some(alice()), "id", "access", vec!["openid".into()]);
        let message = EventMessage::new(EventType::LoginSuccess)
            .with_interaction(InteractionType::Popup)
            .with_result(result);

        let intents = normalize(&message);
        assert_eq!(intents.len(), 3);
        assert_eq!(intents[0], StateIntent::AccountsMayHaveChanged);
        assert_eq!(intents[1], StateIntent::StatusMayHaveChanged);
        match &intents[2] {
            StateIntent::LoginSucceeded { account, tokens } => {
                assert_eq!(account.as_ref().map(|a| a.username.as_str()), Some("alice@example.com"));
                assert_eq!(tokens.as_ref().map(|t| t.id_token.as_str()), Some("id"));
            }
            other => panic!("unexpected intent {other:?}"),
        }
    }

    #[test]
    fn test_login_success_without_payload() {
        let intents = normalize(&EventMessage::new(EventType::LoginSuccess));
        assert_eq!(
            intents[2],
            StateIntent::LoginSucceeded { account: None, tokens: None }
        );
    }

    #[test]
    fn test_acquire_token_success_without_result_skips_token_intent() {
        let intents = normalize(&EventMessage::new(EventType::AcquireTokenSuccess));
        assert_eq!(
            intents,
            vec![StateIntent::AccountsMayHaveChanged, StateIntent::StatusMayHaveChanged]
        );
    }

    #[test]
    fn test_table_rows() {
        assert_eq!(
            normalize(&EventMessage::new(EventType::AccountAdded)),
            vec![StateIntent::AccountsMayHaveChanged]
        );
        assert_eq!(
            normalize(&EventMessage::new(EventType::AccountRemoved)),
            vec![StateIntent::AccountsMayHaveChanged]
        );
        for failure in
            [EventType::LoginFailure, EventType::SsoSilentFailure, EventType::AcquireTokenFailure]
        {
            assert_eq!(normalize(&EventMessage::new(failure)), vec![StateIntent::StatusMayHaveChanged]);
        }
        assert_eq!(
            normalize(&EventMessage::new(EventType::HandleRedirectEnd)),
            vec![StateIntent::AccountsMayHaveChanged, StateIntent::StatusMayHaveChanged]
        );
    }

    #[test]
    fn test_logout_end_keeps_interaction_type() {
        let message = EventMessage::new(EventType::LogoutEnd).with_interaction(InteractionType::Popup);
        assert_eq!(
            normalize(&message).last(),
            Some(&StateIntent::LogoutEnded(Some(InteractionType::Popup)))
        );
    }

    #[test]
    fn test_other_known_events_only_touch_status() {
        for event_type in [EventType::LoginStart, EventType::InitializeEnd, EventType::PopupOpened] {
            assert_eq!(normalize(&EventMessage::new(event_type)), vec![StateIntent::StatusMayHaveChanged]);
        }
    }

    #[test]
    fn test_unknown_events_are_ignored() {
        let message = EventMessage::new(EventType::from("msal:brokerConnectionEstablished"));
        assert!(normalize(&message).is_empty());
    }
}
