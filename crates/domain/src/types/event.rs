//! Raw lifecycle events emitted by the auth client

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::AccountInfo;
use super::auth::AuthenticationResult;
use super::status::InteractionType;
use crate::errors::AuthClientError;

/// Auth-client event types, named after the browser client's `msal:*` wire
/// strings.
///
/// Event names this crate does not know are kept verbatim in `Unknown` so
/// newer clients can be wrapped without breaking deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    InitializeStart,
    InitializeEnd,
    AccountAdded,
    AccountRemoved,
    ActiveAccountChanged,
    LoginStart,
    LoginSuccess,
    LoginFailure,
    AcquireTokenStart,
    AcquireTokenNetworkStart,
    AcquireTokenSuccess,
    AcquireTokenFailure,
    AcquireTokenByCodeStart,
    AcquireTokenByCodeSuccess,
    AcquireTokenByCodeFailure,
    SsoSilentStart,
    SsoSilentSuccess,
    SsoSilentFailure,
    HandleRedirectStart,
    HandleRedirectEnd,
    PopupOpened,
    LogoutStart,
    LogoutSuccess,
    LogoutFailure,
    LogoutEnd,
    RestoreFromBfcache,
    Unknown(String),
}

impl EventType {
    /// Wire name of the event.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InitializeStart => "msal:initializeStart",
            Self::InitializeEnd => "msal:initializeEnd",
            Self::AccountAdded => "msal:accountAdded",
            Self::AccountRemoved => "msal:accountRemoved",
            Self::ActiveAccountChanged => "msal:activeAccountChanged",
            Self::LoginStart => "msal:loginStart",
            Self::LoginSuccess => "msal:loginSuccess",
            Self::LoginFailure => "msal:loginFailure",
            Self::AcquireTokenStart => "msal:acquireTokenStart",
            Self::AcquireTokenNetworkStart => "msal:acquireTokenFromNetworkStart",
            Self::AcquireTokenSuccess => "msal:acquireTokenSuccess",
            Self::AcquireTokenFailure => "msal:acquireTokenFailure",
            Self::AcquireTokenByCodeStart => "msal:acquireTokenByCodeStart",
            Self::AcquireTokenByCodeSuccess => "msal:acquireTokenByCodeSuccess",
            Self::AcquireTokenByCodeFailure => "msal:acquireTokenByCodeFailure",
            Self::SsoSilentStart => "msal:ssoSilentStart",
            Self::SsoSilentSuccess => "msal:ssoSilentSuccess",
            Self::SsoSilentFailure => "msal:ssoSilentFailure",
            Self::HandleRedirectStart => "msal:handleRedirectStart",
            Self::HandleRedirectEnd => "msal:handleRedirectEnd",
            Self::PopupOpened => "msal:popupOpened",
            Self::LogoutStart => "msal:logoutStart",
            Self::LogoutSuccess => "msal:logoutSuccess",
            Self::LogoutFailure => "msal:logoutFailure",
            Self::LogoutEnd => "msal:logoutEnd",
            Self::RestoreFromBfcache => "msal:restoreFromBFCache",
            Self::Unknown(raw) => raw,
        }
    }

    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for EventType {
    fn from(raw: &str) -> Self {
        match raw {
            "msal:initializeStart" => Self::InitializeStart,
            "msal:initializeEnd" => Self::InitializeEnd,
            "msal:accountAdded" => Self::AccountAdded,
            "msal:accountRemoved" => Self::AccountRemoved,
            "msal:activeAccountChanged" => Self::ActiveAccountChanged,
            "msal:loginStart" => Self::LoginStart,
            "msal:loginSuccess" => Self::LoginSuccess,
            "msal:loginFailure" => Self::LoginFailure,
            "msal:acquireTokenStart" => Self::AcquireTokenStart,
            "msal:acquireTokenFromNetworkStart" => Self::AcquireTokenNetworkStart,
            "msal:acquireTokenSuccess" => Self::AcquireTokenSuccess,
            "msal:acquireTokenFailure" => Self::AcquireTokenFailure,
            "msal:acquireTokenByCodeStart" => Self::AcquireTokenByCodeStart,
            "msal:acquireTokenByCodeSuccess" => Self::AcquireTokenByCodeSuccess,
            "msal:acquireTokenByCodeFailure" => Self::AcquireTokenByCodeFailure,
            "msal:ssoSilentStart" => Self::SsoSilentStart,
            "msal:ssoSilentSuccess" => Self::SsoSilentSuccess,
            "msal:ssoSilentFailure" => Self::SsoSilentFailure,
            "msal:handleRedirectStart" => Self::HandleRedirectStart,
            "msal:handleRedirectEnd" => Self::HandleRedirectEnd,
            "msal:popupOpened" => Self::PopupOpened,
            "msal:logoutStart" => Self::LogoutStart,
            "msal:logoutSuccess" => Self::LogoutSuccess,
            "msal:logoutFailure" => Self::LogoutFailure,
            "msal:logoutEnd" => Self::LogoutEnd,
            "msal:restoreFromBFCache" => Self::RestoreFromBfcache,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<EventType> for String {
    fn from(event_type: EventType) -> Self {
        match event_type {
            EventType::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for EventType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payloads carried by client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum EventPayload {
    Authentication(Box<AuthenticationResult>),
    Account(AccountInfo),
}

/// A single event as delivered to registered callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    pub event_type: EventType,
    pub interaction_type: Option<InteractionType>,
    pub payload: Option<EventPayload>,
    pub error: Option<AuthClientError>,
    pub timestamp: DateTime<Utc>,
}

impl EventMessage {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            interaction_type: None,
            payload: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub const fn with_interaction(mut self, interaction_type: InteractionType) -> Self {
        self.interaction_type = Some(interaction_type);
        self
    }

    #[must_use]
    pub fn with_result(mut self, result: AuthenticationResult) -> Self {
        self.payload = Some(EventPayload::Authentication(Box::new(result)));
        self
    }

    #[must_use]
    pub fn with_account(mut self, account: AccountInfo) -> Self {
        self.payload = Some(EventPayload::Account(account));
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: AuthClientError) -> Self {
        self.error = Some(error);
        self
    }

    /// The authentication result, when the payload carries one.
    #[must_use]
    pub fn authentication_result(&self) -> Option<&AuthenticationResult> {
        match &self.payload {
            Some(EventPayload::Authentication(result)) => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_parse_back() {
        for raw in ["msal:loginSuccess", "msal:handleRedirectEnd", "msal:restoreFromBFCache"] {
            let event_type = EventType::from(raw);
            assert!(event_type.is_known());
            assert_eq!(event_type.as_str(), raw);
        }
    }

    #[test]
    fn test_unknown_names_are_preserved() {
        let event_type: EventType = "msal:brokerConnectionEstablished".parse().unwrap();
        assert_eq!(event_type, EventType::Unknown("msal:brokerConnectionEstablished".into()));
        assert!(!event_type.is_known());
        assert_eq!(String::from(event_type), "msal:brokerConnectionEstablished");
    }

    #[test]
    fn test_message_serde_uses_wire_names() {
        let message = EventMessage::new(EventType::LogoutEnd).with_interaction(InteractionType::Popup);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["eventType"], "msal:logoutEnd");
        assert_eq!(json["interactionType"], "popup");

        let back: EventMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back.event_type, EventType::LogoutEnd);
    }

    #[test]
    fn test_authentication_result_accessor() {
        let account = AccountInfo::new("h1", "l1", "alice@example.com");
        let message = EventMessage::new(EventType::AccountAdded).with_account(account);
        assert!(message.authentication_result().is_none());

        let message = EventMessage::new(EventType::LoginSuccess)
            .with_result(AuthenticationResult::default());
        assert!(message.authentication_result().is_some());
    }
}
