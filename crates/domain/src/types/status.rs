//! Interaction status and interaction style enums

use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// Which interactive operation, if any, the auth client is running.
///
/// `None` is the only value in which a new interactive operation may start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionStatus {
    #[default]
    Startup,
    None,
    Login,
    Logout,
    AcquireToken,
    HandleRedirect,
    SsoSilent,
}

impl_wire_name_conversions!(InteractionStatus {
    Startup => "startup",
    None => "none",
    Login => "login",
    Logout => "logout",
    AcquireToken => "acquireToken",
    HandleRedirect => "handleRedirect",
    SsoSilent => "ssoSilent",
});

impl InteractionStatus {
    /// Whether a new interactive operation may begin.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::None)
    }
}

/// How an operation reaches the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    #[default]
    Redirect,
    Popup,
    Silent,
    None,
}

impl_wire_name_conversions!(InteractionType {
    Redirect => "redirect",
    Popup => "popup",
    Silent => "silent",
    None => "none",
});

impl InteractionType {
    /// Popup and redirect are the user-visible styles.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::Popup | Self::Redirect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names_match_serde() {
        for status in [
            InteractionStatus::Startup,
            InteractionStatus::None,
            InteractionStatus::Login,
            InteractionStatus::Logout,
            InteractionStatus::AcquireToken,
            InteractionStatus::HandleRedirect,
            InteractionStatus::SsoSilent,
        ] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
            assert_eq!(status.as_str().parse::<InteractionStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_only_none_is_idle() {
        assert!(InteractionStatus::None.is_idle());
        assert!(!InteractionStatus::Startup.is_idle());
        assert!(!InteractionStatus::HandleRedirect.is_idle());
    }

    #[test]
    fn test_interaction_type_defaults_to_redirect() {
        assert_eq!(InteractionType::default(), InteractionType::Redirect);
        assert_eq!("POPUP".parse::<InteractionType>().unwrap(), InteractionType::Popup);
        assert!(InteractionType::Popup.is_interactive());
        assert!(!InteractionType::Silent.is_interactive());
    }
}
