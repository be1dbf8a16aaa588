//! Authentication results, token bundles, and request shapes

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::AccountInfo;

/// Outcome of a successful login or token acquisition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResult {
    #[serde(default)]
    pub authority: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub account: Option<AccountInfo>,
    #[serde(default)]
    pub id_token: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub from_cache: bool,
    #[serde(default)]
    pub correlation_id: String,
}

impl AuthenticationResult {
    /// Minimal result for an account with the given tokens
    pub fn new(
        account: Option<AccountInfo>,
        id_token: impl Into<String>,
        access_token: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            account,
            id_token: id_token.into(),
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            scopes,
            ..Self::default()
        }
    }
}

/// One access token together with the scopes it was granted for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenEntry {
    pub scopes: Vec<String>,
    pub access_token: String,
}

/// Tokens exposed to the UI.
///
/// Replaced wholesale on every successful acquisition, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBundle {
    pub id_token: String,
    pub access_tokens: Vec<AccessTokenEntry>,
}

impl From<&AuthenticationResult> for TokenBundle {
    fn from(result: &AuthenticationResult) -> Self {
        let mut access_tokens = Vec::new();
        if !result.access_token.is_empty() {
            access_tokens.push(AccessTokenEntry {
                scopes: result.scopes.clone(),
                access_token: result.access_token.clone(),
            });
        }
        Self { id_token: result.id_token.clone(), access_tokens }
    }
}

/// Login / token request. Used for popup, redirect and silent calls alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountInfo>,
    /// Page to return to once a redirect flow completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_start_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_hint: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_query_parameters: BTreeMap<String, String>,
}

impl AuthRequest {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { scopes: scopes.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    #[must_use]
    pub fn with_account(mut self, account: AccountInfo) -> Self {
        self.account = Some(account);
        self
    }

    #[must_use]
    pub fn with_redirect_start_page(mut self, page: impl Into<String>) -> Self {
        self.redirect_start_page = Some(page.into());
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

/// End-session request for popup or redirect logout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountInfo>,
    /// Where the main window lands after a popup logout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_window_redirect_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_logout_redirect_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bundle_from_result() {
        let result = AuthenticationResult::new(
            None,
            "id-token",
            "access-token",
            vec!["User.Read".to_string()],
        );
        let bundle = TokenBundle::from(&result);
        assert_eq!(bundle.id_token, "id-token");
        assert_eq!(bundle.access_tokens.len(), 1);
        assert_eq!(bundle.access_tokens[0].scopes, vec!["User.Read".to_string()]);
    }

    #[test]
    fn test_token_bundle_skips_empty_access_token() {
        let result = AuthenticationResult::new(None, "id-token", "", vec![]);
        let bundle = TokenBundle::from(&result);
        assert!(bundle.access_tokens.is_empty());
        assert_eq!(bundle.id_token, "id-token");
    }

    #[test]
    fn test_request_builders() {
        let request = AuthRequest::new(["openid", "profile"])
            .with_redirect_start_page("/profile")
            .with_prompt("login");
        assert_eq!(request.scopes, vec!["openid".to_string(), "profile".to_string()]);
        assert_eq!(request.redirect_start_page.as_deref(), Some("/profile"));
        assert_eq!(request.prompt.as_deref(), Some("login"));
    }

    #[test]
    fn test_default_request_deserializes_from_empty_object() {
        let request: AuthRequest = serde_json::from_str("{}").unwrap();
        assert!(request.scopes.is_empty());
        assert_eq!(request, AuthRequest::default());
    }
}
