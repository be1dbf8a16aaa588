//! Signed-in principals

use serde::{Deserialize, Serialize};

/// A signed-in principal as cached by the auth client.
///
/// Identity is the `(home_account_id, local_account_id, username)` triple;
/// `name`, `environment` and `tenant_id` are display/diagnostic data and never
/// take part in change detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub home_account_id: String,
    pub local_account_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub tenant_id: String,
}

impl AccountInfo {
    /// Create an account from its identity triple
    pub fn new(
        home_account_id: impl Into<String>,
        local_account_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            home_account_id: home_account_id.into(),
            local_account_id: local_account_id.into(),
            username: username.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Structural identity comparison over the three identifying fields.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.home_account_id == other.home_account_id
            && self.local_account_id == other.local_account_id
            && self.username == other.username
    }
}

/// Whether two account lists hold the same identities in the same order.
///
/// The auth client hands out freshly deserialized accounts on every query,
/// so lists are compared position by position on the identity triple.
#[must_use]
pub fn account_lists_equal(a: &[AccountInfo], b: &[AccountInfo]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_identity(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountInfo {
        AccountInfo::new("h1", "l1", "alice@example.com")
    }

    #[test]
    fn test_identity_ignores_display_fields() {
        let a = alice().with_name("Alice");
        let mut b = alice();
        b.tenant_id = "tenant".to_string();
        assert!(a.same_identity(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_uses_every_triple_field() {
        let base = alice();
        assert!(!base.same_identity(&AccountInfo::new("h2", "l1", "alice@example.com")));
        assert!(!base.same_identity(&AccountInfo::new("h1", "l2", "alice@example.com")));
        assert!(!base.same_identity(&AccountInfo::new("h1", "l1", "bob@example.com")));
    }

    #[test]
    fn test_list_equality_is_ordered() {
        let bob = AccountInfo::new("h2", "l2", "bob@example.com");
        assert!(account_lists_equal(&[alice(), bob.clone()], &[alice(), bob.clone()]));
        assert!(!account_lists_equal(&[alice(), bob.clone()], &[bob, alice()]));
        assert!(!account_lists_equal(&[alice()], &[]));
        assert!(account_lists_equal(&[], &[]));
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(alice()).unwrap();
        assert_eq!(json["homeAccountId"], "h1");
        assert_eq!(json["localAccountId"], "l1");
        assert!(json.get("name").is_none());
    }
}
