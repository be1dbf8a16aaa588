//! Derived "is authenticated" view

use authgate_domain::Result;
use tokio::sync::watch;

use super::lookup;
use crate::accounts::AccountSet;
use crate::context::AppContext;

/// `true` while at least one account is known.
pub struct IsAuthenticated {
    accounts: watch::Receiver<AccountSet>,
}

impl IsAuthenticated {
    #[must_use]
    pub fn get(&self) -> bool {
        !self.accounts.borrow().is_empty()
    }

    /// Wait for the account list to be republished and return the new value.
    ///
    /// `None` once the plugin has been dropped.
    pub async fn changed(&mut self) -> Option<bool> {
        self.accounts.changed().await.ok()?;
        Some(!self.accounts.borrow_and_update().is_empty())
    }
}

pub fn use_is_authenticated(app: &AppContext) -> Result<IsAuthenticated> {
    let plugin = lookup(app, "use_is_authenticated")?;
    Ok(IsAuthenticated { accounts: plugin.account_store().subscribe_accounts() })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use authgate_domain::{AccountInfo, AuthConfig, EventMessage, EventType};
    use futures::FutureExt;

    use super::*;
    use crate::plugin::{AuthPlugin, InstallOptions};
    use crate::ports::AuthClient;
    use crate::testing::MockAuthClient;

    #[tokio::test]
    async fn test_follows_account_list() {
        let client = Arc::new(MockAuthClient::new());
        let plugin =
            AuthPlugin::new(Arc::clone(&client) as Arc<dyn AuthClient>, AuthConfig::default());
        let app = AppContext::new();
        plugin.install(&app, InstallOptions::default()).await;

        let mut authenticated = use_is_authenticated(&app).unwrap();
        assert!(!authenticated.get());

        client.set_accounts(vec![AccountInfo::new("h1", "l1", "alice@example.com")]);
        client.emit(&EventMessage::new(EventType::AccountAdded));
        assert_eq!(authenticated.changed().await, Some(true));
        assert!(authenticated.get());
    }

    #[tokio::test]
    async fn test_unchanged_list_does_not_wake() {
        let client = Arc::new(MockAuthClient::new());
        client.set_accounts(vec![AccountInfo::new("h1", "l1", "alice@example.com")]);
        let plugin =
            AuthPlugin::new(Arc::clone(&client) as Arc<dyn AuthClient>, AuthConfig::default());
        let app = AppContext::new();
        plugin.install(&app, InstallOptions::default()).await;

        let mut authenticated = use_is_authenticated(&app).unwrap();
        client.emit(&EventMessage::new(EventType::AccountAdded));

        assert!(authenticated.changed().now_or_never().is_none());
        assert!(authenticated.get());
    }
}
