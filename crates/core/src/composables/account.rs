//! Active account display helper

use std::sync::Arc;

use authgate_domain::constants::{NO_NAME_PLACEHOLDER, NO_USERNAME_PLACEHOLDER};
use authgate_domain::{AccountInfo, Result};
use tokio::sync::watch;

use super::lookup;
use crate::context::AppContext;
use crate::plugin::{AuthPlugin, InteractionOutcome};

/// Active account with display fallbacks.
pub struct AccountView {
    plugin: Arc<AuthPlugin>,
    account: watch::Receiver<Option<AccountInfo>>,
}

impl AccountView {
    #[must_use]
    pub fn account(&self) -> Option<AccountInfo> {
        self.account.borrow().clone()
    }

    /// Username of the active account, or `(No username)`.
    #[must_use]
    pub fn username(&self) -> String {
        self.account
            .borrow()
            .as_ref()
            .map(|account| account.username.clone())
            .filter(|username| !username.is_empty())
            .unwrap_or_else(|| NO_USERNAME_PLACEHOLDER.to_string())
    }

    /// Display name of the active account, or `(No name)`.
    #[must_use]
    pub fn name(&self) -> String {
        self.account
            .borrow()
            .as_ref()
            .and_then(|account| account.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| NO_NAME_PLACEHOLDER.to_string())
    }

    /// Receiver for active-account changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<AccountInfo>> {
        self.account.clone()
    }

    /// Switch the active account. See [`AuthPlugin::switch_account`].
    pub async fn switch_account(&self, account: AccountInfo) -> InteractionOutcome {
        self.plugin.switch_account(account).await
    }
}

pub fn use_account(app: &AppContext) -> Result<AccountView> {
    let plugin = lookup(app, "use_account")?;
    let account = plugin.account_store().subscribe_active();
    Ok(AccountView { plugin, account })
}
