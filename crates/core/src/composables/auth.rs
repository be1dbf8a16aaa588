//! Shared auth context

use std::sync::Arc;

use authgate_domain::{
    AccountInfo, AuthClientError, AuthRequest, AuthenticationResult, InteractionStatus,
    InteractionType, LogoutRequest, Result, TokenBundle,
};
use tokio::sync::watch;

use super::lookup;
use crate::accounts::AccountSet;
use crate::context::AppContext;
use crate::plugin::{AuthPlugin, InteractionOutcome};
use crate::ports::AuthClient;

/// Read-only view of the plugin state plus its operations.
pub struct AuthContext {
    pub instance: Arc<dyn AuthClient>,
    pub interaction_type: InteractionType,
    pub login_request: AuthRequest,
    pub in_progress: watch::Receiver<InteractionStatus>,
    pub accounts: watch::Receiver<AccountSet>,
    pub account: watch::Receiver<Option<AccountInfo>>,
    pub tokens: watch::Receiver<TokenBundle>,
    pub ops: AuthOps,
}

/// Operations that go through the plugin's mutual-exclusion checks.
#[derive(Clone)]
pub struct AuthOps {
    plugin: Arc<AuthPlugin>,
}

impl AuthOps {
    pub async fn login(&self, request_override: Option<AuthRequest>) -> InteractionOutcome {
        self.plugin.login(request_override).await
    }

    pub async fn logout(&self, request_override: Option<LogoutRequest>) -> InteractionOutcome {
        self.plugin.logout(request_override).await
    }

    pub async fn acquire_token(
        &self,
        request_override: Option<AuthRequest>,
    ) -> std::result::Result<Option<AuthenticationResult>, AuthClientError> {
        self.plugin.acquire_token(request_override).await
    }
}

/// The auth context of the installed plugin.
pub fn use_auth(app: &AppContext) -> Result<AuthContext> {
    let plugin = lookup(app, "use_auth")?;
    Ok(AuthContext {
        instance: Arc::clone(plugin.client()),
        interaction_type: plugin.config().interaction_type,
        login_request: plugin.config().login_request.clone(),
        in_progress: plugin.subscribe_status(),
        accounts: plugin.account_store().subscribe_accounts(),
        account: plugin.account_store().subscribe_active(),
        tokens: plugin.subscribe_tokens(),
        ops: AuthOps { plugin },
    })
}
