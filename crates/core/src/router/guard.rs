//! Navigation guard for protected routes

use std::sync::Arc;

use async_trait::async_trait;
use authgate_domain::{
    AuthClientError, AuthGateError, AuthRequest, InteractionStatus, InteractionType, RouteLocation,
};
use tracing::{debug, info, warn};

use crate::ports::{AuthClient, BeforeEachGuard};
use crate::ready::ReadyGate;
use crate::status::InteractionStatusTracker;

/// Before-navigation hook registered with the host router at install.
pub struct NavigationGuard {
    client: Arc<dyn AuthClient>,
    ready: Arc<ReadyGate>,
    status: Arc<InteractionStatusTracker>,
    interaction_type: InteractionType,
    login_request: AuthRequest,
}

impl NavigationGuard {
    pub fn new(
        client: Arc<dyn AuthClient>,
        ready: Arc<ReadyGate>,
        status: Arc<InteractionStatusTracker>,
        interaction_type: InteractionType,
        login_request: AuthRequest,
    ) -> Self {
        Self { client, ready, status, interaction_type, login_request }
    }

    /// Decide whether navigation to `to` may proceed.
    ///
    /// Waits for install to finish. While a redirect response is still being
    /// handled the fragment is dropped from `to` so the destination never
    /// sees a stale authorization response. Protected routes need an
    /// authenticated user; anything else passes.
    pub async fn evaluate(&self, to: &mut RouteLocation, _from: &RouteLocation) -> bool {
        self.ready.wait_until_ready().await;

        if self.status.current() == InteractionStatus::HandleRedirect {
            debug!(full_path = %to.full_path, "guard: dropping redirect response fragment");
            to.strip_hash();
        }

        if !to.requires_auth() {
            return true;
        }

        debug!(full_path = %to.full_path, "guard: route requires authentication");
        let request = self.login_request.clone().with_redirect_start_page(to.full_path.clone());
        is_authenticated(self.client.as_ref(), self.interaction_type, &request).await
    }
}

#[async_trait]
impl BeforeEachGuard for NavigationGuard {
    async fn before_each(&self, to: &mut RouteLocation, from: &RouteLocation) -> bool {
        self.evaluate(to, from).await
    }
}

/// Whether a user is signed in, logging one in if not.
///
/// Any failure blocks the navigation.
pub async fn is_authenticated(
    client: &dyn AuthClient,
    interaction_type: InteractionType,
    request: &AuthRequest,
) -> bool {
    match try_authenticate(client, interaction_type, request).await {
        Ok(allowed) => allowed,
        Err(err) => {
            warn!(error = %err, "guard: authentication check failed, navigation blocked");
            false
        }
    }
}

async fn try_authenticate(
    client: &dyn AuthClient,
    interaction_type: InteractionType,
    request: &AuthRequest,
) -> Result<bool, AuthGateError> {
    // a redirect response must be processed before the account cache is trusted
    client.handle_redirect_promise().await?;

    if !client.get_all_accounts().is_empty() {
        return Ok(true);
    }

    info!(%interaction_type, "guard: no signed-in account, starting login");
    let login: Result<(), AuthClientError> = match interaction_type {
        InteractionType::Popup => client.login_popup(request).await.map(|_| ()),
        InteractionType::Redirect => client.login_redirect(request).await,
        other => {
            return Err(AuthGateError::Guard(format!("{other} interaction cannot sign a user in")))
        }
    };
    login?;
    Ok(true)
}
