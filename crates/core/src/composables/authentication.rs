//! Call-site token acquisition with captured result and error

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use authgate_domain::{AuthClientError, AuthRequest, AuthenticationResult, Result};
use tokio::sync::watch;
use tracing::debug;

use super::lookup;
use crate::context::AppContext;
use crate::plugin::AuthPlugin;

/// Token acquisition bound to one call site.
///
/// Clones share the busy flag and the result/error pair. Errors land in
/// [`error`](Self::error) and are never returned to the caller.
#[derive(Clone)]
pub struct Authentication {
    plugin: Arc<AuthPlugin>,
    busy: Arc<AtomicBool>,
    result: Arc<watch::Sender<Option<AuthenticationResult>>>,
    error: Arc<watch::Sender<Option<AuthClientError>>>,
}

/// Clears the busy flag when the acquisition finishes or is dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Authentication {
    /// Acquire a token, recording the outcome.
    ///
    /// Returns `false` without doing anything when an acquisition from this
    /// call site is already in flight.
    pub async fn acquire_token(&self, request_override: Option<AuthRequest>) -> bool {
        if self.busy.swap(true, Ordering::AcqRel) {
            debug!("acquire_token: already in flight, dropped");
            return false;
        }
        let _busy = BusyGuard(&self.busy);

        match self.plugin.acquire_token(request_override).await {
            Ok(Some(result)) => {
                self.result.send_replace(Some(result));
                self.error.send_replace(None);
            }
            Ok(None) => {}
            Err(err) => {
                self.result.send_replace(None);
                self.error.send_replace(Some(err));
            }
        }
        true
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn result(&self) -> watch::Receiver<Option<AuthenticationResult>> {
        self.result.subscribe()
    }

    #[must_use]
    pub fn error(&self) -> watch::Receiver<Option<AuthClientError>> {
        self.error.subscribe()
    }
}

pub fn use_authentication(app: &AppContext) -> Result<Authentication> {
    let plugin = lookup(app, "use_authentication")?;
    Ok(Authentication {
        plugin,
        busy: Arc::new(AtomicBool::new(false)),
        result: Arc::new(watch::channel(None).0),
        error: Arc::new(watch::channel(None).0),
    })
}

#[cfg(test)]
mod tests {
    use authgate_domain::{AccountInfo, AuthConfig, InteractionType};

    use super::*;
    use crate::plugin::InstallOptions;
    use crate::ports::AuthClient;
    use crate::testing::{calls, MockAuthClient};

    async fn setup(interaction_type: InteractionType) -> (Arc<MockAuthClient>, Authentication) {
        let client = Arc::new(MockAuthClient::new());
        client.set_accounts(vec![AccountInfo::new("h1", "l1", "alice@example.com")]);
        let plugin = AuthPlugin::new(
            Arc::clone(&client) as Arc<dyn AuthClient>,
            AuthConfig::new(interaction_type, AuthRequest::new(["User.Read"])),
        );
        let app = AppContext::new();
        plugin.install(&app, InstallOptions::default()).await;
        (client, use_authentication(&app).unwrap())
    }

    #[tokio::test]
    async fn test_success_is_captured() {
        let (_client, auth) = setup(InteractionType::Popup).await;
        assert!(auth.acquire_token(None).await);
        assert!(auth.result().borrow().is_some());
        assert!(auth.error().borrow().is_none());
        assert!(!auth.is_busy());
    }

    #[tokio::test]
    async fn test_error_is_captured_not_returned() {
        let (client, auth) = setup(InteractionType::Popup).await;
        client.push_silent_result(Err(AuthClientError::client("server_error", "503")));

        assert!(auth.acquire_token(None).await);
        assert!(auth.result().borrow().is_none());
        assert_eq!(auth.error().borrow().as_ref().map(AuthClientError::code), Some("server_error"));
        assert_eq!(client.call_count(calls::LOGIN_POPUP), 0);
    }

    #[tokio::test]
    async fn test_reentrant_call_is_dropped() {
        let (client, auth) = setup(InteractionType::Popup).await;
        let release = client.hold_silent_requests();

        let (first, second) = tokio::join!(auth.acquire_token(None), async {
            tokio::task::yield_now().await;
            let second = auth.acquire_token(None).await;
            release.notify_one();
            second
        });

        assert!(first);
        assert!(!second);
        assert_eq!(client.call_count(calls::ACQUIRE_TOKEN_SILENT), 1);
        assert!(!auth.is_busy());
    }
}
