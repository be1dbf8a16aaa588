//! Event callbacks registered by the plugin
//!
//! Each handler normalizes the raw event on its own and acts on the intents
//! it owns. Handlers run synchronously inside the client's dispatch, in
//! registration order.

use std::sync::Arc;

use authgate_domain::{InteractionType, TokenBundle};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, error, info, trace};

use crate::accounts::AccountStateStore;
use crate::events::{normalize, StateIntent};
use crate::ports::{AuthClient, CallbackId, EventCallback, Router};
use crate::status::InteractionStatusTracker;

/// One registered callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledCallback {
    pub name: &'static str,
    /// `None` when the client refused the registration.
    pub id: Option<CallbackId>,
}

/// Subscription handles owned by the plugin.
#[derive(Debug, Default)]
pub struct InstalledCallbackSet {
    entries: Mutex<Vec<InstalledCallback>>,
}

impl InstalledCallbackSet {
    pub fn register(&self, client: &dyn AuthClient, name: &'static str, callback: EventCallback) {
        let id = client.add_event_callback(callback);
        match &id {
            Some(id) => debug!(callback = name, id = %id, "event callback registered"),
            None => error!(callback = name, "auth client refused event callback"),
        }
        self.entries.lock().push(InstalledCallback { name, id });
    }

    /// Unsubscribe every handle and empty the set. Returns how many handles
    /// were released.
    pub fn release_all(&self, client: &dyn AuthClient) -> usize {
        let entries = std::mem::take(&mut *self.entries.lock());
        let mut released = 0;
        for entry in entries {
            if let Some(id) = entry.id {
                client.remove_event_callback(&id);
                trace!(callback = entry.name, id = %id, "event callback removed");
                released += 1;
            }
        }
        released
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.lock().iter().map(|entry| entry.name).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Traces every raw event.
pub fn debug_handler() -> EventCallback {
    Arc::new(|message| {
        debug!(
            event = %message.event_type,
            interaction = ?message.interaction_type,
            has_payload = message.payload.is_some(),
            error = ?message.error.as_ref().map(|err| err.code().to_string()),
            "auth client event"
        );
    })
}

/// Promotes the logged-in account and publishes its tokens.
pub fn login_success_handler(
    accounts: Arc<AccountStateStore>,
    tokens: Arc<watch::Sender<TokenBundle>>,
) -> EventCallback {
    Arc::new(move |message| {
        for intent in normalize(message) {
            if let StateIntent::LoginSucceeded { account, tokens: bundle } = intent {
                trace!("login_success: enter");
                if let Some(account) = account {
                    info!(username = %account.username, "login success, setting active account");
                    accounts.promote(account);
                }
                if let Some(bundle) = bundle {
                    publish_tokens(&tokens, bundle);
                }
            }
        }
    })
}

/// Publishes tokens from successful acquisitions.
pub fn token_update_handler(
    accounts: Arc<AccountStateStore>,
    tokens: Arc<watch::Sender<TokenBundle>>,
) -> EventCallback {
    Arc::new(move |message| {
        for intent in normalize(message) {
            if let StateIntent::TokenAcquired { account, tokens: bundle } = intent {
                if let Some(account) = account {
                    accounts.promote(account);
                }
                publish_tokens(&tokens, bundle);
            }
        }
    })
}

/// Reconciles the published account list with the client's cache.
pub fn accounts_update_handler(accounts: Arc<AccountStateStore>) -> EventCallback {
    Arc::new(move |message| {
        if normalize(message).contains(&StateIntent::AccountsMayHaveChanged) {
            let changed = accounts.refresh();
            trace!(event = %message.event_type, changed, "accounts_update");
        }
    })
}

/// Applies the event to the interaction status.
pub fn status_update_handler(status: Arc<InteractionStatusTracker>) -> EventCallback {
    Arc::new(move |message| {
        if normalize(message).contains(&StateIntent::StatusMayHaveChanged) {
            if let Some(next) = status.apply(message) {
                info!(status = %next, event = %message.event_type, "interaction status updated");
            }
        }
    })
}

/// Re-derives the active account after logout and moves a popup-logged-out
/// user off a protected route.
pub fn logout_end_handler(
    accounts: Arc<AccountStateStore>,
    router: Option<Arc<dyn Router>>,
) -> EventCallback {
    Arc::new(move |message| {
        for intent in normalize(message) {
            let StateIntent::LogoutEnded(interaction) = intent else {
                continue;
            };
            accounts.reset_active_account();
            if interaction == Some(InteractionType::Popup) {
                if let Some(router) = &router {
                    leave_protected_route(router.as_ref());
                }
            }
        }
    })
}

fn leave_protected_route(router: &dyn Router) {
    let route = router.current_route();
    if !route.requires_auth() {
        return;
    }
    let Some(fallback) = route.popup_logout_fallback() else {
        return;
    };
    info!(from = %route.full_path, to = fallback, "popup logout: leaving protected route");
    if let Err(err) = router.push(fallback) {
        error!(error = %err, "popup logout: fallback navigation failed");
    }
}

fn publish_tokens(tokens: &watch::Sender<TokenBundle>, bundle: TokenBundle) {
    tokens.send_replace(bundle);
    info!("tokens updated");
}
