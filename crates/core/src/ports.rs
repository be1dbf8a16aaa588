//! Port interfaces for the auth client and the host router
//!
//! These traits define the boundaries between the state adapter and the
//! environment it runs in. The adapter never talks to a concrete client or
//! router directly.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use authgate_domain::{
    AccountInfo, AuthClientError, AuthRequest, AuthenticationResult, EventMessage, LogoutRequest,
    NavigationOptions, RouteLocation, RouterError,
};

/// Callback invoked synchronously for every client event.
pub type EventCallback = Arc<dyn Fn(&EventMessage) + Send + Sync>;

/// Handle returned by [`AuthClient::add_event_callback`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackId(String);

impl CallbackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random handle.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The wrapped browser auth client.
///
/// Async methods model the client's promise-returning calls. Event callbacks
/// are invoked synchronously from inside those calls, so implementations must
/// not hold internal locks while dispatching.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// One-time client initialization.
    async fn initialize(&self) -> Result<(), AuthClientError>;

    /// Process a pending redirect response, if the page was loaded from one.
    ///
    /// Resolves to `None` when there was nothing to process.
    async fn handle_redirect_promise(
        &self,
    ) -> Result<Option<AuthenticationResult>, AuthClientError>;

    async fn login_popup(&self, request: &AuthRequest)
        -> Result<AuthenticationResult, AuthClientError>;

    /// Start a redirect login. On success the page navigates away.
    async fn login_redirect(&self, request: &AuthRequest) -> Result<(), AuthClientError>;

    async fn logout_popup(&self, request: &LogoutRequest) -> Result<(), AuthClientError>;

    async fn logout_redirect(&self, request: &LogoutRequest) -> Result<(), AuthClientError>;

    async fn acquire_token_silent(
        &self,
        request: &AuthRequest,
    ) -> Result<AuthenticationResult, AuthClientError>;

    async fn sso_silent(&self, request: &AuthRequest)
        -> Result<AuthenticationResult, AuthClientError>;

    /// Cached accounts. Each call returns freshly built values.
    fn get_all_accounts(&self) -> Vec<AccountInfo>;

    fn get_active_account(&self) -> Option<AccountInfo>;

    fn set_active_account(&self, account: Option<AccountInfo>);

    /// Register an event callback. `None` means the client refused it.
    fn add_event_callback(&self, callback: EventCallback) -> Option<CallbackId>;

    fn remove_event_callback(&self, id: &CallbackId);

    /// Route the client's in-app navigations through `client`.
    fn set_navigation_client(&self, client: Arc<dyn NavigationClient>);
}

/// Navigation hook the auth client calls instead of touching the location
/// directly.
#[async_trait]
pub trait NavigationClient: Send + Sync {
    /// Navigate within the application.
    ///
    /// Returns whether the navigation triggered a full page load.
    async fn navigate_internal(&self, url: &str, options: NavigationOptions) -> bool;

    /// Navigate to another origin.
    ///
    /// Returns `true` when the client should carry out a full page
    /// navigation itself.
    async fn navigate_external(&self, url: &str, options: NavigationOptions) -> bool;
}

/// Host router.
///
/// `push` and `replace` only schedule a navigation; the router resolves it
/// and runs its guards on its own.
pub trait Router: Send + Sync {
    fn current_route(&self) -> RouteLocation;

    fn push(&self, path: &str) -> Result<(), RouterError>;

    fn replace(&self, path: &str) -> Result<(), RouterError>;

    /// Register a guard that runs before every navigation.
    fn before_each(&self, guard: Arc<dyn BeforeEachGuard>);
}

/// Global before-navigation hook.
#[async_trait]
pub trait BeforeEachGuard: Send + Sync {
    /// Decide whether navigation to `to` may proceed.
    ///
    /// The guard may rewrite `to` (for example to drop a fragment) before
    /// allowing it.
    async fn before_each(&self, to: &mut RouteLocation, from: &RouteLocation) -> bool;
}
