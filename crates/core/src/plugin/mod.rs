//! Auth plugin: owns the client, wires the event pipeline and drives login,
//! logout and token acquisition.
//!
//! Status, accounts and tokens are written only by the callbacks registered
//! in [`AuthPlugin::install`]. Public operations call into the client and let
//! the resulting events flow back through those callbacks.

pub mod callbacks;

use std::sync::Arc;

use authgate_domain::constants::{DEFAULT_MAIN_WINDOW_REDIRECT_URI, PROMPT_LOGIN, PROMPT_NONE};
use authgate_domain::{
    AccountInfo, AuthClientError, AuthConfig, AuthRequest, AuthenticationResult, ErrorSeverity,
    InteractionStatus, InteractionType, LogoutRequest, TokenBundle,
};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::{debug, error, info, warn, Level};

use crate::accounts::{AccountSet, AccountStateStore};
use crate::context::AppContext;
use crate::ports::{AuthClient, Router};
use crate::ready::ReadyGate;
use crate::router::{NavigationGuard, RouterNavigationClient};
use crate::status::InteractionStatusTracker;
use callbacks::InstalledCallbackSet;

/// Install-time wiring supplied by the host application.
#[derive(Clone, Default)]
pub struct InstallOptions {
    /// Host router. When present, the client's internal navigations and the
    /// navigation guard are routed through it.
    pub router: Option<Arc<dyn Router>>,
    /// Application origin stripped from URLs before they reach the router.
    pub origin: Option<String>,
}

impl InstallOptions {
    #[must_use]
    pub fn with_router(router: Arc<dyn Router>) -> Self {
        Self { router: Some(router), origin: None }
    }

    #[must_use]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl std::fmt::Debug for InstallOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallOptions")
            .field("router", &self.router.is_some())
            .field("origin", &self.origin)
            .finish()
    }
}

/// What happened to an interactive login or logout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Another interaction is running; the client was not called.
    Blocked(InteractionStatus),
    /// The popup flow finished. Logins carry their result.
    Completed(Option<Box<AuthenticationResult>>),
    /// The client is navigating the page away; no result follows in this
    /// page load.
    Redirecting,
    /// The user closed the popup.
    Cancelled,
    Failed(AuthClientError),
    /// The configured interaction type is neither popup nor redirect.
    Unsupported(InteractionType),
}

impl InteractionOutcome {
    fn from_error(operation: &'static str, err: AuthClientError) -> Self {
        report_interaction_error(operation, &err);
        if err.is_user_cancelled() {
            Self::Cancelled
        } else {
            Self::Failed(err)
        }
    }
}

/// The auth plugin.
///
/// Build it with [`AuthPlugin::new`], then [`install`](Self::install) it into
/// an [`AppContext`]. The callbacks handed to the client hold references to
/// the plugin's state; [`dispose`](Self::dispose) releases them.
pub struct AuthPlugin {
    client: Arc<dyn AuthClient>,
    config: AuthConfig,
    status: Arc<InteractionStatusTracker>,
    accounts: Arc<AccountStateStore>,
    tokens: Arc<watch::Sender<TokenBundle>>,
    ready: Arc<ReadyGate>,
    callbacks: InstalledCallbackSet,
    router: RwLock<Option<Arc<dyn Router>>>,
    guarded_routers: Mutex<Vec<Arc<dyn Router>>>,
}

impl AuthPlugin {
    pub fn new(client: Arc<dyn AuthClient>, config: AuthConfig) -> Arc<Self> {
        let accounts = Arc::new(AccountStateStore::new(Arc::clone(&client)));
        let (tokens, _) = watch::channel(TokenBundle::default());
        Arc::new(Self {
            client,
            config,
            status: Arc::new(InteractionStatusTracker::new()),
            accounts,
            tokens: Arc::new(tokens),
            ready: Arc::new(ReadyGate::new()),
            callbacks: InstalledCallbackSet::default(),
            router: RwLock::new(None),
            guarded_routers: Mutex::new(Vec::new()),
        })
    }

    /// Wire the plugin into `app` and run the startup sequence.
    ///
    /// Callbacks are registered before the client is initialized so no
    /// startup event is missed, and the ready gate opens only after the
    /// status has been forced back to idle.
    pub async fn install(self: &Arc<Self>, app: &AppContext, options: InstallOptions) {
        debug!(?options, "install: start");

        if let Some(router) = &options.router {
            let navigation = RouterNavigationClient::new(Arc::clone(router), options.origin.clone());
            self.client.set_navigation_client(Arc::new(navigation));
            *self.router.write() = Some(Arc::clone(router));
            // the router port has no way to remove a guard, so each router gets one
            let newly_guarded = {
                let mut guarded = self.guarded_routers.lock();
                if guarded.iter().any(|known| same_router(known, router)) {
                    false
                } else {
                    guarded.push(Arc::clone(router));
                    true
                }
            };
            if newly_guarded {
                router.before_each(Arc::new(self.navigation_guard()));
            } else {
                debug!("install: navigation guard already registered with this router");
            }
        }

        app.provide(Arc::clone(self));

        self.register_callbacks(options.router.clone());

        if self.status.restart() {
            debug!("install: interaction status back to startup");
        }
        let cycle = self.ready.arm();

        match self.client.initialize().await {
            Ok(()) => match self.client.handle_redirect_promise().await {
                Ok(Some(result)) => info!(
                    username = result.account.as_ref().map(|account| account.username.as_str()),
                    "install: redirect response processed"
                ),
                Ok(None) => debug!("install: no pending redirect response"),
                Err(err) => error!(error = %err, "install: handling redirect response failed"),
            },
            Err(err) => error!(error = %err, "install: client initialization failed"),
        }

        self.status.force_reset();
        self.ready.resolve();
        info!(cycle, "install: ready");
    }

    /// Unsubscribe every registered callback. Safe to call more than once.
    pub fn dispose(&self) {
        let released = self.callbacks.release_all(self.client.as_ref());
        if released > 0 {
            info!(released, "auth plugin disposed");
        }
    }

    /// Names of the currently registered callbacks, in registration order.
    #[must_use]
    pub fn installed_callbacks(&self) -> Vec<&'static str> {
        self.callbacks.names()
    }

    fn register_callbacks(&self, router: Option<Arc<dyn Router>>) {
        if !self.callbacks.is_empty() {
            debug!("install: replacing callbacks from an earlier install");
            self.dispose();
        }
        let client = self.client.as_ref();
        self.callbacks.register(client, "debug", callbacks::debug_handler());
        self.callbacks.register(
            client,
            "login_success",
            callbacks::login_success_handler(Arc::clone(&self.accounts), Arc::clone(&self.tokens)),
        );
        self.callbacks.register(
            client,
            "token_update",
            callbacks::token_update_handler(Arc::clone(&self.accounts), Arc::clone(&self.tokens)),
        );
        self.callbacks.register(
            client,
            "accounts_update",
            callbacks::accounts_update_handler(Arc::clone(&self.accounts)),
        );
        self.callbacks.register(
            client,
            "status_update",
            callbacks::status_update_handler(Arc::clone(&self.status)),
        );
        self.callbacks.register(
            client,
            "logout_end",
            callbacks::logout_end_handler(Arc::clone(&self.accounts), router),
        );
    }

    fn navigation_guard(&self) -> NavigationGuard {
        NavigationGuard::new(
            Arc::clone(&self.client),
            Arc::clone(&self.ready),
            Arc::clone(&self.status),
            self.config.interaction_type,
            self.config.login_request.clone(),
        )
    }

    /// Start an interactive login in the configured style.
    ///
    /// `request_override` replaces the configured login request wholesale.
    pub async fn login(&self, request_override: Option<AuthRequest>) -> InteractionOutcome {
        if let Some(blocked) = self.blocked("login") {
            return blocked;
        }
        let request = request_override.unwrap_or_else(|| self.config.login_request.clone());
        self.interactive_login(&request).await
    }

    /// Start a logout in the configured style.
    ///
    /// Without an override the active account is logged out; popup logouts
    /// bring the main window back to `/`.
    pub async fn logout(&self, request_override: Option<LogoutRequest>) -> InteractionOutcome {
        if let Some(blocked) = self.blocked("logout") {
            return blocked;
        }
        let account = self.client.get_active_account();
        match self.config.interaction_type {
            InteractionType::Popup => {
                let request = request_override.unwrap_or_else(|| LogoutRequest {
                    account,
                    main_window_redirect_uri: Some(DEFAULT_MAIN_WINDOW_REDIRECT_URI.to_string()),
                    ..LogoutRequest::default()
                });
                match self.client.logout_popup(&request).await {
                    Ok(()) => InteractionOutcome::Completed(None),
                    Err(err) => InteractionOutcome::from_error("logout_popup", err),
                }
            }
            InteractionType::Redirect => {
                let request = request_override
                    .unwrap_or_else(|| LogoutRequest { account, ..LogoutRequest::default() });
                match self.client.logout_redirect(&request).await {
                    Ok(()) => InteractionOutcome::Redirecting,
                    Err(err) => InteractionOutcome::from_error("logout_redirect", err),
                }
            }
            other => unsupported("logout", other),
        }
    }

    /// Acquire a token for `request_override` (or the login request).
    ///
    /// While a redirect response is being handled, its outcome is the
    /// result. When idle, a silent acquisition runs first and falls back to
    /// one interactive login with the unchanged request if the client asks
    /// for interaction. In any other status nothing is attempted.
    pub async fn acquire_token(
        &self,
        request_override: Option<AuthRequest>,
    ) -> Result<Option<AuthenticationResult>, AuthClientError> {
        match self.status.current() {
            InteractionStatus::HandleRedirect => {
                debug!("acquire_token: awaiting pending redirect response");
                self.client.handle_redirect_promise().await
            }
            InteractionStatus::None => {
                let request = request_override.unwrap_or_else(|| self.config.login_request.clone());
                match self.client.acquire_token_silent(&request).await {
                    Ok(result) => Ok(Some(result)),
                    Err(err) if err.is_interaction_required() => {
                        warn!(code = err.code(), "acquire_token: silent acquisition needs interaction");
                        self.interactive_fallback(&request).await
                    }
                    Err(err) => {
                        error!(error = %err, "acquire_token: silent acquisition failed");
                        Err(err)
                    }
                }
            }
            status => {
                debug!(%status, "acquire_token: interaction in progress, skipped");
                Ok(None)
            }
        }
    }

    /// Make `account` active, signing in to it if needed.
    ///
    /// Tries single sign-on without a prompt first, then an interactive
    /// login that forces account selection.
    pub async fn switch_account(&self, account: AccountInfo) -> InteractionOutcome {
        if let Some(blocked) = self.blocked("switch_account") {
            return blocked;
        }
        let request = self.config.login_request.clone().with_account(account);

        match self.client.sso_silent(&request.clone().with_prompt(PROMPT_NONE)).await {
            Ok(result) => {
                // single sign-on completion carries no account event of its own
                self.accounts.refresh();
                if let Some(account) = result.account.clone() {
                    self.accounts.promote(account);
                }
                InteractionOutcome::Completed(Some(Box::new(result)))
            }
            Err(err) if err.is_interaction_required() => {
                info!(code = err.code(), "switch_account: interaction required, prompting");
                let outcome = self.interactive_login(&request.with_prompt(PROMPT_LOGIN)).await;
                if let InteractionOutcome::Completed(Some(result)) = &outcome {
                    if let Some(account) = result.account.clone() {
                        self.accounts.promote(account);
                    }
                }
                outcome
            }
            Err(err) => {
                error!(error = %err, "switch_account: single sign-on failed");
                InteractionOutcome::Failed(err)
            }
        }
    }

    async fn interactive_login(&self, request: &AuthRequest) -> InteractionOutcome {
        match self.config.interaction_type {
            InteractionType::Popup => match self.client.login_popup(request).await {
                Ok(result) => InteractionOutcome::Completed(Some(Box::new(result))),
                Err(err) => InteractionOutcome::from_error("login_popup", err),
            },
            InteractionType::Redirect => match self.client.login_redirect(request).await {
                Ok(()) => InteractionOutcome::Redirecting,
                Err(err) => InteractionOutcome::from_error("login_redirect", err),
            },
            other => unsupported("login", other),
        }
    }

    async fn interactive_fallback(
        &self,
        request: &AuthRequest,
    ) -> Result<Option<AuthenticationResult>, AuthClientError> {
        match self.interactive_login(request).await {
            InteractionOutcome::Completed(result) => Ok(result.map(|result| *result)),
            InteractionOutcome::Redirecting
            | InteractionOutcome::Blocked(_)
            | InteractionOutcome::Unsupported(_) => Ok(None),
            InteractionOutcome::Cancelled => Err(AuthClientError::UserCancelled),
            InteractionOutcome::Failed(err) => Err(err),
        }
    }

    fn blocked(&self, operation: &'static str) -> Option<InteractionOutcome> {
        let status = self.status.current();
        if status.is_idle() {
            None
        } else {
            debug!(operation, %status, "interaction in progress, request ignored");
            Some(InteractionOutcome::Blocked(status))
        }
    }

    /// The wrapped client.
    #[must_use]
    pub fn client(&self) -> &Arc<dyn AuthClient> {
        &self.client
    }

    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> InteractionStatus {
        self.status.current()
    }

    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<InteractionStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn accounts(&self) -> AccountSet {
        self.accounts.accounts()
    }

    #[must_use]
    pub fn active_account(&self) -> Option<AccountInfo> {
        self.accounts.active_account()
    }

    #[must_use]
    pub fn account_store(&self) -> &Arc<AccountStateStore> {
        &self.accounts
    }

    #[must_use]
    pub fn tokens(&self) -> TokenBundle {
        self.tokens.borrow().clone()
    }

    #[must_use]
    pub fn subscribe_tokens(&self) -> watch::Receiver<TokenBundle> {
        self.tokens.subscribe()
    }

    #[must_use]
    pub fn ready_gate(&self) -> &Arc<ReadyGate> {
        &self.ready
    }

    /// Router supplied at install, if any.
    #[must_use]
    pub fn router(&self) -> Option<Arc<dyn Router>> {
        self.router.read().clone()
    }
}

fn same_router(a: &Arc<dyn Router>, b: &Arc<dyn Router>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn unsupported(operation: &'static str, interaction_type: InteractionType) -> InteractionOutcome {
    warn!(operation, %interaction_type, "interaction type cannot drive an interactive flow");
    InteractionOutcome::Unsupported(interaction_type)
}

/// Log level for an interactive failure of the given severity.
const fn report_level(severity: ErrorSeverity) -> Level {
    match severity {
        ErrorSeverity::Info => Level::INFO,
        ErrorSeverity::Warning => Level::WARN,
        ErrorSeverity::Error => Level::ERROR,
    }
}

fn report_interaction_error(operation: &'static str, err: &AuthClientError) {
    let level = report_level(err.severity());
    if level == Level::INFO {
        info!(operation, code = err.code(), "user cancelled the interaction");
    } else if level == Level::WARN {
        warn!(operation, error = %err, "interactive operation needs more interaction");
    } else {
        error!(operation, error = %err, "interactive operation failed");
    }
}
