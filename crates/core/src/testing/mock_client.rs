//! Scripted in-memory auth client

#![allow(clippy::missing_panics_doc)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use authgate_domain::{
    AccountInfo, AuthClientError, AuthRequest, AuthenticationResult, EventMessage, EventType,
    InteractionType, LogoutRequest,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::ports::{AuthClient, CallbackId, EventCallback, NavigationClient};

/// Names used by [`MockAuthClient::call_count`].
pub mod calls {
    pub const INITIALIZE: &str = "initialize";
    pub const HANDLE_REDIRECT_PROMISE: &str = "handle_redirect_promise";
    pub const LOGIN_POPUP: &str = "login_popup";
    pub const LOGIN_REDIRECT: &str = "login_redirect";
    pub const LOGOUT_POPUP: &str = "logout_popup";
    pub const LOGOUT_REDIRECT: &str = "logout_redirect";
    pub const ACQUIRE_TOKEN_SILENT: &str = "acquire_token_silent";
    pub const SSO_SILENT: &str = "sso_silent";
}

type ScriptedResult = Result<AuthenticationResult, AuthClientError>;

#[derive(Default)]
struct MockState {
    accounts: Vec<AccountInfo>,
    active: Option<AccountInfo>,
    initialize_error: Option<AuthClientError>,
    redirect_response: Option<Result<Option<AuthenticationResult>, AuthClientError>>,
    popup_results: VecDeque<ScriptedResult>,
    silent_results: VecDeque<ScriptedResult>,
    sso_results: VecDeque<ScriptedResult>,
    login_redirect_error: Option<AuthClientError>,
    logout_error: Option<AuthClientError>,
    silent_hold: Option<Arc<Notify>>,
    redirect_hold: Option<Arc<Notify>>,
    refuse_callbacks: bool,
    navigation_client: Option<Arc<dyn NavigationClient>>,
    last_login_request: Option<AuthRequest>,
    last_silent_request: Option<AuthRequest>,
    last_sso_request: Option<AuthRequest>,
    last_logout_request: Option<LogoutRequest>,
}

/// In-memory [`AuthClient`] for tests.
///
/// Keeps an account cache, records how often each operation ran, and emits
/// the event sequence a browser client emits for the same call (for example
/// `LOGIN_START` then `LOGIN_SUCCESS` or `LOGIN_FAILURE`). Callbacks run with
/// no internal lock held, so they may call back into the client.
///
/// # Examples
///
/// ```
/// use authgate_core::testing::{calls, MockAuthClient};
/// use authgate_core::AuthClient;
/// use authgate_domain::AccountInfo;
///
/// let client = MockAuthClient::new();
/// client.set_accounts(vec![AccountInfo::new("h1", "l1", "alice@example.com")]);
/// assert_eq!(client.get_all_accounts().len(), 1);
/// assert_eq!(client.call_count(calls::LOGIN_POPUP), 0);
/// ```
#[derive(Default)]
pub struct MockAuthClient {
    state: Mutex<MockState>,
    callbacks: Mutex<Vec<(CallbackId, EventCallback)>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockAuthClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the account cache. A cached active account that is no longer
    /// listed is cleared.
    pub fn set_accounts(&self, accounts: Vec<AccountInfo>) {
        let mut state = self.state.lock();
        let still_listed = state
            .active
            .as_ref()
            .is_some_and(|active| accounts.iter().any(|account| account.same_identity(active)));
        if !still_listed {
            state.active = None;
        }
        state.accounts = accounts;
    }

    pub fn fail_initialize(&self, error: AuthClientError) {
        self.state.lock().initialize_error = Some(error);
    }

    /// Outcome of the next `handle_redirect_promise` call. Later calls
    /// resolve to `None`.
    pub fn set_redirect_response(
        &self,
        response: Result<Option<AuthenticationResult>, AuthClientError>,
    ) {
        self.state.lock().redirect_response = Some(response);
    }

    pub fn push_popup_result(&self, result: ScriptedResult) {
        self.state.lock().popup_results.push_back(result);
    }

    /// Queue a silent-acquisition outcome. Without one, silent acquisition
    /// succeeds for the first cached account or fails with `NoAccount`.
    pub fn push_silent_result(&self, result: ScriptedResult) {
        self.state.lock().silent_results.push_back(result);
    }

    /// Queue a single sign-on outcome. Without one, single sign-on fails
    /// with `login_required`.
    pub fn push_sso_result(&self, result: ScriptedResult) {
        self.state.lock().sso_results.push_back(result);
    }

    pub fn fail_login_redirect(&self, error: AuthClientError) {
        self.state.lock().login_redirect_error = Some(error);
    }

    pub fn fail_logout(&self, error: AuthClientError) {
        self.state.lock().logout_error = Some(error);
    }

    /// Make the next silent acquisition wait until the returned handle is
    /// notified.
    pub fn hold_silent_requests(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.state.lock().silent_hold = Some(Arc::clone(&notify));
        notify
    }

    /// Make the next `handle_redirect_promise` call wait, after it reported
    /// its start, until the returned handle is notified.
    pub fn hold_redirect_handling(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.state.lock().redirect_hold = Some(Arc::clone(&notify));
        notify
    }

    pub fn refuse_callbacks(&self, refuse: bool) {
        self.state.lock().refuse_callbacks = refuse;
    }

    /// Deliver `message` to every registered callback, in registration order.
    pub fn emit(&self, message: &EventMessage) {
        let callbacks: Vec<EventCallback> =
            self.callbacks.lock().iter().map(|(_, callback)| Arc::clone(callback)).collect();
        for callback in callbacks {
            callback(message);
        }
    }

    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.lock().get(operation).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.lock().len()
    }

    #[must_use]
    pub fn navigation_client(&self) -> Option<Arc<dyn NavigationClient>> {
        self.state.lock().navigation_client.clone()
    }

    #[must_use]
    pub fn last_login_request(&self) -> Option<AuthRequest> {
        self.state.lock().last_login_request.clone()
    }

    #[must_use]
    pub fn last_silent_request(&self) -> Option<AuthRequest> {
        self.state.lock().last_silent_request.clone()
    }

    #[must_use]
    pub fn last_sso_request(&self) -> Option<AuthRequest> {
        self.state.lock().last_sso_request.clone()
    }

    #[must_use]
    pub fn last_logout_request(&self) -> Option<LogoutRequest> {
        self.state.lock().last_logout_request.clone()
    }

    fn record(&self, operation: &'static str) {
        *self.calls.lock().entry(operation).or_default() += 1;
    }

    fn cache_account(&self, result: &AuthenticationResult) {
        let Some(account) = &result.account else {
            return;
        };
        let mut state = self.state.lock();
        if !state.accounts.iter().any(|cached| cached.home_account_id == account.home_account_id) {
            state.accounts.push(account.clone());
        }
    }

    fn remove_accounts(&self, account: Option<&AccountInfo>) {
        let mut state = self.state.lock();
        match account {
            Some(account) => state.accounts.retain(|cached| !cached.same_identity(account)),
            None => state.accounts.clear(),
        }
        let still_listed = state
            .active
            .as_ref()
            .is_some_and(|active| state.accounts.iter().any(|cached| cached.same_identity(active)));
        if !still_listed {
            state.active = None;
        }
    }

    fn event(event_type: EventType, interaction_type: InteractionType) -> EventMessage {
        EventMessage::new(event_type).with_interaction(interaction_type)
    }
}

#[async_trait]
impl AuthClient for MockAuthClient {
    async fn initialize(&self) -> Result<(), AuthClientError> {
        self.record(calls::INITIALIZE);
        self.emit(&EventMessage::new(EventType::InitializeStart));
        let error = self.state.lock().initialize_error.take();
        self.emit(&EventMessage::new(EventType::InitializeEnd));
        error.map_or(Ok(()), Err)
    }

    async fn handle_redirect_promise(
        &self,
    ) -> Result<Option<AuthenticationResult>, AuthClientError> {
        self.record(calls::HANDLE_REDIRECT_PROMISE);
        self.emit(&Self::event(EventType::HandleRedirectStart, InteractionType::Redirect));
        let hold = self.state.lock().redirect_hold.take();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        let response = self.state.lock().redirect_response.take().unwrap_or(Ok(None));
        match &response {
            Ok(Some(result)) => {
                self.cache_account(result);
                self.emit(
                    &Self::event(EventType::LoginSuccess, InteractionType::Redirect)
                        .with_result(result.clone()),
                );
            }
            Ok(None) => {}
            Err(err) => self.emit(
                &Self::event(EventType::LoginFailure, InteractionType::Redirect)
                    .with_error(err.clone()),
            ),
        }
        self.emit(&Self::event(EventType::HandleRedirectEnd, InteractionType::Redirect));
        response
    }

    async fn login_popup(
        &self,
        request: &AuthRequest,
    ) -> Result<AuthenticationResult, AuthClientError> {
        self.record(calls::LOGIN_POPUP);
        self.state.lock().last_login_request = Some(request.clone());
        self.emit(&Self::event(EventType::LoginStart, InteractionType::Popup));
        let scripted = self.state.lock().popup_results.pop_front();
        let outcome = scripted.unwrap_or_else(|| {
            Err(AuthClientError::client("mock_unscripted", "no popup result queued"))
        });
        match &outcome {
            Ok(result) => {
                self.cache_account(result);
                self.emit(
                    &Self::event(EventType::LoginSuccess, InteractionType::Popup)
                        .with_result(result.clone()),
                );
            }
            Err(err) => self.emit(
                &Self::event(EventType::LoginFailure, InteractionType::Popup)
                    .with_error(err.clone()),
            ),
        }
        outcome
    }

    async fn login_redirect(&self, request: &AuthRequest) -> Result<(), AuthClientError> {
        self.record(calls::LOGIN_REDIRECT);
        self.state.lock().last_login_request = Some(request.clone());
        self.emit(&Self::event(EventType::LoginStart, InteractionType::Redirect));
        let error = self.state.lock().login_redirect_error.take();
        match error {
            // the page would navigate away here
            None => Ok(()),
            Some(err) => {
                self.emit(
                    &Self::event(EventType::LoginFailure, InteractionType::Redirect)
                        .with_error(err.clone()),
                );
                Err(err)
            }
        }
    }

    async fn logout_popup(&self, request: &LogoutRequest) -> Result<(), AuthClientError> {
        self.record(calls::LOGOUT_POPUP);
        self.state.lock().last_logout_request = Some(request.clone());
        self.emit(&Self::event(EventType::LogoutStart, InteractionType::Popup));
        let error = self.state.lock().logout_error.take();
        let outcome = match error {
            None => {
                self.remove_accounts(request.account.as_ref());
                self.emit(&Self::event(EventType::LogoutSuccess, InteractionType::Popup));
                Ok(())
            }
            Some(err) => {
                self.emit(
                    &Self::event(EventType::LogoutFailure, InteractionType::Popup)
                        .with_error(err.clone()),
                );
                Err(err)
            }
        };
        self.emit(&Self::event(EventType::LogoutEnd, InteractionType::Popup));
        outcome
    }

    async fn logout_redirect(&self, request: &LogoutRequest) -> Result<(), AuthClientError> {
        self.record(calls::LOGOUT_REDIRECT);
        self.state.lock().last_logout_request = Some(request.clone());
        self.emit(&Self::event(EventType::LogoutStart, InteractionType::Redirect));
        let error = self.state.lock().logout_error.take();
        match error {
            None => {
                self.remove_accounts(request.account.as_ref());
                Ok(())
            }
            Some(err) => {
                self.emit(
                    &Self::event(EventType::LogoutFailure, InteractionType::Redirect)
                        .with_error(err.clone()),
                );
                self.emit(&Self::event(EventType::LogoutEnd, InteractionType::Redirect));
                Err(err)
            }
        }
    }

    async fn acquire_token_silent(
        &self,
        request: &AuthRequest,
    ) -> Result<AuthenticationResult, AuthClientError> {
        self.record(calls::ACQUIRE_TOKEN_SILENT);
        self.state.lock().last_silent_request = Some(request.clone());
        self.emit(&Self::event(EventType::AcquireTokenStart, InteractionType::Silent));

        let hold = self.state.lock().silent_hold.take();
        if let Some(hold) = hold {
            hold.notified().await;
        }

        let scripted = self.state.lock().silent_results.pop_front();
        let outcome = scripted.unwrap_or_else(|| {
            let state = self.state.lock();
            let account = request.account.clone().or_else(|| state.accounts.first().cloned());
            account.map_or(Err(AuthClientError::NoAccount), |account| {
                Ok(AuthenticationResult::new(
                    Some(account),
                    "mock-id-token",
                    "mock-access-token",
                    request.scopes.clone(),
                ))
            })
        });
        match &outcome {
            Ok(result) => self.emit(
                &Self::event(EventType::AcquireTokenSuccess, InteractionType::Silent)
                    .with_result(result.clone()),
            ),
            Err(err) => self.emit(
                &Self::event(EventType::AcquireTokenFailure, InteractionType::Silent)
                    .with_error(err.clone()),
            ),
        }
        outcome
    }

    async fn sso_silent(
        &self,
        request: &AuthRequest,
    ) -> Result<AuthenticationResult, AuthClientError> {
        self.record(calls::SSO_SILENT);
        self.state.lock().last_sso_request = Some(request.clone());
        self.emit(&Self::event(EventType::SsoSilentStart, InteractionType::Silent));
        let scripted = self.state.lock().sso_results.pop_front();
        let outcome = scripted.unwrap_or_else(|| {
            Err(AuthClientError::interaction_required("login_required", "no session"))
        });
        match &outcome {
            Ok(result) => {
                self.cache_account(result);
                self.emit(
                    &Self::event(EventType::SsoSilentSuccess, InteractionType::Silent)
                        .with_result(result.clone()),
                );
            }
            Err(err) => self.emit(
                &Self::event(EventType::SsoSilentFailure, InteractionType::Silent)
                    .with_error(err.clone()),
            ),
        }
        outcome
    }

    fn get_all_accounts(&self) -> Vec<AccountInfo> {
        self.state.lock().accounts.clone()
    }

    fn get_active_account(&self) -> Option<AccountInfo> {
        self.state.lock().active.clone()
    }

    fn set_active_account(&self, account: Option<AccountInfo>) {
        self.state.lock().active = account;
    }

    fn add_event_callback(&self, callback: EventCallback) -> Option<CallbackId> {
        if self.state.lock().refuse_callbacks {
            return None;
        }
        let id = CallbackId::generate();
        self.callbacks.lock().push((id.clone(), callback));
        Some(id)
    }

    fn remove_event_callback(&self, id: &CallbackId) {
        self.callbacks.lock().retain(|(registered, _)| registered != id);
    }

    fn set_navigation_client(&self, client: Arc<dyn NavigationClient>) {
        self.state.lock().navigation_client = Some(client);
    }
}
