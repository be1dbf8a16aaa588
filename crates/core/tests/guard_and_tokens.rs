//! Integration tests for the navigation guard and token acquisition
//!
//! Tests protected-route gating through the router and the silent-first
//! token flow with its interactive fallback.

use std::sync::Arc;

use authgate_core::testing::{calls, MockAuthClient, MockRouter};
use authgate_core::{
    use_authentication, AppContext, AuthClient, AuthPlugin, InstallOptions, Router,
};
use authgate_domain::{
    AccountInfo, AuthClientError, AuthConfig, AuthRequest, AuthenticationResult, EventMessage,
    EventType, InteractionStatus, InteractionType, RouteLocation, RouteMeta, RouteRecord,
};

fn alice() -> AccountInfo {
    AccountInfo::new("h1", "l1", "alice@example.com")
}

fn protected_route(full_path: &str) -> RouteLocation {
    RouteLocation::new(full_path)
        .with_record(RouteRecord::new("/account", RouteMeta::protected()))
        .with_record(RouteRecord::new("settings", RouteMeta::default()))
}

async fn setup(
    interaction_type: InteractionType,
    accounts: Vec<AccountInfo>,
) -> (Arc<MockAuthClient>, Arc<MockRouter>, Arc<AuthPlugin>, AppContext) {
    let client = Arc::new(MockAuthClient::new());
    client.set_accounts(accounts);
    let router = Arc::new(MockRouter::new());
    let plugin = AuthPlugin::new(
        Arc::clone(&client) as Arc<dyn AuthClient>,
        AuthConfig::new(interaction_type, AuthRequest::new(["User.Read"])),
    );
    let app = AppContext::new();
    plugin
        .install(&app, InstallOptions::with_router(Arc::clone(&router) as Arc<dyn Router>))
        .await;
    (client, router, plugin, app)
}

/// Validates that an unauthenticated user is kept out of a protected route
/// when the login popup fails.
///
/// # Test Steps
/// 1. Install over an empty cache with a failing popup
/// 2. Navigate to a child of a protected route
/// 3. Verify navigation is refused after exactly one login attempt
#[tokio::test]
async fn test_guard_blocks_when_login_rejects() {
    let (client, router, _plugin, _app) = setup(InteractionType::Popup, Vec::new()).await;
    client.push_popup_result(Err(AuthClientError::client("popup_window_error", "blocked")));

    let navigated = router.navigate(protected_route("/account/settings")).await;

    assert!(navigated.is_none());
    assert_eq!(router.current_route().full_path, "/");
    assert_eq!(client.call_count(calls::LOGIN_POPUP), 1);
}

/// Validates that a signed-in user passes without any login call.
#[tokio::test]
async fn test_guard_allows_signed_in_user() {
    let (client, router, _plugin, _app) = setup(InteractionType::Popup, vec![alice()]).await;

    let navigated = router.navigate(protected_route("/account/settings")).await;

    assert_eq!(navigated.map(|route| route.full_path), Some("/account/settings".to_string()));
    assert_eq!(client.call_count(calls::LOGIN_POPUP), 0);
    assert_eq!(client.call_count(calls::LOGIN_REDIRECT), 0);
}

/// Validates that the redirect login started by the guard returns to the
/// requested page.
#[tokio::test]
async fn test_guard_redirect_login_keeps_start_page() {
    let (client, router, _plugin, _app) = setup(InteractionType::Redirect, Vec::new()).await;

    assert!(router.navigate(protected_route("/account/settings?tab=keys")).await.is_some());
    let request = client.last_login_request().unwrap();
    assert_eq!(request.redirect_start_page.as_deref(), Some("/account/settings?tab=keys"));
    assert_eq!(client.call_count(calls::LOGIN_REDIRECT), 1);
}

/// Validates the interactive fallback of token acquisition.
///
/// # Test Steps
/// 1. Script an interaction-required silent failure and a successful popup
/// 2. Acquire a token with an explicit request
/// 3. Verify exactly one popup login ran with the unchanged request
/// 4. Verify the popup result is returned and published
#[tokio::test]
async fn test_silent_failure_falls_back_to_one_popup() {
    let (client, _router, plugin, _app) = setup(InteractionType::Popup, vec![alice()]).await;
    client.push_silent_result(Err(AuthClientError::interaction_required(
        "consent_required",
        "consent needed",
    )));
    client.push_popup_result(Ok(AuthenticationResult::new(
        Some(alice()),
        "id",
        "at-mail",
        vec!["Mail.Read".into()],
    )));
    let request = AuthRequest::new(["Mail.Read"]).with_account(alice());

    let result = plugin.acquire_token(Some(request.clone())).await.unwrap();

    assert_eq!(result.map(|r| r.access_token), Some("at-mail".to_string()));
    assert_eq!(client.call_count(calls::ACQUIRE_TOKEN_SILENT), 1);
    assert_eq!(client.call_count(calls::LOGIN_POPUP), 1);
    assert_eq!(client.last_login_request(), Some(request));
    assert_eq!(plugin.tokens().access_tokens[0].access_token, "at-mail");
    assert_eq!(plugin.status(), InteractionStatus::None);
}

/// Validates that a missing account is handled like interaction-required,
/// here in redirect mode.
#[tokio::test]
async fn test_no_account_falls_back_to_redirect() {
    let (client, _router, plugin, _app) = setup(InteractionType::Redirect, Vec::new()).await;

    let result = plugin.acquire_token(None).await;

    assert_eq!(result, Ok(None));
    assert_eq!(client.call_count(calls::LOGIN_REDIRECT), 1);
    assert_eq!(client.last_login_request().map(|r| r.scopes), Some(vec!["User.Read".to_string()]));
}

/// Validates that other silent failures surface without a login attempt.
#[tokio::test]
async fn test_transient_failure_is_surfaced() {
    let (client, _router, plugin, _app) = setup(InteractionType::Popup, vec![alice()]).await;
    client.push_silent_result(Err(AuthClientError::client("network_error", "offline")));

    let result = plugin.acquire_token(None).await;

    assert_eq!(result, Err(AuthClientError::client("network_error", "offline")));
    assert_eq!(client.call_count(calls::LOGIN_POPUP), 0);
}

/// Validates that acquisition during redirect handling resolves with the
/// redirect outcome instead of a silent request.
#[tokio::test]
async fn test_acquire_during_redirect_handling_uses_redirect_response() {
    let (client, _router, plugin, _app) = setup(InteractionType::Redirect, Vec::new()).await;
    client.emit(
        &EventMessage::new(EventType::HandleRedirectStart).with_interaction(InteractionType::Redirect),
    );
    assert_eq!(plugin.status(), InteractionStatus::HandleRedirect);
    client.set_redirect_response(Ok(Some(AuthenticationResult::new(
        Some(alice()),
        "id",
        "at",
        vec![],
    ))));

    let result = plugin.acquire_token(None).await.unwrap();

    assert!(result.is_some());
    assert_eq!(client.call_count(calls::ACQUIRE_TOKEN_SILENT), 0);
    assert_eq!(plugin.status(), InteractionStatus::None);
    assert_eq!(plugin.active_account(), Some(alice()));
}

/// Validates that a failed fallback login leaves accounts untouched and the
/// error captured at the call site.
#[tokio::test]
async fn test_failed_fallback_is_captured() {
    let (client, _router, plugin, app) = setup(InteractionType::Popup, Vec::new()).await;
    client.push_popup_result(Err(AuthClientError::UserCancelled));
    let authentication = use_authentication(&app).unwrap();

    assert!(authentication.acquire_token(None).await);

    assert_eq!(*authentication.error().borrow(), Some(AuthClientError::UserCancelled));
    assert!(authentication.result().borrow().is_none());
    assert!(plugin.accounts().is_empty());
    assert!(plugin.active_account().is_none());
    assert_eq!(plugin.status(), InteractionStatus::None);
}
