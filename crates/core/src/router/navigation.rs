//! Router-backed navigation client
//!
//! Installed into the auth client so that its in-app navigations (for
//! example the return to the start page after a redirect login) go through
//! the host router instead of reloading the page.

use std::sync::Arc;

use async_trait::async_trait;
use authgate_domain::NavigationOptions;
use tracing::{debug, error};
use url::Url;

use crate::ports::{NavigationClient, Router};

pub struct RouterNavigationClient {
    router: Arc<dyn Router>,
    origin: Option<String>,
}

impl RouterNavigationClient {
    /// `origin` is stripped from URLs before they reach the router. Without
    /// one, absolute URLs are reduced to path, query and fragment.
    pub fn new(router: Arc<dyn Router>, origin: Option<String>) -> Self {
        Self { router, origin }
    }

    /// Router path for `url`.
    #[must_use]
    pub fn to_router_path(&self, url: &str) -> String {
        if let Some(origin) = &self.origin {
            if let Some(rest) = url.strip_prefix(origin.trim_end_matches('/')) {
                return if rest.is_empty() { "/".to_string() } else { rest.to_string() };
            }
        }
        match Url::parse(url) {
            Ok(parsed) if parsed.has_host() => {
                let mut path = parsed.path().to_string();
                if let Some(query) = parsed.query() {
                    path.push('?');
                    path.push_str(query);
                }
                if let Some(fragment) = parsed.fragment() {
                    path.push('#');
                    path.push_str(fragment);
                }
                path
            }
            _ => url.to_string(),
        }
    }
}

#[async_trait]
impl NavigationClient for RouterNavigationClient {
    async fn navigate_internal(&self, url: &str, options: NavigationOptions) -> bool {
        let path = self.to_router_path(url);
        debug!(url, %path, no_history = options.no_history, "navigate_internal");

        let scheduled =
            if options.no_history { self.router.replace(&path) } else { self.router.push(&path) };
        if let Err(err) = scheduled {
            error!(error = %err, %path, "router rejected internal navigation");
        }
        // the router handles it in-page
        false
    }

    async fn navigate_external(&self, url: &str, _options: NavigationOptions) -> bool {
        debug!(url, "navigate_external: left to the auth client");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRouter;

    fn client(origin: Option<&str>) -> (Arc<MockRouter>, RouterNavigationClient) {
        let router = Arc::new(MockRouter::new());
        let navigation = RouterNavigationClient::new(
            Arc::clone(&router) as Arc<dyn Router>,
            origin.map(str::to_string),
        );
        (router, navigation)
    }

    #[test]
    fn test_origin_is_stripped() {
        let (_router, navigation) = client(Some("https://app.example.com/"));
        assert_eq!(navigation.to_router_path("https://app.example.com/profile?x=1"), "/profile?x=1");
        assert_eq!(navigation.to_router_path("https://app.example.com"), "/");
    }

    #[test]
    fn test_absolute_url_without_origin() {
        let (_router, navigation) = client(None);
        assert_eq!(navigation.to_router_path("https://app.example.com/a/b#frag"), "/a/b#frag");
        assert_eq!(navigation.to_router_path("/already/relative"), "/already/relative");
    }

    #[tokio::test]
    async fn test_no_history_replaces() {
        let (router, navigation) = client(Some("https://app.example.com"));
        let reloaded = navigation
            .navigate_internal("https://app.example.com/home", NavigationOptions { no_history: true })
            .await;
        assert!(!reloaded);
        assert_eq!(router.replaced(), vec!["/home".to_string()]);
        assert!(router.pushed().is_empty());
    }

    #[tokio::test]
    async fn test_history_entry_pushes() {
        let (router, navigation) = client(Some("https://app.example.com"));
        assert!(!navigation.navigate_internal("https://app.example.com/home", NavigationOptions::default()).await);
        assert_eq!(router.pushed(), vec!["/home".to_string()]);
        assert!(navigation.navigate_external("https://login.example.com", NavigationOptions::default()).await);
    }
}
