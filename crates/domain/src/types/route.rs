//! Host-router route shapes consumed by the navigation guard

use serde::{Deserialize, Serialize};

/// Per-record route metadata understood by the guard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    #[serde(default)]
    pub requires_auth: bool,
    /// Route to push when a popup logout ends while this route is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_logout_fallback: Option<String>,
}

impl RouteMeta {
    #[must_use]
    pub const fn protected() -> Self {
        Self { requires_auth: true, popup_logout_fallback: None }
    }

    #[must_use]
    pub fn with_popup_logout_fallback(mut self, path: impl Into<String>) -> Self {
        self.popup_logout_fallback = Some(path.into());
        self
    }
}

/// A matched route record (the route itself or one of its ancestors).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub path: String,
    #[serde(default)]
    pub meta: RouteMeta,
}

impl RouteRecord {
    pub fn new(path: impl Into<String>, meta: RouteMeta) -> Self {
        Self { path: path.into(), meta }
    }
}

/// A resolved navigation target.
///
/// `matched` lists records from the outermost ancestor to the route itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLocation {
    pub full_path: String,
    pub path: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
    #[serde(default)]
    pub matched: Vec<RouteRecord>,
}

impl RouteLocation {
    /// Build a location from a full path such as `/a?b=1#c`.
    pub fn new(full_path: impl Into<String>) -> Self {
        let full_path = full_path.into();
        let hash = full_path.find('#').map(|i| full_path[i..].to_string()).unwrap_or_default();
        let path_end = full_path.find(['?', '#']).unwrap_or(full_path.len());
        let path = full_path[..path_end].to_string();
        Self { full_path, path, hash, matched: Vec::new() }
    }

    #[must_use]
    pub fn with_record(mut self, record: RouteRecord) -> Self {
        self.matched.push(record);
        self
    }

    /// Whether the route or any ancestor requires authentication.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|record| record.meta.requires_auth)
    }

    /// Effective popup-logout fallback; the innermost record wins.
    #[must_use]
    pub fn popup_logout_fallback(&self) -> Option<&str> {
        self.matched.iter().rev().find_map(|record| record.meta.popup_logout_fallback.as_deref())
    }

    /// Drop the fragment from both `full_path` and `hash`.
    ///
    /// `hash` is decoded while `full_path` is encoded, so the fragment is cut
    /// at the first `#` of `full_path` rather than by string replacement.
    pub fn strip_hash(&mut self) {
        if let Some(index) = self.full_path.find('#') {
            self.full_path.truncate(index);
        }
        self.hash.clear();
    }
}

/// Options the auth client passes along with an internal navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationOptions {
    /// Replace the current history entry instead of pushing a new one.
    #[serde(default)]
    pub no_history: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_splits_path_and_hash() {
        let route = RouteLocation::new("/profile?tab=1#code=abc&state=xyz");
        assert_eq!(route.path, "/profile");
        assert_eq!(route.hash, "#code=abc&state=xyz");
    }

    #[test]
    fn test_strip_hash() {
        let mut route = RouteLocation::new("/profile?tab=1#code=abc");
        route.strip_hash();
        assert_eq!(route.full_path, "/profile?tab=1");
        assert!(route.hash.is_empty());

        let mut plain = RouteLocation::new("/home");
        plain.strip_hash();
        assert_eq!(plain.full_path, "/home");
    }

    #[test]
    fn test_requires_auth_is_inherited() {
        let route = RouteLocation::new("/admin/users")
            .with_record(RouteRecord::new("/admin", RouteMeta::protected()))
            .with_record(RouteRecord::new("users", RouteMeta::default()));
        assert!(route.requires_auth());
        assert!(!RouteLocation::new("/").requires_auth());
    }

    #[test]
    fn test_innermost_fallback_wins() {
        let route = RouteLocation::new("/admin/users")
            .with_record(RouteRecord::new(
                "/admin",
                RouteMeta::protected().with_popup_logout_fallback("/"),
            ))
            .with_record(RouteRecord::new(
                "users",
                RouteMeta::default().with_popup_logout_fallback("/goodbye"),
            ));
        assert_eq!(route.popup_logout_fallback(), Some("/goodbye"));
    }
}
