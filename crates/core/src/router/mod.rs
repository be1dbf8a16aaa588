//! Host-router integration: navigation guard and navigation client

pub mod guard;
pub mod navigation;

pub use guard::{is_authenticated, NavigationGuard};
pub use navigation::RouterNavigationClient;
