//! UI-facing accessors
//!
//! Each accessor takes the [`AppContext`] the plugin was installed into and
//! fails with [`AuthGateError::NotInstalled`] when there is none. State is
//! handed out as `watch::Receiver`s, so components can read it but never
//! write it.

mod account;
mod auth;
mod authenticated;
mod authentication;

use std::sync::Arc;

use authgate_domain::{AuthGateError, Result};

pub use account::{use_account, AccountView};
pub use auth::{use_auth, AuthContext, AuthOps};
pub use authenticated::{use_is_authenticated, IsAuthenticated};
pub use authentication::{use_authentication, Authentication};

use crate::context::AppContext;
use crate::plugin::AuthPlugin;

/// The installed plugin.
pub fn use_plugin(app: &AppContext) -> Result<Arc<AuthPlugin>> {
    lookup(app, "use_plugin")
}

fn lookup(app: &AppContext, accessor: &'static str) -> Result<Arc<AuthPlugin>> {
    app.inject::<AuthPlugin>().ok_or(AuthGateError::NotInstalled(accessor))
}
