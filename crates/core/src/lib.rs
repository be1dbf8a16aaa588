//! # authgate Core
//!
//! State synchronization and interaction orchestration over a browser
//! OAuth/OIDC client.
//!
//! This crate contains:
//! - Port interfaces for the auth client and the host router (traits)
//! - Event normalization, interaction status and account state
//! - The auth plugin with its startup sequence and ready gate
//! - The navigation guard and UI-facing accessors
//!
//! ## Architecture Principles
//! - Only depends on `authgate-domain`
//! - No browser, storage or network code
//! - All external collaborators via traits
//! - State is published through `tokio::sync::watch` channels

pub mod accounts;
pub mod composables;
pub mod context;
pub mod events;
pub mod plugin;
pub mod ports;
pub mod ready;
pub mod router;
pub mod status;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export specific items to avoid ambiguity
pub use accounts::{AccountSet, AccountStateStore};
pub use composables::{
    use_account, use_auth, use_authentication, use_is_authenticated, use_plugin, AccountView,
    AuthContext, AuthOps, Authentication, IsAuthenticated,
};
pub use context::AppContext;
pub use events::{normalize, StateIntent};
pub use plugin::{AuthPlugin, InstallOptions, InteractionOutcome};
pub use ports::{
    AuthClient, BeforeEachGuard, CallbackId, EventCallback, NavigationClient, Router,
};
pub use ready::ReadyGate;
pub use router::{is_authenticated, NavigationGuard, RouterNavigationClient};
pub use status::{infer_status, InteractionStatusTracker};
