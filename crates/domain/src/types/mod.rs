//! Domain types and models

pub mod account;
pub mod auth;
pub mod event;
pub mod route;
pub mod status;

pub use account::{account_lists_equal, AccountInfo};
pub use auth::{AccessTokenEntry, AuthRequest, AuthenticationResult, LogoutRequest, TokenBundle};
pub use event::{EventMessage, EventPayload, EventType};
pub use route::{NavigationOptions, RouteLocation, RouteMeta, RouteRecord};
pub use status::{InteractionStatus, InteractionType};
