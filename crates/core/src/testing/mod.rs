//! Test doubles for the auth client and host router
//!
//! Compiled for this crate's own tests and, behind the `test-utils` feature,
//! for downstream crates.

mod mock_client;
mod mock_router;

pub use mock_client::{calls, MockAuthClient};
pub use mock_router::MockRouter;
