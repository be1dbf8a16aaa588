//! # authgate Domain
//!
//! Data types shared by the authentication-state adapter.
//!
//! This crate contains:
//! - Auth-client vocabulary (accounts, events, interaction status, requests)
//! - Host-router route shapes
//! - Error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other authgate crates
//! - No async code, no I/O
//! - Pure data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
