//! # authgate Infrastructure
//!
//! Environment adapters for the auth-state adapter.
//!
//! This crate contains:
//! - Configuration loading (environment, `.env`, TOML/JSON files)
//! - Tracing subscriber initialisation
//!
//! ## Architecture
//! - Depends on `authgate-domain` only
//! - Contains the process-level, "impure" code (env, filesystem, global
//!   subscriber)

pub mod config;
pub mod observability;

pub use observability::init_tracing;
