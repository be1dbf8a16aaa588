//! Configuration loading
//!
//! Builds an [`authgate_domain::AuthConfig`] from environment variables,
//! `.env` files and TOML/JSON config files.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_dotenv, load_from_env, load_from_file, parse_config, probe_config_paths};
