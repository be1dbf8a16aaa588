//! Domain constants
//!
//! Centralized location for the literal values shared by the core and infra
//! crates.

// Display fallbacks for the account helper
pub const NO_USERNAME_PLACEHOLDER: &str = "(No username)";
pub const NO_NAME_PLACEHOLDER: &str = "(No name)";

// Prompt values sent with account switching
pub const PROMPT_NONE: &str = "none";
pub const PROMPT_LOGIN: &str = "login";

// Default post-logout landing page for popup logout
pub const DEFAULT_MAIN_WINDOW_REDIRECT_URI: &str = "/";

// Environment variables read by the configuration loader
pub const ENV_INTERACTION_TYPE: &str = "AUTHGATE_INTERACTION_TYPE";
pub const ENV_LOGIN_SCOPES: &str = "AUTHGATE_LOGIN_SCOPES";
pub const ENV_LOG_LEVEL: &str = "AUTHGATE_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "AUTHGATE_LOG_JSON";

pub const DEFAULT_LOG_LEVEL: &str = "info";
