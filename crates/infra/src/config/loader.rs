//! Configuration loader
//!
//! Loads [`AuthConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Honour a `.env` file if one is present
//! 2. Attempt to load from environment variables
//! 3. If incomplete, fall back to loading from file
//! 4. Probe multiple paths for config files (TOML or JSON)
//!
//! ## Environment Variables
//! - `AUTHGATE_INTERACTION_TYPE`: `popup` or `redirect` (required)
//! - `AUTHGATE_LOGIN_SCOPES`: default login scopes, comma or whitespace
//!   separated
//! - `AUTHGATE_LOG_LEVEL`: default tracing filter directive
//! - `AUTHGATE_LOG_JSON`: emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./authgate.toml`, `./authgate.json`
//! 2. `./config.toml`, `./config.json`
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use authgate_domain::constants::{
    ENV_INTERACTION_TYPE, ENV_LOGIN_SCOPES, ENV_LOG_JSON, ENV_LOG_LEVEL,
};
use authgate_domain::{AuthConfig, AuthGateError, AuthRequest, InteractionType, LoggingConfig, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["authgate.toml", "authgate.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// Reads `.env` first, then attempts the environment. If the required
/// variable is missing, falls back to a config file.
///
/// # Errors
/// Returns `AuthGateError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value cannot be parsed
pub fn load() -> Result<AuthConfig> {
    load_dotenv();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Populate the process environment from a `.env` file, if one exists.
///
/// Variables already set are left untouched. Returns whether a file was read.
pub fn load_dotenv() -> bool {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env file");
            true
        }
        Err(e) if e.not_found() => false,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable .env file");
            false
        }
    }
}

/// Load configuration from environment variables
///
/// Only `AUTHGATE_INTERACTION_TYPE` is required; the rest fall back to
/// their defaults.
///
/// # Errors
/// Returns `AuthGateError::Config` if the interaction type is missing or
/// not one of `popup`/`redirect`.
pub fn load_from_env() -> Result<AuthConfig> {
    let interaction_type = parse_interaction_type(&env_var(ENV_INTERACTION_TYPE)?)?;

    let scopes = std::env::var(ENV_LOGIN_SCOPES).map(|raw| parse_scopes(&raw)).unwrap_or_default();

    let mut logging = LoggingConfig::default();
    if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
        if !level.trim().is_empty() {
            logging.level = level.trim().to_string();
        }
    }
    logging.json = env_bool(ENV_LOG_JSON, false);

    Ok(AuthConfig { interaction_type, login_request: AuthRequest::new(scopes), logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports TOML and
/// JSON, detected by file extension.
///
/// # Errors
/// Returns `AuthGateError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<AuthConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AuthGateError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AuthGateError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AuthGateError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, picking the format from the
/// extension of `path`.
///
/// # Errors
/// Returns `AuthGateError::Config` if the format is unsupported or parsing
/// fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<AuthConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let config: AuthConfig = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AuthGateError::Config(format!("Invalid TOML format: {e}")))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| AuthGateError::Config(format!("Invalid JSON format: {e}")))?,
        _ => {
            return Err(AuthGateError::Config(format!("Unsupported config format: {extension}")))
        }
    };

    if !config.interaction_type.is_interactive() {
        return Err(AuthGateError::Config(format!(
            "interactionType must be popup or redirect, got {}",
            config.interaction_type
        )));
    }
    Ok(config)
}

/// Probe the standard locations for a configuration file
///
/// Searches the current working directory first, then the directory of the
/// running executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    probe_in(&dirs)
}

fn probe_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn parse_interaction_type(raw: &str) -> Result<InteractionType> {
    let parsed = raw
        .trim()
        .parse::<InteractionType>()
        .map_err(|e| AuthGateError::Config(format!("Invalid {ENV_INTERACTION_TYPE}: {e}")))?;
    if parsed.is_interactive() {
        Ok(parsed)
    } else {
        Err(AuthGateError::Config(format!(
            "Invalid {ENV_INTERACTION_TYPE}: expected popup or redirect, got {raw}"
        )))
    }
}

/// Split a scope list on commas and whitespace, dropping empty entries.
fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|scope| !scope.is_empty())
        .map(str::to_string)
        .collect()
}

/// Get required environment variable
///
/// # Errors
/// Returns `AuthGateError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        AuthGateError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map_or(default, |s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in [ENV_INTERACTION_TYPE, ENV_LOGIN_SCOPES, ENV_LOG_LEVEL, ENV_LOG_JSON] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for (key, value) in
            [("TEST_AG_BOOL_1", "1"), ("TEST_AG_BOOL_YES", "yes"), ("TEST_AG_BOOL_UPPER", "TRUE")]
        {
            std::env::set_var(key, value);
            assert!(env_bool(key, false), "{value} should parse as true");
            std::env::remove_var(key);
        }

        std::env::set_var("TEST_AG_BOOL_OFF", "off");
        assert!(!env_bool("TEST_AG_BOOL_OFF", true));
        std::env::remove_var("TEST_AG_BOOL_OFF");

        assert!(env_bool("TEST_AG_BOOL_MISSING", true));
        assert!(!env_bool("TEST_AG_BOOL_MISSING", false));
    }

    #[test]
    fn test_parse_scopes_accepts_commas_and_whitespace() {
        assert_eq!(
            parse_scopes("openid, profile  User.Read,,offline_access"),
            vec!["openid", "profile", "User.Read", "offline_access"]
        );
        assert!(parse_scopes("  , ").is_empty());
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_INTERACTION_TYPE, "POPUP");
        std::env::set_var(ENV_LOGIN_SCOPES, "User.Read Mail.Read");
        std::env::set_var(ENV_LOG_LEVEL, "authgate_core=debug");
        std::env::set_var(ENV_LOG_JSON, "true");

        let result = load_from_env();
        clear_env();

        let config = result.expect("env config should load");
        assert_eq!(config.interaction_type, InteractionType::Popup);
        assert_eq!(config.login_request.scopes, vec!["User.Read", "Mail.Read"]);
        assert_eq!(config.logging.level, "authgate_core=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_env_uses_defaults_for_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_INTERACTION_TYPE, "redirect");
        let result = load_from_env();
        clear_env();

        let config = result.expect("env config should load");
        assert_eq!(config.interaction_type, InteractionType::Redirect);
        assert!(config.login_request.scopes.is_empty());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_from_env_missing_interaction_type() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_INTERACTION_TYPE));
    }

    #[test]
    fn test_load_from_env_rejects_non_interactive_type() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_INTERACTION_TYPE, "silent");
        let silent = load_from_env();
        std::env::set_var(ENV_INTERACTION_TYPE, "modal");
        let unknown = load_from_env();
        clear_env();

        assert!(matches!(silent, Err(AuthGateError::Config(_))));
        assert!(matches!(unknown, Err(AuthGateError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_extension() {
        let result = parse_config("interactionType = 'popup'", Path::new("authgate.yaml"));
        assert!(matches!(result, Err(AuthGateError::Config(msg)) if msg.contains("yaml")));
    }

    #[test]
    fn test_parse_config_invalid_toml() {
        let result = parse_config("interactionType = ", Path::new("authgate.toml"));
        assert!(matches!(result, Err(AuthGateError::Config(msg)) if msg.contains("TOML")));
    }

    #[test]
    fn test_load_from_file_missing_path() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/authgate.toml")));
        assert!(matches!(result, Err(AuthGateError::Config(msg)) if msg.contains("not found")));
    }

    #[test]
    fn test_load_from_file_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"interactionType":"popup","loginRequest":{"scopes":["openid"]}}"#)
            .unwrap();
        let path = file.path().with_extension("json");
        std::fs::copy(file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(config.interaction_type, InteractionType::Popup);
        assert_eq!(config.login_request.scopes, vec!["openid"]);
    }

    #[test]
    fn test_probe_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(first.path().join("config.json"), "{}").unwrap();
        std::fs::write(second.path().join("authgate.toml"), "").unwrap();

        // directory order wins over file name order
        let found = probe_in(&[first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(found, Some(first.path().join("config.json")));

        std::fs::write(first.path().join("authgate.toml"), "").unwrap();
        let found = probe_in(&[first.path().to_path_buf()]);
        assert_eq!(found, Some(first.path().join("authgate.toml")));

        let empty = TempDir::new().unwrap();
        assert_eq!(probe_in(&[empty.path().to_path_buf()]), None);
    }
}
