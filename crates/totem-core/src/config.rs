use std::path::{Path, PathBuf};

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_BSALE_API_URL: &str = "https://api.bsale.io/v1";
pub const DEFAULT_USER_AGENT: &str = "totem/0.1 (kiosk-lookup)";

/// Load application configuration from environment variables.
///
/// When `DOTENV_PATH` is set, that file is loaded first and must exist.
/// Otherwise a `.env` in the working directory is loaded if present.
///
/// # Errors
///
/// Returns `ConfigError` if the env file named by `DOTENV_PATH` cannot be
/// read, required env vars are missing, or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    let env_file = std::env::var_os("DOTENV_PATH").map(PathBuf::from);
    load_env_file(env_file.as_deref())?;
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        None => {
            dotenvy::dotenv().ok();
            Ok(())
        }
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::{IpAddr, SocketAddr};

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let bsale_token = require("BSALE_TOKEN")?;
    let bsale_api_url = or_default("BSALE_API", DEFAULT_BSALE_API_URL);
    let default_price_list_id = optional("BSALE_PRICE_LIST_ID");

    let bsale_request_timeout_secs = parse_u64("BSALE_REQUEST_TIMEOUT_SECS", "10")?;
    let bsale_connect_timeout_secs = parse_u64("BSALE_CONNECT_TIMEOUT_SECS", "5")?;
    if bsale_request_timeout_secs == 0 {
        return Err(invalid(
            "BSALE_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let bsale_user_agent = or_default("BSALE_USER_AGENT", DEFAULT_USER_AGENT);

    let host = or_default("HOST", "0.0.0.0")
        .parse::<IpAddr>()
        .map_err(|e| invalid("HOST", e.to_string()))?;
    let port = or_default("PORT", "3000")
        .parse::<u16>()
        .map_err(|e| invalid("PORT", e.to_string()))?;
    let bind_addr = SocketAddr::new(host, port);

    let public_dir = PathBuf::from(or_default("PUBLIC_DIR", "./public"));
    let log_level = or_default("TOTEM_LOG_LEVEL", "info");

    Ok(AppConfig {
        bsale_api_url,
        bsale_token,
        default_price_list_id,
        bsale_request_timeout_secs,
        bsale_connect_timeout_secs,
        bsale_user_agent,
        bind_addr,
        public_dir,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
