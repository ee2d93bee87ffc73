use std::fs;
use std::path::{Path, PathBuf};

use puzzlers_types::{AppConfig, ConfigError};
use validator::Validate;

use crate::error::{AppError, AppResult};

const CONFIG_FILE: &str = "config.json";
const DATA_DIR_NAME: &str = "puzzlers";

pub const ENV_DATA_DIR: &str = "PUZZLERS_DATA_DIR";
pub const ENV_UPSTREAM_URL: &str = "PUZZLERS_UPSTREAM_URL";
pub const ENV_PORT: &str = "PUZZLERS_PORT";
pub const ENV_ALLOW_LAN: &str = "PUZZLERS_ALLOW_LAN";
pub const ENV_ROUTE_PREFIX: &str = "PUZZLERS_ROUTE_PREFIX";
pub const ENV_EDGE_CORS: &str = "PUZZLERS_EDGE_CORS";
pub const ENV_EXPOSE_ERROR_TRACE: &str = "PUZZLERS_EXPOSE_ERROR_TRACE";
pub const ENV_API_URL: &str = "PUZZLERS_API_URL";

/// Data directory (`$PUZZLERS_DATA_DIR` or `<platform data dir>/puzzlers`), created on demand.
pub fn get_data_dir() -> AppResult<PathBuf> {
    let dir = match std::env::var(ENV_DATA_DIR) {
        Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
        _ => dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                AppError::Config(ConfigError::NotFound { path: "data directory".to_string() })
            })?
            .join(DATA_DIR_NAME),
    };
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Default location of the config file.
pub fn default_config_path() -> AppResult<PathBuf> {
    Ok(get_data_dir()?.join(CONFIG_FILE))
}

/// Load the config file at `path`; a missing file yields defaults.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
        message: format!("failed to read {}: {e}", path.display()),
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

/// Load config (file + environment overrides) and validate it.
///
/// `path` overrides the default config location.
pub fn load_config(path: Option<&Path>) -> AppResult<AppConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    let mut config = load_config_file(&path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate().map_err(|e| ConfigError::from_validation(&e))?;
    Ok(config)
}

/// Overlay environment values onto `config`. `lookup` abstracts the environment.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = get(ENV_UPSTREAM_URL) {
        config.proxy.upstream_base_url = Some(url);
    }
    if let Some(port) = get(ENV_PORT) {
        config.proxy.port = port.parse().map_err(|_| ConfigError::ValidationError {
            field: ENV_PORT.to_string(),
            message: format!("'{port}' is not a valid port"),
        })?;
    }
    if let Some(flag) = get(ENV_ALLOW_LAN) {
        config.proxy.allow_lan_access = parse_flag(ENV_ALLOW_LAN, &flag)?;
    }
    if let Some(prefix) = lookup(ENV_ROUTE_PREFIX) {
        config.proxy.route_prefix = prefix.trim().to_string();
    }
    if let Some(flag) = get(ENV_EDGE_CORS) {
        config.proxy.edge_cors = parse_flag(ENV_EDGE_CORS, &flag)?;
    }
    if let Some(flag) = get(ENV_EXPOSE_ERROR_TRACE) {
        config.proxy.expose_error_trace = parse_flag(ENV_EXPOSE_ERROR_TRACE, &flag)?;
    }
    if let Some(url) = get(ENV_API_URL) {
        config.api_url = url;
    }
    Ok(())
}

fn parse_flag(field: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: format!("'{raw}' is not a boolean"),
        }),
    }
}

/// Save config atomically (write temp file, then rename).
pub fn save_config(config: &AppConfig, path: &Path) -> AppResult<()> {
    let temp_path = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&temp_path, content).map_err(|e| ConfigError::from_io_error(&e))?;
    fs::rename(&temp_path, path).map_err(|e| ConfigError::from_io_error(&e))?;
    Ok(())
}
