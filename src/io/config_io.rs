use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Error type for configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
    #[error("not configured: {0} does not exist (run `gy login` to create it)")]
    NotConfigured(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Resolve the gantry configuration directory.
///
/// Precedence: the `-C` flag, then `GANTRY_CONFIG_DIR`, then the platform
/// config dir plus `gantry/`.
pub fn config_dir(override_dir: Option<&str>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = override_dir {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(dir) = std::env::var("GANTRY_CONFIG_DIR")
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|d| d.join("gantry"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Read and parse config.toml from the given directory.
pub fn read_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = dir.join("config.toml");
    if !path.exists() {
        return Err(ConfigError::NotConfigured(path));
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Write the session token (and optionally the server URL) into config.toml,
/// preserving any existing formatting and unrelated keys. Creates the file
/// and directory when missing.
pub fn write_login(dir: &Path, token: &str, server: Option<&str>) -> Result<(), ConfigError> {
    fs::create_dir_all(dir)?;
    let path = dir.join("config.toml");
    let text = if path.exists() {
        fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?
    } else {
        String::new()
    };

    let mut doc: toml_edit::DocumentMut = text.parse()?;

    if !doc.contains_key("auth") {
        doc["auth"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["auth"]["token"] = toml_edit::value(token);

    if let Some(server) = server {
        if !doc.contains_key("server") {
            doc["server"] = toml_edit::Item::Table(toml_edit::Table::new());
        }
        doc["server"]["base_url"] = toml_edit::value(server);
    }

    fs::write(&path, doc.to_string())?;
    Ok(())
}
