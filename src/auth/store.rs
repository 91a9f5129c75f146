//! File-backed storage for the paired bridge's address and username.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const CONFIG_DIR_ENV: &str = "HUEC_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeCredentials {
    pub bridge: String,
    pub username: String,
}

/// Path of the credentials file. `HUEC_CONFIG_DIR` overrides the platform
/// config directory.
fn credentials_path() -> Result<PathBuf, AppError> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir).join("credentials.json"));
    }
    let base = dirs::config_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no platform config directory"))?;
    Ok(base.join("huec").join("credentials.json"))
}

pub fn store_credentials(credentials: &BridgeCredentials) -> Result<(), AppError> {
    let path = credentials_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(credentials)?)?;
    Ok(())
}

pub fn get_credentials() -> Result<Option<BridgeCredentials>, AppError> {
    let path = credentials_path()?;
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn clear_credentials() -> Result<(), AppError> {
    let path = credentials_path()?;
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env override isn't touched from two threads.
    #[test]
    fn test_store_get_clear_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        env::set_var(CONFIG_DIR_ENV, dir.path());

        assert!(get_credentials().unwrap().is_none());

        let creds = BridgeCredentials {
            bridge: "192.168.1.2".to_string(),
            username: "abc123".to_string(),
        };
        store_credentials(&creds).unwrap();

        let loaded = get_credentials().unwrap().unwrap();
        assert_eq!(loaded.bridge, "192.168.1.2");
        assert_eq!(loaded.username, "abc123");

        clear_credentials().unwrap();
        assert!(get_credentials().unwrap().is_none());
        clear_credentials().unwrap();

        env::remove_var(CONFIG_DIR_ENV);
    }
}
